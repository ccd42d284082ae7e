//! The processing pipeline turning a generator's raw tones into the scale
//! actually used for playback and display.
//!
//! The pipeline is a pure function of its inputs. It performs no I/O and is
//! re-run in full on every seed or parameter change; scale sizes are small
//! enough (at most a few hundred tones) that incremental updates are not
//! worth their complexity.

use crate::microtone::MicrotoneArray;
use crate::ratio::Ratio;

/// Selects the processing steps applied by [`process`].
#[derive(Copy, Clone, Debug)]
pub struct ProcessOptions {
    /// Reduce every tone's pitch into `[0, 1)` against the period.
    pub octave_reduce: bool,
    /// Order tones by ascending pitch.
    pub sort: bool,
    /// Drop tones whose pitch duplicates a previously kept tone (first wins).
    pub uniquify: bool,
}

/// Runs the selected processing steps in their fixed order: reduce, sort, uniquify.
///
/// The caller guarantees `period > 1`; an empty raw array yields an empty
/// processed array, not an error.
///
/// # Examples
///
/// ```
/// # use combtune::microtone::{Microtone, MicrotoneArray};
/// # use combtune::pipeline::{self, ProcessOptions};
/// # use combtune::ratio::Ratio;
/// let raw = MicrotoneArray::from_tones(vec![
///     Microtone::from_frequency(3.0),
///     Microtone::from_frequency(6.0),
///     Microtone::from_frequency(5.0),
/// ]);
///
/// let processed = pipeline::process(
///     &raw,
///     Ratio::octave(),
///     ProcessOptions { octave_reduce: true, sort: true, uniquify: true },
/// );
/// assert_eq!(processed.to_string(), "5/4 3/2");
/// ```
pub fn process(raw: &MicrotoneArray, period: Ratio, options: ProcessOptions) -> MicrotoneArray {
    debug_assert!(period.as_float() > 1.0, "Period must be greater than 1");

    let mut processed = if options.octave_reduce {
        raw.octave_reduced(period)
    } else {
        raw.clone()
    };
    if options.sort {
        processed = processed.sorted_by_pitch();
    }
    if options.uniquify {
        processed = processed.uniquified();
    }
    processed
}

/// Result of [`apply_npo_override`]: the resampled array plus the map from
/// override index back to the index within the processed array.
#[derive(Clone, Debug, PartialEq)]
pub struct NpoMapping {
    array: MicrotoneArray,
    index_map: Vec<usize>,
    reason: Option<String>,
}

impl NpoMapping {
    pub fn array(&self) -> &MicrotoneArray {
        &self.array
    }

    pub fn index_map(&self) -> &[usize] {
        &self.index_map
    }

    /// Human-readable explanation when the override request could not be
    /// represented. The mapping is empty in that case.
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}

/// Resamples `processed` onto `npo` equally spaced degrees by nearest-neighbor
/// selection (cyclic pitch distance, lowest index wins on ties).
///
/// With the override disabled the result equals `processed` and the index map
/// is the identity. Degenerate requests yield an empty mapping plus a
/// descriptive reason instead of an error.
///
/// # Examples
///
/// ```
/// # use combtune::microtone::{Microtone, MicrotoneArray};
/// # use combtune::pipeline;
/// let processed = MicrotoneArray::from_tones(vec![
///     Microtone::from_fraction(1, 1),
///     Microtone::from_fraction(5, 4),
///     Microtone::from_fraction(3, 2),
/// ]);
///
/// let identity = pipeline::apply_npo_override(&processed, None);
/// assert_eq!(identity.array(), &processed);
/// assert_eq!(identity.index_map(), [0, 1, 2]);
/// ```
pub fn apply_npo_override(processed: &MicrotoneArray, npo: Option<u32>) -> NpoMapping {
    let npo = match npo {
        None => {
            return NpoMapping {
                array: processed.clone(),
                index_map: (0..processed.len()).collect(),
                reason: None,
            }
        }
        Some(npo) => npo,
    };

    if npo == 0 {
        return empty_mapping("Cannot represent the scale with 0 notes per octave");
    }
    if processed.is_empty() {
        return empty_mapping("Cannot apply a notes-per-octave override to an empty scale");
    }

    let mut array = MicrotoneArray::new();
    let mut index_map = Vec::with_capacity(npo as usize);

    for degree in 0..npo {
        let target = f64::from(degree) / f64::from(npo);

        let mut best_index = 0;
        let mut best_distance = f64::INFINITY;
        for (index, pitch) in processed.pitches().enumerate() {
            let distance = cyclic_distance(pitch, target);
            if distance < best_distance {
                best_index = index;
                best_distance = distance;
            }
        }

        array.push(processed.get(best_index).expect("Index in range").clone());
        index_map.push(best_index);
    }

    NpoMapping {
        array,
        index_map,
        reason: None,
    }
}

fn empty_mapping(reason: &str) -> NpoMapping {
    NpoMapping {
        array: MicrotoneArray::new(),
        index_map: Vec::new(),
        reason: Some(reason.to_owned()),
    }
}

fn cyclic_distance(pitch: f64, target: f64) -> f64 {
    let distance = (pitch - target).abs();
    distance.min(1.0 - distance)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::microtone::Microtone;

    const ALL_STEPS: ProcessOptions = ProcessOptions {
        octave_reduce: true,
        sort: true,
        uniquify: true,
    };

    fn harmonics(values: &[u64]) -> MicrotoneArray {
        values
            .iter()
            .map(|&value| Microtone::from_fraction(value, 1))
            .collect()
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let processed = process(&MicrotoneArray::new(), Ratio::octave(), ALL_STEPS);
        assert!(processed.is_empty());
    }

    #[test]
    fn processing_is_idempotent() {
        let raw = harmonics(&[7, 3, 6, 5, 3, 9]);

        let processed = process(&raw, Ratio::octave(), ALL_STEPS);
        let reprocessed = process(&processed, Ratio::octave(), ALL_STEPS);

        assert_eq!(processed, reprocessed);
    }

    #[test]
    fn duplicate_pitches_survive_without_uniquify() {
        let raw = harmonics(&[3, 6, 12]);

        let processed = process(
            &raw,
            Ratio::octave(),
            ProcessOptions {
                octave_reduce: true,
                sort: true,
                uniquify: false,
            },
        );

        assert_eq!(processed.len(), 3);
        assert_eq!(processed.to_string(), "3/2 3/2 3/2");
    }

    #[test]
    fn npo_override_resamples_with_nearest_neighbors() {
        let processed = process(&harmonics(&[1, 3, 5, 7]), Ratio::octave(), ALL_STEPS);
        assert_eq!(processed.to_string(), "1 5/4 3/2 7/4");

        let mapping = apply_npo_override(&processed, Some(2));
        // Degree 0 -> 1/1, degree 1 (pitch 0.5) -> 3/2 (pitch 0.585)
        assert_eq!(mapping.index_map(), [0, 2]);
        assert_eq!(mapping.array().to_string(), "1 3/2");
        assert_eq!(mapping.reason(), None);
    }

    #[test]
    fn npo_override_of_zero_reports_a_reason() {
        let processed = harmonics(&[1, 3]);
        let mapping = apply_npo_override(&processed, Some(0));
        assert!(mapping.array().is_empty());
        assert!(mapping.index_map().is_empty());
        assert!(mapping.reason().is_some());
    }
}
