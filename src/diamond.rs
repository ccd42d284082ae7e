//! Harmonic/subharmonic diamond lattices and their navigable subset graph.
//!
//! Every diamond family (triadic through ogdoadic) pre-assigns each of its
//! selectable scales a permanent index in the combined 0–71 space. The
//! numbering is the contract other subsystems (automation, favorites) rely on
//! and must never change.

use crate::microtone::{Microtone, MicrotoneArray, SeedName};
use crate::pipeline::{self, NpoMapping, ProcessOptions};
use crate::ratio::Ratio;
use crate::tuning::{self, Tuning, UpdateCallback};
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

/// The total number of selectable diamond scales across all families.
pub const NUM_SCALES: u8 = 72;

// Unlike CPS scales, diamonds explicitly remove duplicate pitches.
const PROCESS: ProcessOptions = ProcessOptions {
    octave_reduce: true,
    sort: true,
    uniquify: true,
};

// Odd harmonics, the customary diamond identities.
const DEFAULT_SEEDS: [f64; 8] = [1.0, 3.0, 5.0, 7.0, 9.0, 11.0, 13.0, 15.0];

/// The six diamond families, one per supported seed count.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum DiamondFamily {
    Triadic,
    Tetradic,
    Pentadic,
    Hexadic,
    Heptadic,
    Ogdoadic,
}

impl DiamondFamily {
    pub const ALL: [DiamondFamily; 6] = [
        DiamondFamily::Triadic,
        DiamondFamily::Tetradic,
        DiamondFamily::Pentadic,
        DiamondFamily::Hexadic,
        DiamondFamily::Heptadic,
        DiamondFamily::Ogdoadic,
    ];

    pub fn num_seeds(self) -> usize {
        self as usize + 3
    }

    /// The first scale index owned by this family. The ranges are permanent:
    /// triadic 0–6, tetradic 7–15, pentadic 16–26, hexadic 27–39, heptadic
    /// 40–54, ogdoadic 55–71.
    pub fn base_index(self) -> u8 {
        match self {
            DiamondFamily::Triadic => 0,
            DiamondFamily::Tetradic => 7,
            DiamondFamily::Pentadic => 16,
            DiamondFamily::Hexadic => 27,
            DiamondFamily::Heptadic => 40,
            DiamondFamily::Ogdoadic => 55,
        }
    }

    /// The number of selectable scales: the parent plus `n` harmonic and `n`
    /// subharmonic subsets.
    pub fn num_scales(self) -> u8 {
        1 + 2 * self.num_seeds() as u8
    }

    /// Finds the family owning the given scale index.
    pub fn containing(scale_index: u8) -> Result<DiamondFamily, DiamondError> {
        DiamondFamily::ALL
            .into_iter()
            .find(|family| {
                (family.base_index()..family.base_index() + family.num_scales())
                    .contains(&scale_index)
            })
            .ok_or(DiamondError::IndexOutOfRange { scale_index })
    }

    pub fn name(self) -> &'static str {
        match self {
            DiamondFamily::Triadic => "triadic",
            DiamondFamily::Tetradic => "tetradic",
            DiamondFamily::Pentadic => "pentadic",
            DiamondFamily::Hexadic => "hexadic",
            DiamondFamily::Heptadic => "heptadic",
            DiamondFamily::Ogdoadic => "ogdoadic",
        }
    }

    fn chord_name(self) -> &'static str {
        match self {
            DiamondFamily::Triadic => "triad",
            DiamondFamily::Tetradic => "tetrad",
            DiamondFamily::Pentadic => "pentad",
            DiamondFamily::Hexadic => "hexad",
            DiamondFamily::Heptadic => "heptad",
            DiamondFamily::Ogdoadic => "ogdoad",
        }
    }
}

impl Display for DiamondFamily {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.pad(self.name())
    }
}

/// The role of one selectable scale within its family.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ScaleKind {
    /// The full diamond, the union of all subsets.
    Parent,
    /// The otonality over pivot seed `i`.
    Harmonic(usize),
    /// The utonality under pivot seed `i`.
    Subharmonic(usize),
}

/// Decomposes a scale index into its family and role.
///
/// # Examples
///
/// ```
/// # use combtune::diamond::{self, DiamondFamily, ScaleKind};
/// assert_eq!(
///     diamond::scale_kind(7).unwrap(),
///     (DiamondFamily::Tetradic, ScaleKind::Parent)
/// );
/// assert_eq!(
///     diamond::scale_kind(8).unwrap(),
///     (DiamondFamily::Tetradic, ScaleKind::Harmonic(0))
/// );
/// assert_eq!(
///     diamond::scale_kind(15).unwrap(),
///     (DiamondFamily::Tetradic, ScaleKind::Subharmonic(3))
/// );
/// assert!(diamond::scale_kind(72).is_err());
/// ```
pub fn scale_kind(scale_index: u8) -> Result<(DiamondFamily, ScaleKind), DiamondError> {
    let family = DiamondFamily::containing(scale_index)?;
    let offset = usize::from(scale_index - family.base_index());
    let kind = match offset {
        0 => ScaleKind::Parent,
        odd if odd % 2 == 1 => ScaleKind::Harmonic((odd - 1) / 2),
        even => ScaleKind::Subharmonic(even / 2 - 1),
    };
    Ok((family, kind))
}

/// The display name of one selectable scale, e.g. `harmonic tetrad 2`.
pub fn scale_name(scale_index: u8) -> Result<String, DiamondError> {
    let (family, kind) = scale_kind(scale_index)?;
    Ok(match kind {
        ScaleKind::Parent => format!("{} diamond", family.name()),
        ScaleKind::Harmonic(i) => format!("harmonic {} {}", family.chord_name(), i + 1),
        ScaleKind::Subharmonic(i) => format!("subharmonic {} {}", family.chord_name(), i + 1),
    })
}

/// A 2D directional move on the subset graph. Exactly one axis per step;
/// diagonal moves are unrepresentable.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Direction {
    Left,
    Right,
    Down,
    Up,
}

/// The transition table of the subset graph, indexed by scale index and
/// [`Direction`] (left, right, down, up).
///
/// All edges stay within the node's own family. From the parent, `left`
/// enters the subset ring and every other direction is a self-loop; `right`
/// from the first harmonic subset returns to the parent. Lateral moves land
/// on the opposite kind of the neighboring pivot, `down`/`up` swap the
/// harmonic and subharmonic scale of the same pivot.
///
/// This table is deliberately literal data. The parity pattern is irregular
/// at the family boundaries, and the numbering is load-bearing for saved
/// automation, so it is spelled out rather than derived.
static TRANSITIONS: [[u8; 4]; 72] = [
    // triadic
    [1, 0, 0, 0],     //  0: triadic diamond
    [6, 0, 2, 2],     //  1: harmonic triad 1
    [5, 3, 1, 1],     //  2: subharmonic triad 1
    [2, 6, 4, 4],     //  3: harmonic triad 2
    [1, 5, 3, 3],     //  4: subharmonic triad 2
    [4, 2, 6, 6],     //  5: harmonic triad 3
    [3, 1, 5, 5],     //  6: subharmonic triad 3
    // tetradic
    [8, 7, 7, 7],     //  7: tetradic diamond
    [15, 7, 9, 9],    //  8: harmonic tetrad 1
    [14, 10, 8, 8],   //  9: subharmonic tetrad 1
    [9, 13, 11, 11],  // 10: harmonic tetrad 2
    [8, 12, 10, 10],  // 11: subharmonic tetrad 2
    [11, 15, 13, 13], // 12: harmonic tetrad 3
    [10, 14, 12, 12], // 13: subharmonic tetrad 3
    [13, 9, 15, 15],  // 14: harmonic tetrad 4
    [12, 8, 14, 14],  // 15: subharmonic tetrad 4
    // pentadic
    [17, 16, 16, 16], // 16: pentadic diamond
    [26, 16, 18, 18], // 17: harmonic pentad 1
    [25, 19, 17, 17], // 18: subharmonic pentad 1
    [18, 22, 20, 20], // 19: harmonic pentad 2
    [17, 21, 19, 19], // 20: subharmonic pentad 2
    [20, 24, 22, 22], // 21: harmonic pentad 3
    [19, 23, 21, 21], // 22: subharmonic pentad 3
    [22, 26, 24, 24], // 23: harmonic pentad 4
    [21, 25, 23, 23], // 24: subharmonic pentad 4
    [24, 18, 26, 26], // 25: harmonic pentad 5
    [23, 17, 25, 25], // 26: subharmonic pentad 5
    // hexadic
    [28, 27, 27, 27], // 27: hexadic diamond
    [39, 27, 29, 29], // 28: harmonic hexad 1
    [38, 30, 28, 28], // 29: subharmonic hexad 1
    [29, 33, 31, 31], // 30: harmonic hexad 2
    [28, 32, 30, 30], // 31: subharmonic hexad 2
    [31, 35, 33, 33], // 32: harmonic hexad 3
    [30, 34, 32, 32], // 33: subharmonic hexad 3
    [33, 37, 35, 35], // 34: harmonic hexad 4
    [32, 36, 34, 34], // 35: subharmonic hexad 4
    [35, 39, 37, 37], // 36: harmonic hexad 5
    [34, 38, 36, 36], // 37: subharmonic hexad 5
    [37, 29, 39, 39], // 38: harmonic hexad 6
    [36, 28, 38, 38], // 39: subharmonic hexad 6
    // heptadic
    [41, 40, 40, 40], // 40: heptadic diamond
    [54, 40, 42, 42], // 41: harmonic heptad 1
    [53, 43, 41, 41], // 42: subharmonic heptad 1
    [42, 46, 44, 44], // 43: harmonic heptad 2
    [41, 45, 43, 43], // 44: subharmonic heptad 2
    [44, 48, 46, 46], // 45: harmonic heptad 3
    [43, 47, 45, 45], // 46: subharmonic heptad 3
    [46, 50, 48, 48], // 47: harmonic heptad 4
    [45, 49, 47, 47], // 48: subharmonic heptad 4
    [48, 52, 50, 50], // 49: harmonic heptad 5
    [47, 51, 49, 49], // 50: subharmonic heptad 5
    [50, 54, 52, 52], // 51: harmonic heptad 6
    [49, 53, 51, 51], // 52: subharmonic heptad 6
    [52, 42, 54, 54], // 53: harmonic heptad 7
    [51, 41, 53, 53], // 54: subharmonic heptad 7
    // ogdoadic
    [56, 55, 55, 55], // 55: ogdoadic diamond
    [71, 55, 57, 57], // 56: harmonic ogdoad 1
    [70, 58, 56, 56], // 57: subharmonic ogdoad 1
    [57, 61, 59, 59], // 58: harmonic ogdoad 2
    [56, 60, 58, 58], // 59: subharmonic ogdoad 2
    [59, 63, 61, 61], // 60: harmonic ogdoad 3
    [58, 62, 60, 60], // 61: subharmonic ogdoad 3
    [61, 65, 63, 63], // 62: harmonic ogdoad 4
    [60, 64, 62, 62], // 63: subharmonic ogdoad 4
    [63, 67, 65, 65], // 64: harmonic ogdoad 5
    [62, 66, 64, 64], // 65: subharmonic ogdoad 5
    [65, 69, 67, 67], // 66: harmonic ogdoad 6
    [64, 68, 66, 66], // 67: subharmonic ogdoad 6
    [67, 71, 69, 69], // 68: harmonic ogdoad 7
    [66, 70, 68, 68], // 69: subharmonic ogdoad 7
    [69, 57, 71, 71], // 70: harmonic ogdoad 8
    [68, 56, 70, 70], // 71: subharmonic ogdoad 8
];

/// Pure transition function over the navigation graph.
///
/// # Examples
///
/// ```
/// # use combtune::diamond::{self, Direction};
/// // Parent -> subset ring -> parent
/// assert_eq!(diamond::step_from(7, Direction::Left).unwrap(), 8);
/// assert_eq!(diamond::step_from(8, Direction::Right).unwrap(), 7);
/// assert!(diamond::step_from(72, Direction::Left).is_err());
/// ```
pub fn step_from(scale_index: u8, direction: Direction) -> Result<u8, DiamondError> {
    if scale_index >= NUM_SCALES {
        return Err(DiamondError::IndexOutOfRange { scale_index });
    }
    Ok(TRANSITIONS[usize::from(scale_index)][direction as usize])
}

/// Reasons a [`Diamond`] request is rejected at the API boundary. Rejection is
/// explicit, never a silent clamp: clamping would desynchronize the caller's
/// index-based persistence from the generator's actual state.
#[derive(Clone, Debug, PartialEq)]
pub enum DiamondError {
    /// A scale index outside 0..72.
    IndexOutOfRange { scale_index: u8 },
    /// A subset number outside the family's pivot range.
    SubsetOutOfRange {
        family: DiamondFamily,
        subset: usize,
    },
    /// A seed value that is not a finite positive number.
    SeedOutOfRange { value: f64 },
}

struct FamilyScales {
    parent: MicrotoneArray,
    harmonic: Vec<MicrotoneArray>,
    subharmonic: Vec<MicrotoneArray>,
}

/// The diamond generator.
///
/// Holds the eight shared seeds, the current selection and a lazily built
/// cache of family scales. A seed edit invalidates every cached family; only
/// the currently selected family is rebuilt eagerly, the others on their next
/// selection.
///
/// # Examples
///
/// ```
/// # use combtune::diamond::Diamond;
/// # use combtune::tuning::Tuning;
/// let mut diamond = Diamond::new(&[1.0, 3.0, 5.0]).unwrap();
/// let triadic = diamond.select_by_index(0).unwrap();
/// assert_eq!(triadic.to_string(), "1 6/5 5/4 4/3 3/2 8/5 5/3");
/// ```
pub struct Diamond {
    seeds: Vec<Microtone>,
    selected: u8,
    families: [Option<FamilyScales>; 6],
    npo_override: Option<u32>,
    npo: NpoMapping,
    on_update: Option<UpdateCallback>,
}

impl Diamond {
    /// Creates a generator with the given seed values overriding the first
    /// slots of the default odd-harmonic seeds 1, 3, 5, 7, 9, 11, 13, 15.
    /// Values beyond the eighth are ignored.
    pub fn new(seed_frequencies: &[f64]) -> Result<Diamond, DiamondError> {
        let mut seed_values = DEFAULT_SEEDS;
        for (slot, &value) in seed_values.iter_mut().zip(seed_frequencies) {
            *slot = value;
        }

        let seeds = seed_values
            .iter()
            .map(|&value| checked_seed(value))
            .collect::<Result<Vec<_>, _>>()?;

        let mut diamond = Diamond {
            seeds,
            selected: 0,
            families: Default::default(),
            npo_override: None,
            npo: pipeline::apply_npo_override(&MicrotoneArray::new(), None),
            on_update: None,
        };
        diamond.rebuild_selection();
        Ok(diamond)
    }

    pub fn seeds(&self) -> &[Microtone] {
        &self.seeds
    }

    /// The permanent index of the currently selected scale.
    pub fn selected_index(&self) -> u8 {
        self.selected
    }

    pub fn selected_name(&self) -> String {
        scale_name(self.selected).expect("Selection in range")
    }

    /// The map from notes-per-octave override index to processed index.
    pub fn npo_index_map(&self) -> &[usize] {
        self.npo.index_map()
    }

    pub fn npo_reason(&self) -> Option<&str> {
        self.npo.reason()
    }

    /// Selects a scale by its permanent index, building the owning family on
    /// demand, and returns the processed scale.
    pub fn select_by_index(&mut self, scale_index: u8) -> Result<&MicrotoneArray, DiamondError> {
        DiamondFamily::containing(scale_index)?;
        self.selected = scale_index;
        self.rebuild_selection();
        Ok(self.node_array(self.selected))
    }

    pub fn select_parent(&mut self, family: DiamondFamily) -> Result<&MicrotoneArray, DiamondError> {
        self.select_by_index(family.base_index())
    }

    pub fn select_harmonic(
        &mut self,
        family: DiamondFamily,
        subset: usize,
    ) -> Result<&MicrotoneArray, DiamondError> {
        self.select_subset(family, subset, 1)
    }

    pub fn select_subharmonic(
        &mut self,
        family: DiamondFamily,
        subset: usize,
    ) -> Result<&MicrotoneArray, DiamondError> {
        self.select_subset(family, subset, 2)
    }

    fn select_subset(
        &mut self,
        family: DiamondFamily,
        subset: usize,
        kind_offset: u8,
    ) -> Result<&MicrotoneArray, DiamondError> {
        if subset >= family.num_seeds() {
            return Err(DiamondError::SubsetOutOfRange { family, subset });
        }
        self.select_by_index(family.base_index() + kind_offset + 2 * subset as u8)
    }

    /// The index an arrow-key move would select, without moving.
    pub fn step(&self, direction: Direction) -> u8 {
        step_from(self.selected, direction).expect("Selection in range")
    }

    pub fn step_left(&mut self) -> Result<u8, DiamondError> {
        self.step_and_select(Direction::Left)
    }

    pub fn step_right(&mut self) -> Result<u8, DiamondError> {
        self.step_and_select(Direction::Right)
    }

    pub fn step_down(&mut self) -> Result<u8, DiamondError> {
        self.step_and_select(Direction::Down)
    }

    pub fn step_up(&mut self) -> Result<u8, DiamondError> {
        self.step_and_select(Direction::Up)
    }

    fn step_and_select(&mut self, direction: Direction) -> Result<u8, DiamondError> {
        let next = self.step(direction);
        self.select_by_index(next)?;
        Ok(next)
    }

    /// Replaces one of the eight shared seed values. All cached families are
    /// invalidated; the selected family is rebuilt immediately, the others
    /// lazily on their next selection.
    pub fn set_seed(&mut self, name: SeedName, frequency: f64) -> Result<(), DiamondError> {
        self.seeds[name.index()] = checked_seed(frequency)?;
        self.families = Default::default();
        self.rebuild_selection();
        Ok(())
    }

    pub fn set_npo_override(&mut self, npo_override: Option<u32>) {
        self.npo_override = npo_override;
        let npo = pipeline::apply_npo_override(self.node_array(self.selected), self.npo_override);
        self.npo = npo;
        tuning::notify(&mut self.on_update);
    }

    pub fn set_on_tuning_update(&mut self, callback: Option<UpdateCallback>) {
        self.on_update = callback;
    }

    fn rebuild_selection(&mut self) {
        let family = DiamondFamily::containing(self.selected).expect("Selection in range");
        if self.families[family as usize].is_none() {
            let scales = self.build_family(family);
            self.families[family as usize] = Some(scales);
        }
        let npo = pipeline::apply_npo_override(self.node_array(self.selected), self.npo_override);
        self.npo = npo;
        tuning::notify(&mut self.on_update);
    }

    fn build_family(&self, family: DiamondFamily) -> FamilyScales {
        let num_seeds = family.num_seeds();
        let seeds = &self.seeds[..num_seeds];
        let base = family.base_index();

        let mut parent_raw = MicrotoneArray::new();
        let mut harmonic = Vec::with_capacity(num_seeds);
        let mut subharmonic = Vec::with_capacity(num_seeds);

        for pivot in 0..num_seeds {
            let harmonic_index = base + 1 + 2 * pivot as u8;
            let harmonic_raw = seeds
                .iter()
                .map(|seed| {
                    Microtone::quotient(seed, &seeds[pivot])
                        .with_subset_key(harmonic_index.to_string())
                })
                .collect::<MicrotoneArray>();

            let subharmonic_index = base + 2 + 2 * pivot as u8;
            let subharmonic_raw = seeds
                .iter()
                .map(|seed| {
                    Microtone::quotient(&seeds[pivot], seed)
                        .with_subset_key(subharmonic_index.to_string())
                })
                .collect::<MicrotoneArray>();

            parent_raw = parent_raw.union(harmonic_raw.clone());
            parent_raw = parent_raw.union(subharmonic_raw.clone());

            harmonic.push(pipeline::process(&harmonic_raw, Ratio::octave(), PROCESS));
            subharmonic.push(pipeline::process(&subharmonic_raw, Ratio::octave(), PROCESS));
        }

        FamilyScales {
            parent: pipeline::process(&parent_raw, Ratio::octave(), PROCESS),
            harmonic,
            subharmonic,
        }
    }

    fn node_array(&self, scale_index: u8) -> &MicrotoneArray {
        let (family, kind) = scale_kind(scale_index).expect("Selection in range");
        let scales = self.families[family as usize]
            .as_ref()
            .expect("Family built");
        match kind {
            ScaleKind::Parent => &scales.parent,
            ScaleKind::Harmonic(i) => &scales.harmonic[i],
            ScaleKind::Subharmonic(i) => &scales.subharmonic[i],
        }
    }
}

impl Tuning for Diamond {
    fn processed(&self) -> &MicrotoneArray {
        self.node_array(self.selected)
    }

    fn processed_npo(&self) -> &MicrotoneArray {
        self.npo.array()
    }

    fn parameter_description(&self) -> String {
        let seeds = SeedName::ALL
            .iter()
            .zip(&self.seeds)
            .map(|(name, seed)| format!("{}={}", name, seed))
            .collect::<Vec<_>>()
            .join(" ");
        format!("{} {}", self.selected_name(), seeds)
    }
}

fn checked_seed(value: f64) -> Result<Microtone, DiamondError> {
    if value.is_finite() && value > 0.0 {
        Ok(Microtone::from_frequency(value))
    } else {
        Err(DiamondError::SeedOutOfRange { value })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::BTreeSet;

    fn pitch_set(array: &MicrotoneArray) -> BTreeSet<u64> {
        // Pitches quantized well below EPSILON so sets compare exactly.
        array
            .pitches()
            .map(|pitch| (pitch * 1e9).round() as u64)
            .collect()
    }

    #[test]
    fn family_index_ranges_are_permanent() {
        let expected = [
            (DiamondFamily::Triadic, 0, 7),
            (DiamondFamily::Tetradic, 7, 9),
            (DiamondFamily::Pentadic, 16, 11),
            (DiamondFamily::Hexadic, 27, 13),
            (DiamondFamily::Heptadic, 40, 15),
            (DiamondFamily::Ogdoadic, 55, 17),
        ];

        for (family, base, num_scales) in expected {
            assert_eq!(family.base_index(), base, "{}", family);
            assert_eq!(family.num_scales(), num_scales, "{}", family);
        }

        assert_eq!(
            DiamondFamily::containing(71).unwrap(),
            DiamondFamily::Ogdoadic
        );
        assert_eq!(
            DiamondFamily::containing(72).unwrap_err(),
            DiamondError::IndexOutOfRange { scale_index: 72 }
        );
    }

    #[test]
    fn transitions_stay_within_the_family() {
        for scale_index in 0..NUM_SCALES {
            let family = DiamondFamily::containing(scale_index).unwrap();
            for direction in [
                Direction::Left,
                Direction::Right,
                Direction::Down,
                Direction::Up,
            ] {
                let target = step_from(scale_index, direction).unwrap();
                assert_eq!(
                    DiamondFamily::containing(target).unwrap(),
                    family,
                    "{} from {:?} of {}",
                    target,
                    direction,
                    scale_index
                );
            }
        }
    }

    #[test]
    fn transitions_follow_the_navigation_rules() {
        for scale_index in 0..NUM_SCALES {
            let (family, kind) = scale_kind(scale_index).unwrap();
            let num_seeds = family.num_seeds();
            let step = |direction| step_from(scale_index, direction).unwrap();

            match kind {
                ScaleKind::Parent => {
                    assert_eq!(scale_kind(step(Direction::Left)).unwrap().1, ScaleKind::Harmonic(0));
                    for direction in [Direction::Right, Direction::Down, Direction::Up] {
                        assert_eq!(step(direction), scale_index);
                    }
                }
                ScaleKind::Harmonic(i) => {
                    // Lateral moves land on the opposite kind of the neighbor
                    // pivot; right from the first harmonic returns to the parent.
                    assert_eq!(
                        scale_kind(step(Direction::Left)).unwrap().1,
                        ScaleKind::Subharmonic((i + num_seeds - 1) % num_seeds)
                    );
                    if i == 0 {
                        assert_eq!(step(Direction::Right), family.base_index());
                    } else {
                        assert_eq!(
                            scale_kind(step(Direction::Right)).unwrap().1,
                            ScaleKind::Subharmonic((i + 1) % num_seeds)
                        );
                    }
                    assert_eq!(
                        scale_kind(step(Direction::Down)).unwrap().1,
                        ScaleKind::Subharmonic(i)
                    );
                    assert_eq!(step(Direction::Down), step(Direction::Up));
                }
                ScaleKind::Subharmonic(i) => {
                    assert_eq!(
                        scale_kind(step(Direction::Left)).unwrap().1,
                        ScaleKind::Harmonic((i + num_seeds - 1) % num_seeds)
                    );
                    assert_eq!(
                        scale_kind(step(Direction::Right)).unwrap().1,
                        ScaleKind::Harmonic((i + 1) % num_seeds)
                    );
                    assert_eq!(
                        scale_kind(step(Direction::Down)).unwrap().1,
                        ScaleKind::Harmonic(i)
                    );
                    assert_eq!(step(Direction::Down), step(Direction::Up));
                }
            }
        }
    }

    #[test]
    fn parent_left_then_right_is_a_round_trip() {
        for family in DiamondFamily::ALL {
            let parent = family.base_index();
            let entered = step_from(parent, Direction::Left).unwrap();
            assert_eq!(step_from(entered, Direction::Right).unwrap(), parent);
        }
    }

    #[test]
    fn parent_is_the_union_of_its_subsets() {
        let mut diamond = Diamond::new(&[]).unwrap();

        for family in DiamondFamily::ALL {
            let parent = pitch_set(diamond.select_parent(family).unwrap());

            let mut subsets = BTreeSet::new();
            for subset in 0..family.num_seeds() {
                subsets.extend(pitch_set(diamond.select_harmonic(family, subset).unwrap()));
                subsets.extend(pitch_set(
                    diamond.select_subharmonic(family, subset).unwrap(),
                ));
            }

            assert_eq!(parent, subsets, "{}", family);
        }
    }

    #[test]
    fn hexadic_diamond_of_the_first_six_odd_harmonics_has_29_tones() {
        let mut diamond = Diamond::new(&[1.0, 3.0, 5.0, 7.0, 9.0, 11.0]).unwrap();
        let parent = diamond.select_parent(DiamondFamily::Hexadic).unwrap();
        assert_eq!(parent.len(), 29);
    }

    #[test]
    fn triadic_subsets_are_otonal_and_utonal() {
        let mut diamond = Diamond::new(&[1.0, 3.0, 5.0]).unwrap();

        let harmonic = diamond.select_harmonic(DiamondFamily::Triadic, 0).unwrap();
        assert_eq!(harmonic.to_string(), "1 5/4 3/2");

        let subharmonic = diamond
            .select_subharmonic(DiamondFamily::Triadic, 0)
            .unwrap();
        assert_eq!(subharmonic.to_string(), "1 4/3 8/5");
    }

    #[test]
    fn subset_tones_carry_their_menu_key() {
        let mut diamond = Diamond::new(&[]).unwrap();
        let harmonic = diamond.select_harmonic(DiamondFamily::Tetradic, 1).unwrap();

        assert!(harmonic.iter().all(|tone| tone.subset_key() == "10"));
    }

    #[test]
    fn selection_is_a_pure_function_of_seeds_and_index() {
        let mut diamond = Diamond::new(&[]).unwrap();

        let first = diamond.select_by_index(33).unwrap().clone();
        diamond.select_by_index(55).unwrap();
        let second = diamond.select_by_index(33).unwrap().clone();

        assert_eq!(first, second);
    }

    #[test]
    fn seed_edit_invalidates_cached_families() {
        let mut diamond = Diamond::new(&[]).unwrap();

        let before = diamond.select_parent(DiamondFamily::Tetradic).unwrap().clone();
        diamond.set_seed(SeedName::B, 17.0).unwrap();
        let after = diamond.select_parent(DiamondFamily::Tetradic).unwrap().clone();

        assert_ne!(before, after);
    }

    #[test]
    fn out_of_range_requests_are_rejected_not_clamped() {
        let mut diamond = Diamond::new(&[]).unwrap();

        assert_eq!(
            diamond.select_by_index(72).unwrap_err(),
            DiamondError::IndexOutOfRange { scale_index: 72 }
        );
        assert_eq!(
            diamond
                .select_harmonic(DiamondFamily::Triadic, 3)
                .unwrap_err(),
            DiamondError::SubsetOutOfRange {
                family: DiamondFamily::Triadic,
                subset: 3
            }
        );
        // The failed requests did not move the selection.
        assert_eq!(diamond.selected_index(), 0);
    }
}
