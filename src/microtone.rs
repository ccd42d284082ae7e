//! The microtone data model shared by all scale generators.

use crate::math;
use crate::ratio::Ratio;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

/// Two microtones closer than this pitch distance are considered the same tone.
///
/// The value is expressed in periods (octaves, usually) and corresponds to
/// roughly a 1000th of a cent, aligned with [`Ratio::is_negligible`].
pub const EPSILON: f64 = 1e-6;

/// Names of the seed slots shared by the CPS and diamond generators.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum SeedName {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

impl SeedName {
    pub const ALL: [SeedName; 8] = [
        SeedName::A,
        SeedName::B,
        SeedName::C,
        SeedName::D,
        SeedName::E,
        SeedName::F,
        SeedName::G,
        SeedName::H,
    ];

    /// Returns the seed's position within the seed set.
    ///
    /// # Examples
    ///
    /// ```
    /// # use combtune::microtone::SeedName;
    /// assert_eq!(SeedName::A.index(), 0);
    /// assert_eq!(SeedName::H.index(), 7);
    /// ```
    pub fn index(self) -> usize {
        self as usize
    }
}

impl Display for SeedName {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// An immutable value representing one pitch.
///
/// A microtone is described by a rational number (if available) and by its canonical
/// `pitch` value, the base-2 logarithm of its frequency ratio reduced into `[0, 1)`
/// against the active period. The raw `frequency` value is preserved so that seed
/// tones keep the number the user typed in.
///
/// # Examples
///
/// ```
/// # use assert_approx_eq::assert_approx_eq;
/// # use combtune::microtone::Microtone;
/// let fifth = Microtone::from_fraction(3, 2);
/// assert_eq!(fifth.ratio(), Some((3, 2)));
/// assert_approx_eq!(fifth.pitch(), 0.5849625);
/// assert_eq!(fifth.to_string(), "3/2");
///
/// // Ratios are normalized
/// assert_eq!(Microtone::from_fraction(6, 4).ratio(), Some((3, 2)));
///
/// // Integral frequencies get a rational representation
/// assert_eq!(Microtone::from_frequency(5.0).ratio(), Some((5, 1)));
/// assert_eq!(Microtone::from_frequency(1.25).ratio(), None);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Microtone {
    ratio: Option<(u64, u64)>,
    pitch: f64,
    frequency: f64,
    description: String,
    subset_key: String,
}

impl Microtone {
    /// Creates a rational microtone.
    ///
    /// # Panics
    ///
    /// Panics if `numer` or `denom` is zero.
    pub fn from_fraction(numer: u64, denom: u64) -> Self {
        assert!(
            numer > 0 && denom > 0,
            "Fraction must be positive but was {}/{}",
            numer,
            denom
        );
        let (numer, denom) = math::simplify_u64(numer, denom);
        let frequency = numer as f64 / denom as f64;
        Self {
            ratio: Some((numer, denom)),
            pitch: frequency.log2().rem_euclid(1.0),
            frequency,
            description: fraction_description(numer, denom),
            subset_key: String::new(),
        }
    }

    /// Creates a microtone from a raw Hz-like scalar, e.g. a seed value the user edits.
    ///
    /// Integral frequencies keep a rational representation.
    ///
    /// # Panics
    ///
    /// Panics if `frequency` is not a finite positive number.
    pub fn from_frequency(frequency: f64) -> Self {
        assert!(
            frequency.is_finite() && frequency > 0.0,
            "Frequency must be finite and positive but was {}",
            frequency
        );
        if let Some(int_value) = as_integer(frequency) {
            return Self::from_fraction(int_value, 1);
        }
        Self {
            ratio: None,
            pitch: frequency.log2().rem_euclid(1.0),
            frequency,
            description: float_description(frequency),
            subset_key: String::new(),
        }
    }

    /// Creates a non-rational microtone from a pitch expressed as a fraction of `period`.
    pub fn from_period_fraction(period: Ratio, fraction: f64) -> Self {
        let pitch = fraction.rem_euclid(1.0);
        Self {
            ratio: None,
            pitch,
            frequency: period.as_float().powf(pitch),
            description: float_description(pitch),
            subset_key: String::new(),
        }
    }

    /// Creates the product microtone of the given factors.
    ///
    /// The rational representation survives as long as every factor is rational
    /// and the integer arithmetic does not overflow; otherwise the product falls
    /// back to its floating-point value.
    ///
    /// # Examples
    ///
    /// ```
    /// # use combtune::microtone::Microtone;
    /// let product = Microtone::product([
    ///     &Microtone::from_frequency(3.0),
    ///     &Microtone::from_frequency(5.0),
    /// ]);
    /// assert_eq!(product.ratio(), Some((15, 1)));
    /// ```
    pub fn product<'a>(factors: impl IntoIterator<Item = &'a Microtone> + Clone) -> Self {
        let frequency = factors
            .clone()
            .into_iter()
            .map(Microtone::frequency)
            .product::<f64>();

        let ratio = factors
            .into_iter()
            .map(|factor| factor.ratio)
            .collect::<Option<Vec<_>>>()
            .and_then(|ratios| {
                let numer = math::checked_product(ratios.iter().map(|&(numer, _)| numer))?;
                let denom = math::checked_product(ratios.iter().map(|&(_, denom)| denom))?;
                Some(math::simplify_u64(numer, denom))
            });

        Self::from_parts(ratio, frequency)
    }

    /// Creates the quotient microtone `numer` / `denom`.
    pub fn quotient(numer: &Microtone, denom: &Microtone) -> Self {
        let frequency = numer.frequency / denom.frequency;

        let ratio = match (numer.ratio, denom.ratio) {
            (Some((n1, d1)), Some((n2, d2))) => n1
                .checked_mul(d2)
                .zip(d1.checked_mul(n2))
                .map(|(numer, denom)| math::simplify_u64(numer, denom)),
            _ => None,
        };

        Self::from_parts(ratio, frequency)
    }

    fn from_parts(ratio: Option<(u64, u64)>, frequency: f64) -> Self {
        assert!(
            frequency.is_finite() && frequency > 0.0,
            "Frequency must be finite and positive but was {}",
            frequency
        );
        let description = match ratio {
            Some((numer, denom)) => fraction_description(numer, denom),
            None => float_description(frequency),
        };
        Self {
            ratio,
            pitch: frequency.log2().rem_euclid(1.0),
            frequency,
            description,
            subset_key: String::new(),
        }
    }

    /// The canonical pitch value in `[0, 1)`, i.e. log2 of the frequency ratio
    /// reduced against the active period.
    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    /// The raw Hz-like scalar this microtone was created from.
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// The reduced rational representation, if one exists.
    pub fn ratio(&self) -> Option<(u64, u64)> {
        self.ratio
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Correlates a diamond-subset tone back to its lattice menu entry. Empty when unused.
    pub fn subset_key(&self) -> &str {
        &self.subset_key
    }

    pub fn with_subset_key(mut self, subset_key: impl Into<String>) -> Self {
        self.subset_key = subset_key.into();
        self
    }

    /// Returns a copy whose pitch is reduced into `[0, 1)` against the given period.
    ///
    /// For the pure octave, a rational representation is brought into `[1, 2)` as
    /// well, so that e.g. the third harmonic reads as `3/2`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use assert_approx_eq::assert_approx_eq;
    /// # use combtune::microtone::Microtone;
    /// # use combtune::ratio::Ratio;
    /// let reduced = Microtone::from_frequency(21.0).octave_reduced(Ratio::octave());
    /// assert_eq!(reduced.ratio(), Some((21, 16)));
    /// assert_approx_eq!(reduced.pitch(), 21.0f64.log2() - 4.0);
    /// ```
    pub fn octave_reduced(&self, period: Ratio) -> Microtone {
        let pitch = (self.frequency.log2() / period.as_octaves()).rem_euclid(1.0);

        let ratio = if period == Ratio::octave() {
            self.ratio.and_then(reduce_into_octave)
        } else {
            self.ratio
        };

        let description = match ratio {
            Some((numer, denom)) => fraction_description(numer, denom),
            None => self.description.clone(),
        };

        Microtone {
            ratio,
            pitch,
            frequency: self.frequency,
            description,
            subset_key: self.subset_key.clone(),
        }
    }

    /// Checks whether two microtones sound the same, i.e. their pitches differ by
    /// less than [`EPSILON`].
    pub fn is_close(&self, other: &Microtone) -> bool {
        (self.pitch - other.pitch).abs() < EPSILON
    }
}

impl Display for Microtone {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.pad(&self.description)
    }
}

fn as_integer(value: f64) -> Option<u64> {
    (value.fract() == 0.0 && value >= 1.0 && value <= u64::MAX as f64).then(|| value as u64)
}

fn fraction_description(numer: u64, denom: u64) -> String {
    if denom == 1 {
        numer.to_string()
    } else {
        format!("{}/{}", numer, denom)
    }
}

fn float_description(value: f64) -> String {
    format!("{:.4}", value)
}

fn reduce_into_octave((mut numer, mut denom): (u64, u64)) -> Option<(u64, u64)> {
    while numer >= denom.checked_mul(2)? {
        denom = denom.checked_mul(2)?;
    }
    while numer < denom {
        numer = numer.checked_mul(2)?;
    }
    Some(math::simplify_u64(numer, denom))
}

/// An ordered collection of [`Microtone`]s.
///
/// Insertion order is significant until [`MicrotoneArray::sorted_by_pitch`] is
/// applied; uniqueness is a policy applied by the processing pipeline, not an
/// invariant. Arrays are built once per generator recompute and replaced
/// wholesale, never mutated in place by consumers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MicrotoneArray {
    tones: Vec<Microtone>,
}

impl MicrotoneArray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tones(tones: Vec<Microtone>) -> Self {
        Self { tones }
    }

    pub fn len(&self) -> usize {
        self.tones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tones.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Microtone> {
        self.tones.get(index)
    }

    pub fn tones(&self) -> &[Microtone] {
        &self.tones
    }

    pub fn iter(&self) -> impl Iterator<Item = &Microtone> {
        self.tones.iter()
    }

    pub fn pitches(&self) -> impl Iterator<Item = f64> + '_ {
        self.tones.iter().map(Microtone::pitch)
    }

    pub fn push(&mut self, tone: Microtone) {
        self.tones.push(tone);
    }

    /// Returns the concatenation of `self` and `other`, preserving order.
    pub fn union(mut self, other: MicrotoneArray) -> MicrotoneArray {
        self.tones.extend(other.tones);
        self
    }

    /// Returns a copy ordered by ascending pitch. The sort is stable, so tones
    /// of equal pitch keep their insertion order.
    pub fn sorted_by_pitch(&self) -> MicrotoneArray {
        let mut tones = self.tones.clone();
        tones.sort_by(|a, b| {
            a.pitch()
                .partial_cmp(&b.pitch())
                .expect("Comparison yielded an invalid result")
        });
        Self { tones }
    }

    /// Returns a copy without tones that duplicate the pitch of a previously
    /// kept tone. The first occurrence wins.
    pub fn uniquified(&self) -> MicrotoneArray {
        let mut tones = Vec::<Microtone>::new();
        for tone in &self.tones {
            if !tones.iter().any(|kept| kept.is_close(tone)) {
                tones.push(tone.clone());
            }
        }
        Self { tones }
    }

    /// Returns a copy with every tone's pitch reduced into `[0, 1)` against `period`.
    pub fn octave_reduced(&self, period: Ratio) -> MicrotoneArray {
        Self {
            tones: self
                .tones
                .iter()
                .map(|tone| tone.octave_reduced(period))
                .collect(),
        }
    }
}

impl FromIterator<Microtone> for MicrotoneArray {
    fn from_iter<T: IntoIterator<Item = Microtone>>(iter: T) -> Self {
        Self {
            tones: iter.into_iter().collect(),
        }
    }
}

/// Formats the tone descriptions separated by single spaces.
///
/// # Examples
///
/// ```
/// # use combtune::microtone::{Microtone, MicrotoneArray};
/// let array = MicrotoneArray::from_tones(vec![
///     Microtone::from_fraction(1, 1),
///     Microtone::from_fraction(5, 4),
///     Microtone::from_fraction(3, 2),
/// ]);
/// assert_eq!(array.to_string(), "1 5/4 3/2");
/// ```
impl Display for MicrotoneArray {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let mut first = true;
        for tone in &self.tones {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{}", tone)?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn pitch_is_octave_normalized() {
        assert_approx_eq!(Microtone::from_fraction(3, 1).pitch(), 0.5849625007);
        assert_approx_eq!(Microtone::from_fraction(3, 2).pitch(), 0.5849625007);
        assert_approx_eq!(Microtone::from_fraction(1, 3).pitch(), 0.4150374993);
        assert_approx_eq!(Microtone::from_frequency(2.0).pitch(), 0.0);
    }

    #[test]
    fn product_tracks_rational_representation() {
        let seeds = [
            Microtone::from_frequency(3.0),
            Microtone::from_frequency(5.0),
            Microtone::from_frequency(7.0),
        ];
        let product = Microtone::product(seeds.iter());
        assert_eq!(product.ratio(), Some((105, 1)));
        assert_approx_eq!(product.frequency(), 105.0);
    }

    #[test]
    fn product_overflow_drops_rational_representation() {
        let huge = Microtone::from_fraction(u64::MAX, 1);
        let product = Microtone::product([&huge, &huge]);
        assert_eq!(product.ratio(), None);
        assert!(product.frequency().is_finite());
    }

    #[test]
    fn quotient_of_seeds_is_a_fraction() {
        let quotient = Microtone::quotient(
            &Microtone::from_frequency(7.0),
            &Microtone::from_frequency(5.0),
        );
        assert_eq!(quotient.ratio(), Some((7, 5)));
        assert_eq!(quotient.to_string(), "7/5");
    }

    #[test]
    fn octave_reduction_rewrites_fractions() {
        let test_cases = [
            (3, 1, (3, 2)),
            (5, 1, (5, 4)),
            (7, 1, (7, 4)),
            (15, 1, (15, 8)),
            (21, 1, (21, 16)),
            (35, 1, (35, 32)),
            (1, 3, (4, 3)),
            (2, 1, (1, 1)),
        ];

        for (numer, denom, expected) in test_cases {
            let reduced = Microtone::from_fraction(numer, denom).octave_reduced(Ratio::octave());
            assert_eq!(reduced.ratio(), Some(expected), "{}/{}", numer, denom);
        }
    }

    #[test]
    fn uniquify_keeps_first_occurrence() {
        let array = MicrotoneArray::from_tones(vec![
            Microtone::from_fraction(3, 2),
            Microtone::from_fraction(1, 1),
            Microtone::from_fraction(6, 4),
            Microtone::from_fraction(5, 4),
            Microtone::from_fraction(2, 2),
        ]);

        let uniquified = array.uniquified();
        assert_eq!(uniquified.len(), 3);
        assert_eq!(uniquified.to_string(), "3/2 1 5/4");
    }

    #[test]
    fn sort_is_stable() {
        let mut first = Microtone::from_fraction(3, 2);
        first = first.with_subset_key("first");
        let second = Microtone::from_fraction(3, 2).with_subset_key("second");

        let sorted = MicrotoneArray::from_tones(vec![
            first,
            Microtone::from_fraction(5, 4),
            second,
        ])
        .sorted_by_pitch();

        assert_eq!(sorted.get(0).unwrap().subset_key(), "");
        assert_eq!(sorted.get(1).unwrap().subset_key(), "first");
        assert_eq!(sorted.get(2).unwrap().subset_key(), "second");
    }
}
