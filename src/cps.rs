//! Combination product sets: scales built from the k-of-n products of a set
//! of seed values.

use crate::math;
use crate::microtone::{Microtone, MicrotoneArray, SeedName};
use crate::pipeline::{self, NpoMapping, ProcessOptions};
use crate::ratio::Ratio;
use crate::tuning::{self, Tuning, UpdateCallback};
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

// Duplicate products are musically meaningful multiplicities, hence no uniquify.
const PROCESS: ProcessOptions = ProcessOptions {
    octave_reduce: true,
    sort: true,
    uniquify: false,
};

/// The 15 supported combination product set families.
///
/// Invalid `(n, k)` selections are unrepresentable; the stellated hexany is a
/// fixed composite construction rather than a plain k-of-n family.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum CpsFamily {
    Cps3_1,
    Cps3_2,
    Cps4_1,
    Cps4_2,
    Cps4_3,
    StellatedHexany,
    Cps5_1,
    Cps5_2,
    Cps5_3,
    Cps5_4,
    Cps6_1,
    Cps6_2,
    Cps6_3,
    Cps6_4,
    Cps6_5,
}

impl CpsFamily {
    pub const ALL: [CpsFamily; 15] = [
        CpsFamily::Cps3_1,
        CpsFamily::Cps3_2,
        CpsFamily::Cps4_1,
        CpsFamily::Cps4_2,
        CpsFamily::Cps4_3,
        CpsFamily::StellatedHexany,
        CpsFamily::Cps5_1,
        CpsFamily::Cps5_2,
        CpsFamily::Cps5_3,
        CpsFamily::Cps5_4,
        CpsFamily::Cps6_1,
        CpsFamily::Cps6_2,
        CpsFamily::Cps6_3,
        CpsFamily::Cps6_4,
        CpsFamily::Cps6_5,
    ];

    /// The number of seeds the family consumes.
    pub fn num_seeds(self) -> usize {
        match self {
            CpsFamily::Cps3_1 | CpsFamily::Cps3_2 => 3,
            CpsFamily::Cps4_1
            | CpsFamily::Cps4_2
            | CpsFamily::Cps4_3
            | CpsFamily::StellatedHexany => 4,
            CpsFamily::Cps5_1 | CpsFamily::Cps5_2 | CpsFamily::Cps5_3 | CpsFamily::Cps5_4 => 5,
            CpsFamily::Cps6_1
            | CpsFamily::Cps6_2
            | CpsFamily::Cps6_3
            | CpsFamily::Cps6_4
            | CpsFamily::Cps6_5 => 6,
        }
    }

    /// The number of seeds multiplied per product, or `None` for the stellated
    /// hexany composite.
    pub fn choose(self) -> Option<usize> {
        match self {
            CpsFamily::Cps3_1 | CpsFamily::Cps4_1 | CpsFamily::Cps5_1 | CpsFamily::Cps6_1 => {
                Some(1)
            }
            CpsFamily::Cps3_2 | CpsFamily::Cps4_2 | CpsFamily::Cps5_2 | CpsFamily::Cps6_2 => {
                Some(2)
            }
            CpsFamily::Cps4_3 | CpsFamily::Cps5_3 | CpsFamily::Cps6_3 => Some(3),
            CpsFamily::Cps5_4 | CpsFamily::Cps6_4 => Some(4),
            CpsFamily::Cps6_5 => Some(5),
            CpsFamily::StellatedHexany => None,
        }
    }

    /// The family name in `k)n` notation, e.g. `2)4 hexany`.
    pub fn name(self) -> &'static str {
        match self {
            CpsFamily::Cps3_1 => "1)3 triad",
            CpsFamily::Cps3_2 => "2)3 triad",
            CpsFamily::Cps4_1 => "1)4 tetrad",
            CpsFamily::Cps4_2 => "2)4 hexany",
            CpsFamily::Cps4_3 => "3)4 tetrad",
            CpsFamily::StellatedHexany => "stellated hexany",
            CpsFamily::Cps5_1 => "1)5 pentad",
            CpsFamily::Cps5_2 => "2)5 dekany",
            CpsFamily::Cps5_3 => "3)5 dekany",
            CpsFamily::Cps5_4 => "4)5 pentad",
            CpsFamily::Cps6_1 => "1)6 hexad",
            CpsFamily::Cps6_2 => "2)6 pentadekany",
            CpsFamily::Cps6_3 => "3)6 eikosany",
            CpsFamily::Cps6_4 => "4)6 pentadekany",
            CpsFamily::Cps6_5 => "5)6 hexad",
        }
    }
}

impl Display for CpsFamily {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Families can be selected as `<n>:<k>` (e.g. `4:2`) or by their common
/// names `hexany`, `eikosany` and `stellated` / `mandala`.
///
/// # Examples
///
/// ```
/// # use combtune::cps::CpsFamily;
/// assert_eq!("4:2".parse::<CpsFamily>().unwrap(), CpsFamily::Cps4_2);
/// assert_eq!("hexany".parse::<CpsFamily>().unwrap(), CpsFamily::Cps4_2);
/// assert_eq!("mandala".parse::<CpsFamily>().unwrap(), CpsFamily::StellatedHexany);
/// assert!("4:4".parse::<CpsFamily>().is_err());
/// ```
impl FromStr for CpsFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "3:1" => Ok(CpsFamily::Cps3_1),
            "3:2" => Ok(CpsFamily::Cps3_2),
            "4:1" => Ok(CpsFamily::Cps4_1),
            "4:2" | "hexany" => Ok(CpsFamily::Cps4_2),
            "4:3" => Ok(CpsFamily::Cps4_3),
            "stellated" | "stellated-hexany" | "mandala" => Ok(CpsFamily::StellatedHexany),
            "5:1" => Ok(CpsFamily::Cps5_1),
            "5:2" => Ok(CpsFamily::Cps5_2),
            "5:3" => Ok(CpsFamily::Cps5_3),
            "5:4" => Ok(CpsFamily::Cps5_4),
            "6:1" => Ok(CpsFamily::Cps6_1),
            "6:2" => Ok(CpsFamily::Cps6_2),
            "6:3" | "eikosany" => Ok(CpsFamily::Cps6_3),
            "6:4" => Ok(CpsFamily::Cps6_4),
            "6:5" => Ok(CpsFamily::Cps6_5),
            other => Err(format!(
                "Unknown CPS family '{}': Must be <n>:<k> with n in 3..=6 and 1 <= k < n \
                 (e.g. 4:2), hexany, eikosany, stellated or mandala",
                other
            )),
        }
    }
}

/// Reasons a [`Cps`] request is rejected at the API boundary.
#[derive(Clone, Debug, PartialEq)]
pub enum CpsError {
    /// Fewer seed values than the family consumes.
    NotEnoughSeeds { expected: usize, actual: usize },
    /// A seed slot beyond the family's seed count was addressed.
    SeedNameOutOfRange { name: SeedName, num_seeds: usize },
    /// A seed value that is not a finite positive number.
    SeedOutOfRange { value: f64 },
}

/// The combination product set generator.
///
/// The combination topology (which seed indices are multiplied together) is
/// fixed per family and computed once; editing a seed value reruns only the
/// multiplications and the processing pipeline.
///
/// # Examples
///
/// ```
/// # use combtune::cps::{Cps, CpsFamily};
/// # use combtune::tuning::Tuning;
/// let hexany = Cps::new(CpsFamily::Cps4_2, &[1.0, 3.0, 5.0, 7.0]).unwrap();
/// assert_eq!(hexany.raw().to_string(), "3 5 7 15 21 35");
/// assert_eq!(hexany.processed().to_string(), "35/32 5/4 21/16 3/2 7/4 15/8");
/// ```
pub struct Cps {
    family: CpsFamily,
    seeds: Vec<Microtone>,
    combinations: Vec<Vec<usize>>,
    npo_override: Option<u32>,
    raw: MicrotoneArray,
    processed: MicrotoneArray,
    npo: NpoMapping,
    on_update: Option<UpdateCallback>,
}

impl std::fmt::Debug for Cps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cps")
            .field("family", &self.family)
            .field("seeds", &self.seeds)
            .field("combinations", &self.combinations)
            .field("npo_override", &self.npo_override)
            .field("raw", &self.raw)
            .field("processed", &self.processed)
            .field("npo", &self.npo)
            .field("on_update", &self.on_update.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

impl Cps {
    /// Creates a generator for the given family.
    ///
    /// Only the first `n` seed values are used; extra values are ignored.
    pub fn new(family: CpsFamily, seed_frequencies: &[f64]) -> Result<Cps, CpsError> {
        let expected = family.num_seeds();
        if seed_frequencies.len() < expected {
            return Err(CpsError::NotEnoughSeeds {
                expected,
                actual: seed_frequencies.len(),
            });
        }

        let seeds = seed_frequencies[..expected]
            .iter()
            .map(|&value| checked_seed(value))
            .collect::<Result<Vec<_>, _>>()?;

        let combinations = match family.choose() {
            Some(k) => math::combinations(expected, k),
            // The stellated hexany extends the plain hexany topology.
            None => math::combinations(expected, 2),
        };

        let mut cps = Cps {
            family,
            seeds,
            combinations,
            npo_override: None,
            raw: MicrotoneArray::new(),
            processed: MicrotoneArray::new(),
            npo: pipeline::apply_npo_override(&MicrotoneArray::new(), None),
            on_update: None,
        };
        cps.recompute();
        Ok(cps)
    }

    pub fn family(&self) -> CpsFamily {
        self.family
    }

    pub fn seeds(&self) -> &[Microtone] {
        &self.seeds
    }

    /// The raw product array before any processing. Its length is `C(n, k)`
    /// for the plain families and 14 for the stellated hexany.
    pub fn raw(&self) -> &MicrotoneArray {
        &self.raw
    }

    /// The map from notes-per-octave override index to processed index.
    pub fn npo_index_map(&self) -> &[usize] {
        self.npo.index_map()
    }

    pub fn npo_reason(&self) -> Option<&str> {
        self.npo.reason()
    }

    /// Replaces the value of one seed and recomputes the scale. The
    /// combination topology is reused.
    pub fn set_seed(&mut self, name: SeedName, frequency: f64) -> Result<(), CpsError> {
        let num_seeds = self.seeds.len();
        if name.index() >= num_seeds {
            return Err(CpsError::SeedNameOutOfRange { name, num_seeds });
        }
        self.seeds[name.index()] = checked_seed(frequency)?;
        self.recompute();
        Ok(())
    }

    pub fn set_npo_override(&mut self, npo_override: Option<u32>) {
        self.npo_override = npo_override;
        self.npo = pipeline::apply_npo_override(&self.processed, self.npo_override);
        tuning::notify(&mut self.on_update);
    }

    pub fn set_on_tuning_update(&mut self, callback: Option<UpdateCallback>) {
        self.on_update = callback;
    }

    fn recompute(&mut self) {
        let mut raw = MicrotoneArray::new();

        for combination in &self.combinations {
            let factors = combination
                .iter()
                .map(|&index| &self.seeds[index])
                .collect::<Vec<_>>();
            raw.push(Microtone::product(factors));
        }

        if self.family == CpsFamily::StellatedHexany {
            // Stellation: per seed, the square s*s and the complement (A*B*C*D)/s^2.
            let product_all = Microtone::product(self.seeds.iter());
            for seed in &self.seeds {
                let square = Microtone::product([seed, seed]);
                let complement = Microtone::quotient(&product_all, &square);
                raw.push(square);
                raw.push(complement);
            }
        }

        self.raw = raw;
        self.processed = pipeline::process(&self.raw, Ratio::octave(), PROCESS);
        self.npo = pipeline::apply_npo_override(&self.processed, self.npo_override);
        tuning::notify(&mut self.on_update);
    }
}

impl Tuning for Cps {
    fn processed(&self) -> &MicrotoneArray {
        &self.processed
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
        format!("{} {}", self.family, seeds)
    }
}

fn checked_seed(value: f64) -> Result<Microtone, CpsError> {
    if value.is_finite() && value > 0.0 {
        Ok(Microtone::from_frequency(value))
    } else {
        Err(CpsError::SeedOutOfRange { value })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    const SEEDS: [f64; 6] = [1.0, 3.0, 5.0, 7.0, 9.0, 11.0];

    #[test]
    fn raw_tone_count_is_the_binomial_coefficient() {
        let expected_counts = [
            (CpsFamily::Cps3_1, 3),
            (CpsFamily::Cps3_2, 3),
            (CpsFamily::Cps4_1, 4),
            (CpsFamily::Cps4_2, 6),
            (CpsFamily::Cps4_3, 4),
            (CpsFamily::StellatedHexany, 14),
            (CpsFamily::Cps5_1, 5),
            (CpsFamily::Cps5_2, 10),
            (CpsFamily::Cps5_3, 10),
            (CpsFamily::Cps5_4, 5),
            (CpsFamily::Cps6_1, 6),
            (CpsFamily::Cps6_2, 15),
            (CpsFamily::Cps6_3, 20),
            (CpsFamily::Cps6_4, 15),
            (CpsFamily::Cps6_5, 6),
        ];

        for (family, expected) in expected_counts {
            let cps = Cps::new(family, &SEEDS).unwrap();
            assert_eq!(cps.raw().len(), expected, "{}", family);
            assert_eq!(cps.processed().len(), expected, "{}", family);
        }
    }

    #[test]
    fn hexany_products_of_1_3_5_7() {
        let hexany = Cps::new(CpsFamily::Cps4_2, &[1.0, 3.0, 5.0, 7.0]).unwrap();

        assert_eq!(hexany.raw().to_string(), "3 5 7 15 21 35");
        assert_eq!(
            hexany.processed().to_string(),
            "35/32 5/4 21/16 3/2 7/4 15/8"
        );
        // All six pitches are distinct after reduction.
        assert_eq!(hexany.processed().uniquified().len(), 6);
    }

    #[test]
    fn stellated_hexany_adds_squares_and_complements() {
        let mandala = Cps::new(CpsFamily::StellatedHexany, &[1.0, 3.0, 5.0, 7.0]).unwrap();

        assert_eq!(
            mandala.raw().to_string(),
            "3 5 7 15 21 35 1 105 9 35/3 25 21/5 49 15/7"
        );
        assert_eq!(mandala.processed().len(), 14);
        assert_eq!(mandala.processed().uniquified().len(), 14);
    }

    #[test]
    fn seed_edit_reuses_the_combination_topology() {
        let mut hexany = Cps::new(CpsFamily::Cps4_2, &[1.0, 3.0, 5.0, 7.0]).unwrap();

        hexany.set_seed(SeedName::A, 11.0).unwrap();

        assert_eq!(hexany.raw().len(), 6);
        assert_eq!(hexany.raw().to_string(), "33 55 77 15 21 35");
    }

    #[test]
    fn equal_seeds_are_a_valid_degenerate_case() {
        let hexany = Cps::new(CpsFamily::Cps4_2, &[1.0, 1.0, 1.0, 1.0]).unwrap();

        assert_eq!(hexany.processed().len(), 6);
        assert_eq!(hexany.processed().uniquified().len(), 1);
    }

    #[test]
    fn preconditions_are_rejected() {
        assert_eq!(
            Cps::new(CpsFamily::Cps6_3, &[1.0, 3.0]).unwrap_err(),
            CpsError::NotEnoughSeeds {
                expected: 6,
                actual: 2
            }
        );
        assert_eq!(
            Cps::new(CpsFamily::Cps3_1, &[1.0, 3.0, -5.0]).unwrap_err(),
            CpsError::SeedOutOfRange { value: -5.0 }
        );

        let mut triad = Cps::new(CpsFamily::Cps3_1, &[1.0, 3.0, 5.0]).unwrap();
        assert_eq!(
            triad.set_seed(SeedName::D, 7.0).unwrap_err(),
            CpsError::SeedNameOutOfRange {
                name: SeedName::D,
                num_seeds: 3
            }
        );
    }

    #[test]
    fn parameter_description_is_stable() {
        let first = Cps::new(CpsFamily::Cps4_2, &[1.0, 3.0, 5.0, 7.0]).unwrap();
        let second = Cps::new(CpsFamily::Cps4_2, &[1.0, 3.0, 5.0, 7.0]).unwrap();

        assert_eq!(first.parameter_description(), "2)4 hexany A=1 B=3 C=5 D=7");
        assert_eq!(
            first.parameter_description(),
            second.parameter_description()
        );
    }

    #[test]
    fn update_callback_fires_synchronously() {
        let num_updates = Rc::new(Cell::new(0));
        let observed = Rc::clone(&num_updates);

        let mut hexany = Cps::new(CpsFamily::Cps4_2, &[1.0, 3.0, 5.0, 7.0]).unwrap();
        hexany.set_on_tuning_update(Some(Box::new(move || {
            observed.set(observed.get() + 1);
        })));

        hexany.set_seed(SeedName::B, 13.0).unwrap();
        hexany.set_npo_override(Some(12));

        assert_eq!(num_updates.get(), 2);
    }

    #[test]
    fn npo_override_round_trip() {
        let mut hexany = Cps::new(CpsFamily::Cps4_2, &[1.0, 3.0, 5.0, 7.0]).unwrap();

        hexany.set_npo_override(None);
        assert_eq!(hexany.processed_npo(), hexany.processed());
        assert_eq!(hexany.npo_index_map(), [0, 1, 2, 3, 4, 5]);

        hexany.set_npo_override(Some(12));
        assert_eq!(hexany.processed_npo().len(), 12);
    }
}
