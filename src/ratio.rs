//! Linear and logarithmic operations on frequency ratios.

use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

/// Struct representing the relative distance between two pitches.
///
/// Mathematically, this distance can be interpreted as the factor between the two pitches in
/// linear frequency space or as the offset between them in logarithmic frequency space.
/// Conversions between the representations are available via `from_<repr1>` and `as_<repr2>`
/// where `<reprN>` can be a linear (`float`) or logarithmic (`cents`, `octaves`) quantity.
///
/// # Examples
///
/// ```
/// # use assert_approx_eq::assert_approx_eq;
/// # use combtune::ratio::Ratio;
/// assert_approx_eq!(Ratio::from_float(1.5).as_cents(), 701.955, 0.001);
/// assert_approx_eq!(Ratio::from_cents(1200.0).as_octaves(), 1.0);
/// assert_approx_eq!(Ratio::from_octaves(3.0).as_float(), 8.0);
/// ```
///
/// # Panics
///
/// Panics if the *linear* value is not a finite positive number.
///
/// ```should_panic
/// # use combtune::ratio::Ratio;
/// Ratio::from_float(0.0); // Should be positive
/// ```
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct Ratio {
    float_value: f64,
}

impl Ratio {
    pub fn from_float(float_value: f64) -> Self {
        assert!(
            float_value.is_finite() && float_value > 0.0,
            "Ratio must be finite and positive but was {}",
            float_value
        );
        Self { float_value }
    }

    pub fn from_cents(cents_value: f64) -> Self {
        Self::from_octaves(cents_value / 1200.0)
    }

    pub fn from_octaves(octaves: impl Into<f64>) -> Self {
        Self::from_float(octaves.into().exp2())
    }

    pub fn octave() -> Self {
        Self::from_float(2.0)
    }

    pub fn as_float(self) -> f64 {
        self.float_value
    }

    pub fn as_cents(self) -> f64 {
        self.as_octaves() * 1200.0
    }

    pub fn as_octaves(self) -> f64 {
        self.float_value.log2()
    }

    /// ```
    /// # use assert_approx_eq::assert_approx_eq;
    /// # use combtune::ratio::Ratio;
    /// assert_approx_eq!(Ratio::from_float(4.0).inv().as_float(), 0.25);
    /// assert_approx_eq!(Ratio::from_cents(150.0).inv().as_cents(), -150.0);
    /// ```
    pub fn inv(self) -> Ratio {
        Self {
            float_value: 1.0 / self.float_value,
        }
    }

    /// Creates a new [`Ratio`] instance by applying `self` `num_repetitions` times.
    ///
    /// This reverses [`Ratio::divided_into_equal_steps`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use assert_approx_eq::assert_approx_eq;
    /// # use combtune::ratio::Ratio;
    /// assert_approx_eq!(Ratio::from_cents(200.0).repeated(3).as_cents(), 600.0);
    /// ```
    pub fn repeated(self, num_repetitions: impl Into<f64>) -> Ratio {
        Ratio::from_octaves(self.as_octaves() * num_repetitions.into())
    }

    /// Returns the [`Ratio`] resulting from dividing `self` into `num_steps` equal steps.
    ///
    /// This reverses [`Ratio::repeated`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use assert_approx_eq::assert_approx_eq;
    /// # use combtune::ratio::Ratio;
    /// assert_approx_eq!(Ratio::octave().divided_into_equal_steps(15).as_cents(), 80.0);
    /// ```
    pub fn divided_into_equal_steps(self, num_steps: impl Into<f64>) -> Ratio {
        Ratio::from_octaves(self.as_octaves() / num_steps.into())
    }

    /// Check whether the given [`Ratio`] is negligible.
    ///
    /// The threshold is around a 500th of a cent.
    ///
    /// # Examples
    ///
    /// ```
    /// # use combtune::ratio::Ratio;
    /// assert!(!Ratio::from_cents(0.002).is_negligible());
    /// assert!(Ratio::from_cents(0.001).is_negligible());
    /// assert!(Ratio::from_cents(0.000).is_negligible());
    /// assert!(Ratio::from_cents(-0.001).is_negligible());
    /// assert!(!Ratio::from_cents(-0.002).is_negligible());
    /// ```
    pub fn is_negligible(self) -> bool {
        (0.999999..1.000001).contains(&self.float_value)
    }
}

/// The default [`Ratio`] represents equivalence of two frequencies, i.e. no distance at all.
///
/// # Examples
///
/// ```
/// # use assert_approx_eq::assert_approx_eq;
/// # use combtune::ratio::Ratio;
/// assert_approx_eq!(Ratio::default().as_float(), 1.0); // Neutral element for multiplication
/// assert_approx_eq!(Ratio::default().as_cents(), 0.0); // Neutral element for addition
/// ```
impl Default for Ratio {
    fn default() -> Self {
        Self::from_float(1.0)
    }
}

/// [`Ratio`]s can be formatted as float or cents.
///
/// # Examples
///
/// ```
/// # use combtune::ratio::Ratio;
/// // As float
/// assert_eq!(format!("{}", Ratio::from_float(1.5)), "1.5000");
/// assert_eq!(format!("{:.2}", Ratio::from_float(1.0 / 1.5)), "0.67");
///
/// // As cents
/// assert_eq!(format!("{:#}", Ratio::from_float(1.5)), "+702.0c");
/// assert_eq!(format!("{:#.2}", Ratio::from_float(1.0 / 1.5)), "-701.96c");
/// ```
impl Display for Ratio {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let formatted = if f.alternate() {
            format!(
                "{:+.precision$}c",
                self.as_cents(),
                precision = f.precision().unwrap_or(1)
            )
        } else {
            format!(
                "{:.precision$}",
                self.as_float(),
                precision = f.precision().unwrap_or(4)
            )
        };
        f.pad_integral(true, "", &formatted)
    }
}

/// [`Ratio`]s can be parsed from floats (`1.5`), fractions (`3/2`) and cents values (`702c`).
///
/// # Examples
///
/// ```
/// # use assert_approx_eq::assert_approx_eq;
/// # use combtune::ratio::Ratio;
/// assert_approx_eq!("1.5".parse::<Ratio>().unwrap().as_float(), 1.5);
/// assert_approx_eq!("3/2".parse::<Ratio>().unwrap().as_float(), 1.5);
/// assert_approx_eq!("702c".parse::<Ratio>().unwrap().as_cents(), 702.0);
/// assert!("foo".parse::<Ratio>().is_err());
/// assert!("0".parse::<Ratio>().is_err());
/// ```
impl FromStr for Ratio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        let float_value = if let Some(cents) = s.strip_suffix('c') {
            let cents_value = cents
                .parse::<f64>()
                .map_err(|_| format!("Invalid cents value '{}'", cents))?;
            Ratio::from_cents(cents_value).as_float()
        } else if let Some((numer, denom)) = s.split_once('/') {
            let numer = numer
                .parse::<f64>()
                .map_err(|_| format!("Invalid numerator '{}'", numer))?;
            let denom = denom
                .parse::<f64>()
                .map_err(|_| format!("Invalid denominator '{}'", denom))?;
            numer / denom
        } else {
            s.parse::<f64>().map_err(|_| {
                format!(
                    "Invalid expression '{}': Must be a float (e.g. 1.5), \
                     fraction (e.g. 3/2) or cents value (e.g. 702c)",
                    s
                )
            })?
        };

        if float_value.is_finite() && float_value > 0.0 {
            Ok(Ratio { float_value })
        } else {
            Err(format!(
                "Invalid expression '{}': Evaluates to {} but should be positive",
                s, float_value
            ))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_successfully() {
        let test_cases = [
            ("1", 1.0000),
            ("99.9", 99.9000),
            ("10/3", 3.3333),
            ("3/2", 1.5000),
            ("0c", 1.0000),
            ("702c", 1.5000),
            ("-702c", 0.6666),
            ("1200c", 2.0000),
            (" 3/2 ", 1.5000),
        ];

        for (input, expected) in test_cases {
            let parsed = input.parse::<Ratio>().unwrap().as_float();
            assert!(
                (parsed - expected).abs() < 0.0001,
                "`{}` should evaluate to {} but was {:.4}",
                input,
                expected,
                parsed
            );
        }
    }

    #[test]
    fn parses_with_error() {
        let test_cases = [
            (
                "0.0",
                "Invalid expression '0.0': Evaluates to 0 but should be positive",
            ),
            (
                "-1.2345",
                "Invalid expression '-1.2345': Evaluates to -1.2345 but should be positive",
            ),
            ("1/0", "Invalid expression '1/0': Evaluates to inf"),
            ("1/x", "Invalid denominator 'x'"),
            ("xc", "Invalid cents value 'x'"),
        ];

        for (input, expected) in test_cases {
            let parse_error = input.parse::<Ratio>().unwrap_err();
            assert!(
                parse_error.starts_with(expected),
                "`{}` should fail with `{}` but was `{}`",
                input,
                expected,
                parse_error
            );
        }
    }
}
