//! Rendering of generated scales in the [Scala](http://www.huygens-fokker.org/scala/scl_format.html)
//! scale format.
//!
//! This is interop output for external tools. The engine itself performs no
//! file I/O; an [`Scl`] renders through [`Display`] and the caller decides
//! where the text goes.

use crate::microtone::MicrotoneArray;
use crate::ratio::Ratio;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

/// A scale in Scala interchange representation: a description, the pitch
/// values above the 1/1 and the period as the last value.
#[derive(Clone, Debug)]
pub struct Scl {
    description: String,
    period: Ratio,
    pitch_values: Vec<PitchValue>,
}

impl Scl {
    pub fn builder() -> SclBuilder {
        SclBuilder {
            period: Ratio::default(),
            pitch_values: Vec::new(),
        }
    }

    /// Converts a processed microtone array into its Scala representation.
    ///
    /// The unison is skipped (implicit in the format), rational tones render
    /// as fractions, non-rational tones as cents, and the period is appended
    /// as the final value.
    ///
    /// # Examples
    ///
    /// ```
    /// # use combtune::microtone::{Microtone, MicrotoneArray};
    /// # use combtune::ratio::Ratio;
    /// # use combtune::scala::Scl;
    /// let array = MicrotoneArray::from_tones(vec![
    ///     Microtone::from_fraction(1, 1),
    ///     Microtone::from_fraction(5, 4),
    ///     Microtone::from_fraction(3, 2),
    /// ]);
    ///
    /// let scl = Scl::from_microtone_array("major triad", &array, Ratio::octave()).unwrap();
    /// assert_eq!(
    ///     scl.to_string().lines().collect::<Vec<_>>(),
    ///     ["major triad", "3", "5/4", "3/2", "2/1"]
    /// );
    /// ```
    pub fn from_microtone_array(
        description: impl Into<String>,
        array: &MicrotoneArray,
        period: Ratio,
    ) -> Result<Scl, SclBuildError> {
        let mut builder = Scl::builder();

        for tone in array.iter() {
            if tone.pitch() == 0.0 {
                continue;
            }
            match tone.ratio() {
                Some((numer, denom)) => builder = builder.push_fraction(numer, denom),
                None => builder = builder.push_cents(tone.pitch() * period.as_cents()),
            }
        }

        if builder.pitch_values.is_empty() {
            return Err(SclBuildError::ScaleIsTrivial);
        }

        if period.as_float().fract() == 0.0 {
            builder = builder.push_fraction(period.as_float() as u64, 1);
        } else {
            builder = builder.push_cents(period.as_cents());
        }

        builder.build_with_description(description)
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The last pitch value, the interval of repetition.
    pub fn period(&self) -> Ratio {
        self.period
    }

    pub fn size(&self) -> usize {
        self.pitch_values.len()
    }
}

/// Renders the scale in `.scl` layout: description, tone count, one pitch
/// value per line.
impl Display for Scl {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        writeln!(f, "{}", self.description)?;
        writeln!(f, "{}", self.pitch_values.len())?;
        for pitch_value in &self.pitch_values {
            writeln!(f, "{}", pitch_value)?;
        }
        Ok(())
    }
}

pub struct SclBuilder {
    period: Ratio,
    pitch_values: Vec<PitchValue>,
}

impl SclBuilder {
    pub fn push_ratio(self, ratio: Ratio) -> Self {
        self.push_cents(ratio.as_cents())
    }

    pub fn push_cents(self, cents_value: f64) -> Self {
        self.push_pitch_value(PitchValue::Cents(cents_value))
    }

    pub fn push_fraction(self, numer: u64, denom: u64) -> Self {
        self.push_pitch_value(PitchValue::Fraction(numer, denom))
    }

    fn push_pitch_value(mut self, pitch_value: PitchValue) -> Self {
        self.period = pitch_value.as_ratio();
        self.pitch_values.push(pitch_value);
        self
    }

    pub fn build_with_description(
        self,
        description: impl Into<String>,
    ) -> Result<Scl, SclBuildError> {
        if self.period == Ratio::default() || self.pitch_values.is_empty() {
            return Err(SclBuildError::ScaleIsTrivial);
        }

        let out_of_range = self.pitch_values.iter().any(|pitch_value| {
            pitch_value.as_ratio() < Ratio::default() || pitch_value.as_ratio() > self.period
        });
        if out_of_range {
            return Err(SclBuildError::ItemOutOfRange);
        }

        Ok(Scl {
            description: description.into(),
            period: self.period,
            pitch_values: self.pitch_values,
        })
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SclBuildError {
    /// The scale does not contain any items except for the implicit unison.
    ScaleIsTrivial,

    /// The scale contains an item below the unison or above the period.
    ItemOutOfRange,
}

#[derive(Copy, Clone, Debug)]
enum PitchValue {
    Cents(f64),
    Fraction(u64, u64),
}

impl PitchValue {
    fn as_ratio(self) -> Ratio {
        match self {
            PitchValue::Cents(cents_value) => Ratio::from_cents(cents_value),
            PitchValue::Fraction(numer, denom) => {
                Ratio::from_float(numer as f64 / denom as f64)
            }
        }
    }
}

impl Display for PitchValue {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            PitchValue::Cents(cents) => write!(f, "{:.3}", cents),
            PitchValue::Fraction(numer, denom) => write!(f, "{}/{}", numer, denom),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::brun::Brun;
    use crate::cps::{Cps, CpsFamily};
    use crate::tuning::Tuning;

    #[test]
    fn hexany_renders_as_fractions() {
        let hexany = Cps::new(CpsFamily::Cps4_2, &[1.0, 3.0, 5.0, 7.0]).unwrap();

        let scl =
            Scl::from_microtone_array("hexany 1-3-5-7", hexany.processed(), Ratio::octave())
                .unwrap();

        assert_eq!(
            scl.to_string().lines().collect::<Vec<_>>(),
            [
                "hexany 1-3-5-7",
                "7",
                "35/32",
                "5/4",
                "21/16",
                "3/2",
                "7/4",
                "15/8",
                "2/1",
            ]
        );
    }

    #[test]
    fn mos_scales_render_as_cents() {
        let brun = Brun::new(0.25, Ratio::octave(), 3).unwrap();

        let scl = Scl::from_microtone_array("4-step chain", brun.processed(), Ratio::octave())
            .unwrap();

        assert_eq!(
            scl.to_string().lines().collect::<Vec<_>>(),
            ["4-step chain", "4", "300.000", "600.000", "900.000", "2/1"]
        );
    }

    #[test]
    fn empty_scales_are_trivial() {
        assert_eq!(
            Scl::from_microtone_array("empty", &MicrotoneArray::new(), Ratio::octave())
                .unwrap_err(),
            SclBuildError::ScaleIsTrivial
        );
    }
}
