//! Moments of symmetry: scales built by iterating a two-interval
//! generator/period relation, after E. Wilson and V. Brun.

use crate::math;
use crate::microtone::{Microtone, MicrotoneArray, EPSILON};
use crate::pipeline::{self, NpoMapping, ProcessOptions};
use crate::ratio::Ratio;
use crate::tuning::{self, Tuning, UpdateCallback};

const PROCESS: ProcessOptions = ProcessOptions {
    octave_reduce: true,
    sort: true,
    uniquify: true,
};

/// Which geometric keyboard projection downstream rendering uses.
///
/// A presentation-only tag carried alongside the result; it has no effect on
/// the tone set.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum DisplayMode {
    #[default]
    Cartesian,
    Gral,
}

/// Reasons a [`Brun`] request is rejected at the API boundary.
#[derive(Clone, Debug, PartialEq)]
pub enum BrunError {
    /// The generator must lie in `0.0..=1.0` (a fraction of the period).
    /// Both ends are valid degenerate cases collapsing the scale to its root.
    GeneratorOutOfRange { generator: f64 },
    /// The period must be greater than 1.
    PeriodOutOfRange { period: f64 },
    /// At least one generator iteration is required.
    LevelOutOfRange { level: u32 },
}

/// The moments-of-symmetry generator.
///
/// Starting from pitch 0, the generator is added `level` times modulo the
/// period, producing `level + 1` raw tones. The processed scale therefore has
/// at most `level + 1` distinct pitches, fewer when the generator is a
/// low-order rational. The murchana rotation re-indexes the sorted scale so
/// that the chosen degree becomes the new root; it is applied after the
/// pipeline, not before.
///
/// # Examples
///
/// ```
/// # use combtune::brun::Brun;
/// # use combtune::ratio::Ratio;
/// # use combtune::tuning::Tuning;
/// // Six pure-fifth generations make a diatonic scale.
/// let brun = Brun::new(Ratio::from_float(1.5).as_octaves(), Ratio::octave(), 6).unwrap();
/// assert_eq!(brun.processed().len(), 7);
/// assert_eq!(brun.label_array().concat(), "LLLsLLs");
/// ```
pub struct Brun {
    generator: f64,
    period: Ratio,
    level: u32,
    level_gral: u32,
    murchana: i32,
    auto_murchana: bool,
    display_mode: DisplayMode,
    npo_override: Option<u32>,
    processed: MicrotoneArray,
    labels: Vec<String>,
    gral: MicrotoneArray,
    gral_labels: Vec<String>,
    npo: NpoMapping,
    on_update: Option<UpdateCallback>,
}

impl std::fmt::Debug for Brun {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Brun")
            .field("generator", &self.generator)
            .field("period", &self.period)
            .field("level", &self.level)
            .field("level_gral", &self.level_gral)
            .field("murchana", &self.murchana)
            .field("auto_murchana", &self.auto_murchana)
            .field("display_mode", &self.display_mode)
            .field("npo_override", &self.npo_override)
            .field("processed", &self.processed)
            .field("labels", &self.labels)
            .field("gral", &self.gral)
            .field("gral_labels", &self.gral_labels)
            .field("npo", &self.npo)
            .field("on_update", &self.on_update.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

impl Brun {
    /// Creates a generator with the given parameters. The murchana starts at
    /// 0, the alternate keyboard level equals `level`.
    pub fn new(generator: f64, period: Ratio, level: u32) -> Result<Brun, BrunError> {
        let mut brun = Brun {
            generator: checked_generator(generator)?,
            period: checked_period(period)?,
            level: checked_level(level)?,
            level_gral: level,
            murchana: 0,
            auto_murchana: false,
            display_mode: DisplayMode::default(),
            npo_override: None,
            processed: MicrotoneArray::new(),
            labels: Vec::new(),
            gral: MicrotoneArray::new(),
            gral_labels: Vec::new(),
            npo: pipeline::apply_npo_override(&MicrotoneArray::new(), None),
            on_update: None,
        };
        brun.recompute();
        Ok(brun)
    }

    pub fn generator(&self) -> f64 {
        self.generator
    }

    pub fn period(&self) -> Ratio {
        self.period
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn level_gral(&self) -> u32 {
        self.level_gral
    }

    /// The effective rotation. While auto-murchana is enabled this reflects
    /// the automatically chosen value.
    pub fn murchana(&self) -> i32 {
        self.murchana
    }

    pub fn auto_murchana(&self) -> bool {
        self.auto_murchana
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    /// The tone set of the alternate (Gral) keyboard layout, built from
    /// `level_gral` with the same generator, period and rotation rules.
    pub fn gral(&self) -> &MicrotoneArray {
        &self.gral
    }

    /// The MOS step pattern, one `"L"` or `"s"` per scale degree.
    pub fn label_array(&self) -> &[String] {
        &self.labels
    }

    pub fn gral_label_array(&self) -> &[String] {
        &self.gral_labels
    }

    /// The map from notes-per-octave override index to processed index.
    pub fn npo_index_map(&self) -> &[usize] {
        self.npo.index_map()
    }

    pub fn npo_reason(&self) -> Option<&str> {
        self.npo.reason()
    }

    pub fn set_generator(&mut self, generator: f64) -> Result<(), BrunError> {
        self.generator = checked_generator(generator)?;
        self.recompute();
        Ok(())
    }

    pub fn set_period(&mut self, period: Ratio) -> Result<(), BrunError> {
        self.period = checked_period(period)?;
        self.recompute();
        Ok(())
    }

    pub fn set_level(&mut self, level: u32) -> Result<(), BrunError> {
        self.level = checked_level(level)?;
        self.recompute();
        Ok(())
    }

    pub fn set_level_gral(&mut self, level_gral: u32) -> Result<(), BrunError> {
        self.level_gral = checked_level(level_gral)?;
        self.recompute();
        Ok(())
    }

    /// Sets the rotation in scale-degree units. Values of any sign are valid;
    /// the rotation is taken modulo the scale size. Ignored while
    /// auto-murchana is enabled.
    pub fn set_murchana(&mut self, murchana: i32) {
        self.murchana = murchana;
        self.recompute();
    }

    pub fn set_auto_murchana(&mut self, auto_murchana: bool) {
        self.auto_murchana = auto_murchana;
        self.recompute();
    }

    /// Presentation only; does not recompute the tone set.
    pub fn set_display_mode(&mut self, display_mode: DisplayMode) {
        self.display_mode = display_mode;
    }

    pub fn set_npo_override(&mut self, npo_override: Option<u32>) {
        self.npo_override = npo_override;
        let npo = pipeline::apply_npo_override(&self.processed, self.npo_override);
        self.npo = npo;
        tuning::notify(&mut self.on_update);
    }

    pub fn set_on_tuning_update(&mut self, callback: Option<UpdateCallback>) {
        self.on_update = callback;
    }

    fn recompute(&mut self) {
        let (processed, labels, murchana) = self.build_scale(self.level);
        self.processed = processed;
        self.labels = labels;
        if self.auto_murchana {
            self.murchana = murchana;
        }

        let (gral, gral_labels, _) = self.build_scale(self.level_gral);
        self.gral = gral;
        self.gral_labels = gral_labels;

        let npo = pipeline::apply_npo_override(&self.processed, self.npo_override);
        self.npo = npo;
        tuning::notify(&mut self.on_update);
    }

    fn build_scale(&self, level: u32) -> (MicrotoneArray, Vec<String>, i32) {
        let raw = (0..=level)
            .map(|step| Microtone::from_period_fraction(self.period, f64::from(step) * self.generator))
            .collect::<MicrotoneArray>();

        let sorted = pipeline::process(&raw, self.period, PROCESS);

        let rotation = if self.auto_murchana {
            // Center the generator chain: the tone generated at the middle
            // step becomes the root.
            let mid_pitch = (f64::from(level / 2) * self.generator).rem_euclid(1.0);
            sorted
                .pitches()
                .position(|pitch| (pitch - mid_pitch).abs() < EPSILON)
                .unwrap_or(0) as i32
        } else {
            self.murchana
        };

        let rotated = rotate(&sorted, self.period, rotation);
        let labels = step_labels(&rotated);
        (rotated, labels, rotation)
    }
}

impl Default for Brun {
    /// Six generations of the pure fifth within the octave.
    fn default() -> Self {
        Brun::new(Ratio::from_float(1.5).as_octaves(), Ratio::octave(), 6)
            .expect("Default parameters are valid")
    }
}

impl Tuning for Brun {
    fn processed(&self) -> &MicrotoneArray {
        &self.processed
    }

    fn processed_npo(&self) -> &MicrotoneArray {
        self.npo.array()
    }

    fn parameter_description(&self) -> String {
        format!(
            "brun generator={:.6} period={} level={} murchana={}",
            self.generator, self.period, self.level, self.murchana
        )
    }
}

fn checked_generator(generator: f64) -> Result<f64, BrunError> {
    if generator.is_finite() && (0.0..=1.0).contains(&generator) {
        Ok(generator)
    } else {
        Err(BrunError::GeneratorOutOfRange { generator })
    }
}

fn checked_period(period: Ratio) -> Result<Ratio, BrunError> {
    if period.as_float() > 1.0 {
        Ok(period)
    } else {
        Err(BrunError::PeriodOutOfRange {
            period: period.as_float(),
        })
    }
}

fn checked_level(level: u32) -> Result<u32, BrunError> {
    if level >= 1 {
        Ok(level)
    } else {
        Err(BrunError::LevelOutOfRange { level })
    }
}

fn rotate(sorted: &MicrotoneArray, period: Ratio, murchana: i32) -> MicrotoneArray {
    if sorted.is_empty() {
        return sorted.clone();
    }

    let len = sorted.len();
    let rotation = math::i32_rem_u(murchana, len as u32) as usize;
    let root = sorted.get(rotation).expect("Rotation in range").pitch();

    (0..len)
        .map(|degree| {
            let pitch = sorted
                .get((rotation + degree) % len)
                .expect("Degree in range")
                .pitch();
            Microtone::from_period_fraction(period, pitch - root)
        })
        .collect()
}

fn step_labels(scale: &MicrotoneArray) -> Vec<String> {
    let pitches = scale.pitches().collect::<Vec<_>>();
    if pitches.is_empty() {
        return Vec::new();
    }

    let mut steps = pitches
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .collect::<Vec<_>>();
    steps.push(1.0 - pitches[pitches.len() - 1] + pitches[0]);

    let smallest = steps.iter().copied().fold(f64::INFINITY, f64::min);
    let largest = steps.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if largest - smallest < EPSILON {
        // Equal-step scale, no small step to speak of.
        return vec!["L".to_owned(); steps.len()];
    }

    let threshold = (smallest + largest) / 2.0;
    steps
        .iter()
        .map(|&step| if step > threshold { "L" } else { "s" }.to_owned())
        .collect()
}
