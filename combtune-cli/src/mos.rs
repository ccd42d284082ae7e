use combtune::brun::Brun;
use combtune::ratio::Ratio;
use combtune::scala::Scl;
use combtune::tuning::Tuning;
use structopt::StructOpt;

use crate::dto::ScaleDto;
use crate::{App, CliResult};

#[derive(StructOpt)]
pub(crate) struct MosOptions {
    /// Generator interval, e.g. 3/2 or 702c
    generator: Ratio,

    /// Period of the scale
    #[structopt(long = "per", default_value = "2.0")]
    period: Ratio,

    /// Number of generator iterations
    #[structopt(long = "level", default_value = "6")]
    level: u32,

    /// Rotation of the starting degree in scale-degree units
    #[structopt(long = "murchana", default_value = "0")]
    murchana: i32,

    /// Choose the rotation automatically so the generator chain is centered
    #[structopt(long = "auto")]
    auto: bool,

    /// Resample the scale onto this many notes per octave
    #[structopt(long = "npo")]
    npo: Option<u32>,

    /// Print the scale in Scala (.scl) format
    #[structopt(long = "scl")]
    scl: bool,

    /// Print the scale as a YAML scale dump
    #[structopt(long = "dump")]
    dump: bool,
}

impl MosOptions {
    pub fn run(&self, app: &mut App) -> CliResult<()> {
        let fraction =
            (self.generator.as_octaves() / self.period.as_octaves()).rem_euclid(1.0);

        let mut brun = Brun::new(fraction, self.period, self.level)?;
        brun.set_murchana(self.murchana);
        if self.auto {
            brun.set_auto_murchana(true);
        }
        brun.set_npo_override(self.npo);

        let description = brun.parameter_description();

        if self.scl {
            let scl = Scl::from_microtone_array(&description, brun.processed(), self.period)?;
            return app.write(scl).map_err(Into::into);
        }

        if self.dump {
            return ScaleDto::from_scale(&description, brun.processed_npo(), self.period)
                .write(app);
        }

        app.writeln(&description)?;
        for ((index, tone), label) in brun
            .processed()
            .iter()
            .enumerate()
            .zip(brun.label_array())
        {
            app.writeln(format_args!(
                "{:>3} | {:>10} | {:>9.3}c | {}",
                index,
                tone,
                tone.pitch() * self.period.as_cents(),
                label
            ))?;
        }
        app.writeln(format_args!("pattern {}", brun.label_array().concat()))?;

        if let Some(reason) = brun.npo_reason() {
            app.errln(reason)?;
        }
        Ok(())
    }
}
