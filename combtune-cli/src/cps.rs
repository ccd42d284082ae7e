use combtune::cps::{Cps, CpsFamily};
use combtune::ratio::Ratio;
use combtune::scala::Scl;
use combtune::tuning::Tuning;
use structopt::StructOpt;

use crate::dto::ScaleDto;
use crate::{print_scale, App, CliResult};

#[derive(StructOpt)]
pub(crate) struct CpsOptions {
    /// CPS family: <n>:<k> (e.g. 4:2), hexany, eikosany, stellated or mandala
    family: CpsFamily,

    /// Seed frequencies (A B C ...)
    seeds: Vec<f64>,

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

impl CpsOptions {
    pub fn run(&self, app: &mut App) -> CliResult<()> {
        let mut cps = Cps::new(self.family, &self.seeds)?;
        cps.set_npo_override(self.npo);

        let description = cps.parameter_description();

        if self.scl {
            let scl = Scl::from_microtone_array(&description, cps.processed(), Ratio::octave())?;
            return app.write(scl).map_err(Into::into);
        }

        if self.dump {
            return ScaleDto::from_scale(&description, cps.processed_npo(), Ratio::octave())
                .write(app);
        }

        app.writeln(description)?;
        print_scale(app, cps.processed_npo(), Ratio::octave())?;

        if let Some(reason) = cps.npo_reason() {
            app.errln(reason)?;
        }
        Ok(())
    }
}
