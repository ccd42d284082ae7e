use combtune::diamond::{self, Diamond, Direction};
use combtune::ratio::Ratio;
use combtune::scala::Scl;
use combtune::tuning::Tuning;
use structopt::StructOpt;

use crate::dto::ScaleDto;
use crate::{print_scale, App, CliError, CliResult};

#[derive(StructOpt)]
pub(crate) struct DiamondOptions {
    /// Seed frequencies (A B C ...), filling the first slots of the default
    /// odd harmonics 1, 3, 5, 7, 9, 11, 13, 15
    seeds: Vec<f64>,

    /// Permanent scale index (0-71)
    #[structopt(long = "index", default_value = "0")]
    index: u8,

    /// Replay arrow moves from the selected scale, e.g. ldru
    #[structopt(long = "walk", default_value = "")]
    walk: String,

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

impl DiamondOptions {
    pub fn run(&self, app: &mut App) -> CliResult<()> {
        let mut diamond = Diamond::new(&self.seeds)?;
        diamond.set_npo_override(self.npo);
        diamond.select_by_index(self.index)?;

        for step in self.walk.chars() {
            match step {
                'l' => diamond.step_left()?,
                'r' => diamond.step_right()?,
                'd' => diamond.step_down()?,
                'u' => diamond.step_up()?,
                other => {
                    return Err(CliError::CommandError(format!(
                        "Invalid walk step '{}': Must be one of l, r, d, u",
                        other
                    )))
                }
            };
        }

        let description = diamond.parameter_description();

        if self.scl {
            let scl =
                Scl::from_microtone_array(&description, diamond.processed(), Ratio::octave())?;
            return app.write(scl).map_err(Into::into);
        }

        if self.dump {
            return ScaleDto::from_scale(&description, diamond.processed_npo(), Ratio::octave())
                .write(app);
        }

        app.writeln(format_args!(
            "{} ({})",
            diamond.selected_name(),
            diamond.selected_index()
        ))?;
        print_scale(app, diamond.processed_npo(), Ratio::octave())?;

        for (direction, label) in [
            (Direction::Left, "left"),
            (Direction::Right, "right"),
            (Direction::Down, "down"),
            (Direction::Up, "up"),
        ] {
            let target = diamond.step(direction);
            app.writeln(format_args!(
                "{:>5} -> {} ({})",
                label,
                diamond::scale_name(target).map_err(|err| format!("{:?}", err))?,
                target
            ))?;
        }

        if let Some(reason) = diamond.npo_reason() {
            app.errln(reason)?;
        }
        Ok(())
    }
}
