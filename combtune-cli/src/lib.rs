mod cps;
mod diamond;
mod dto;
mod mos;

use std::{
    fmt::{self, Debug, Display},
    fs::File,
    io::{self, Write},
    path::PathBuf,
};

use combtune::brun::BrunError;
use combtune::cps::CpsError;
use combtune::diamond::DiamondError;
use combtune::microtone::MicrotoneArray;
use combtune::ratio::Ratio;
use combtune::scala::SclBuildError;
use cps::CpsOptions;
use diamond::DiamondOptions;
use mos::MosOptions;
use structopt::StructOpt;

#[derive(StructOpt)]
struct MainOptions {
    /// Write output to a file instead of stdout
    #[structopt(long = "--of")]
    output_file: Option<PathBuf>,

    #[structopt(subcommand)]
    command: MainCommand,
}

#[derive(StructOpt)]
enum MainCommand {
    /// Print a combination product set scale
    #[structopt(name = "cps")]
    Cps(CpsOptions),

    /// Print a diamond scale and its navigation neighborhood
    #[structopt(name = "diamond")]
    Diamond(DiamondOptions),

    /// Print a moment-of-symmetry scale
    #[structopt(name = "mos")]
    Mos(MosOptions),
}

impl MainOptions {
    fn run(self) -> CliResult<()> {
        let stdout = io::stdout();
        let output: Box<dyn Write> = match self.output_file {
            Some(output_file) => Box::new(File::create(output_file)?),
            None => Box::new(stdout.lock()),
        };

        let stderr = io::stderr();
        let error = Box::new(stderr.lock());

        let mut app = App { output, error };

        self.command.run(&mut app)
    }
}

impl MainCommand {
    fn run(self, app: &mut App) -> CliResult<()> {
        match self {
            MainCommand::Cps(options) => options.run(app),
            MainCommand::Diamond(options) => options.run(app),
            MainCommand::Mos(options) => options.run(app),
        }
    }
}

pub fn run_in_shell_env(args: impl IntoIterator<Item = String>) -> CliResult<()> {
    let options = match MainOptions::from_iter_safe(args) {
        Err(err) => {
            return if err.use_stderr() {
                Err(CliError::CommandError(err.message))
            } else {
                println!("{}", err);
                Ok(())
            };
        }
        Ok(options) => options,
    };

    options.run()
}

pub struct App<'a> {
    output: Box<dyn 'a + Write>,
    error: Box<dyn 'a + Write>,
}

impl App<'_> {
    pub fn write(&mut self, message: impl Display) -> io::Result<()> {
        write!(&mut self.output, "{}", message)
    }

    pub fn writeln(&mut self, message: impl Display) -> io::Result<()> {
        writeln!(&mut self.output, "{}", message)
    }

    pub fn errln(&mut self, message: impl Display) -> io::Result<()> {
        writeln!(&mut self.error, "{}", message)
    }
}

pub(crate) fn print_scale(
    app: &mut App,
    array: &MicrotoneArray,
    period: Ratio,
) -> io::Result<()> {
    for (index, tone) in array.iter().enumerate() {
        app.writeln(format_args!(
            "{:>3} | {:>10} | {:>9.3}c",
            index,
            tone,
            tone.pitch() * period.as_cents(),
        ))?;
    }
    Ok(())
}

pub type CliResult<T> = Result<T, CliError>;

pub enum CliError {
    IoError(io::Error),
    CommandError(String),
}

impl Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::IoError(err) => write!(f, "IO error / {}", err),
            CliError::CommandError(err) => write!(f, "The command failed / {}", err),
        }
    }
}

impl From<String> for CliError {
    fn from(v: String) -> Self {
        CliError::CommandError(v)
    }
}

impl From<io::Error> for CliError {
    fn from(v: io::Error) -> Self {
        CliError::IoError(v)
    }
}

impl From<CpsError> for CliError {
    fn from(v: CpsError) -> Self {
        CliError::CommandError(format!("Could not create CPS scale ({:?})", v))
    }
}

impl From<DiamondError> for CliError {
    fn from(v: DiamondError) -> Self {
        CliError::CommandError(format!("Could not create diamond scale ({:?})", v))
    }
}

impl From<BrunError> for CliError {
    fn from(v: BrunError) -> Self {
        CliError::CommandError(format!("Could not create MOS scale ({:?})", v))
    }
}

impl From<SclBuildError> for CliError {
    fn from(v: SclBuildError) -> Self {
        CliError::CommandError(format!("Could not render scl output ({:?})", v))
    }
}
