//! `devicetree-parse`: print an Apple device tree image in human readable form

mod error;
mod input;
mod output;

use adt::display::{print_tree, DisplayOptions, IndentStyle, PrintError, Width};
use clap::Parser;
use error::CliError;
use input::Input;
use log::LevelFilter;
use output::IoWriter;
use std::path::PathBuf;
use std::process;
use std::sync::OnceLock;
use stderr_log::StderrLogger;

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(
    name = "devicetree-parse",
    version,
    about = "Print an Apple device tree image in human readable form"
)]
struct Cli {
    /// Print property values in full instead of cutting them off
    #[arg(short = 'v')]
    verbose: bool,

    /// Draw tree lines instead of indenting with spaces
    #[arg(short = 't')]
    tree: bool,

    /// Most verbose level of diagnostics written to stderr
    #[arg(long, default_value = "warn")]
    log_level: LevelFilter,

    /// The device tree image, e.g. dumped from iBoot or kernel memory
    file: PathBuf,
}

impl Cli {
    fn display_options(&self) -> DisplayOptions {
        DisplayOptions {
            width: if self.verbose {
                Width::Unbounded
            } else {
                Width::DEFAULT
            },
            indent: if self.tree {
                IndentStyle::Tree
            } else {
                IndentStyle::Spaces
            },
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let input = Input::open(&cli.file)?;
    log::debug!("read {} bytes from {}", input.len(), cli.file.display());

    let stdout = std::io::stdout();
    let mut out = IoWriter::new(stdout.lock());
    let printed = print_tree(&input, &cli.display_options(), &mut out);
    match (printed, out.finish()) {
        (Ok(()), Ok(())) => Ok(()),
        (Ok(()) | Err(PrintError::Write), Err(e)) => Err(CliError::Output(e)),
        (Err(e), _) => Err(CliError::Print(e)),
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // help and version go to stdout and are not failures
            let _ = e.print();
            process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    let logger = LOGGER.get_or_init(|| StderrLogger::new(cli.log_level));
    if let Err(e) = logger.install() {
        eprintln!("devicetree-parse: could not install logger: {}", e);
    }

    if let Err(e) = run(&cli) {
        eprintln!("devicetree-parse: {}", e);
        process::exit(e.exit_code());
    }
}
