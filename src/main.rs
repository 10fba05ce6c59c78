use std::path::PathBuf;

use clap::Parser;
use cost_calculator::generate::{self, DEFAULT_OUTPUT, GenerateOptions};
use cost_calculator::{CalculatorError, Result};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose)?;

    let options = GenerateOptions {
        output: cli.output,
        manifest: cli.manifest,
        verify: cli.verify,
    };
    let summary = generate::generate(&options)?;
    print!("{summary}");
    Ok(())
}

fn init_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("cost_calculator=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| CalculatorError::Logging(error.to_string()))
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Generate the AI product cost calculator workbook."
)]
struct Cli {
    /// Output workbook path. An existing file is overwritten.
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Also write the laid-out workbook as JSON.
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Read the written workbook back and check every cell and reference.
    #[arg(long)]
    verify: bool,

    /// Log each build step to stderr.
    #[arg(short, long)]
    verbose: bool,
}
