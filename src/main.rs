//! `dml`: parses a DML file and prints it as JSON.
//!
//! Usage:
//!   dml path/to/config.dml
//!   dml --strict --compact path/to/config.dml
//!
//! Parse failures are reported as `Error: <message>` and do not change the
//! exit status. Only a bad command line exits with 1.
//!
//! Output escapes non-ASCII characters as `\uXXXX` and writes infinite or
//! NaN floats as `Infinity`, `-Infinity` and `NaN`.

use anyhow::{anyhow, Result};
use clap::error::ErrorKind;
use clap::Parser;
use dml_parser::{parse_file_with, ParseOptions, StringifyOptions, DEFAULT_MAX_DEPTH};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: dml <path_to_dml_file>";

#[derive(Parser)]
#[command(name = "dml", version)]
#[command(about = "Parse a DML file and print it as JSON")]
struct Cli {
    /// DML file to parse
    path: PathBuf,

    /// Fail on characters that no token accepts instead of skipping them
    #[arg(long)]
    strict: bool,

    /// Maximum nesting depth of objects and arrays
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Print single-line JSON instead of indented JSON
    #[arg(long)]
    compact: bool,
}

impl Cli {
    fn options(&self) -> ParseOptions {
        ParseOptions::default()
            .with_strict(self.strict)
            .with_max_depth(self.max_depth)
    }

    fn output_options(&self) -> StringifyOptions {
        StringifyOptions::default()
            .with_pretty(!self.compact)
            .with_ascii_only(true)
            .with_non_finite(true)
    }
}

fn run(cli: &Cli) -> Result<String> {
    let value = parse_file_with(&cli.path, &cli.options())?;
    value
        .stringify_with(&cli.output_options())
        .map_err(|_| anyhow!("failed to render {} as JSON", cli.path.display()))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            println!("{USAGE}");
            eprint!("{err}");
            return ExitCode::from(1);
        }
    };

    match run(&cli) {
        Ok(json) => {
            println!("Parsed DML:");
            println!("{json}");
        }
        Err(err) => {
            tracing::debug!(path = %cli.path.display(), "failed to parse");
            println!("Error: {err}");
        }
    }
    ExitCode::SUCCESS
}
