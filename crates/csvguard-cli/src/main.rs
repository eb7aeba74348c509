//! csvguard - spreadsheet-safe CSV export
//!
//! Main entry point for the `csvguard` binary.

use std::process::ExitCode;

use clap::Parser;

use csvguard_common_log::LogConfig;

mod cli;
mod error;
mod input;
mod run;

use cli::Cli;
use error::CliError;

/// Application exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Exit {
    Success = 0,
    GeneralError = 1,
    ConfigError = 2,
    IoError = 3,
    ValidationError = 5,
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        ExitCode::from(exit as u8)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = csvguard_common_log::init(LogConfig::from_verbosity(cli.verbose, cli.quiet)) {
        eprintln!("warning: {e}");
    }

    match run::run(&cli) {
        Ok(_) => Exit::Success.into(),
        Err(e) => {
            report(&e);
            e.exit().into()
        }
    }
}

fn report(err: &CliError) {
    tracing::debug!(code = err.code(), "export failed");
    eprintln!("error[{}]: {err}", err.code());
    if let CliError::Io {
        path: Some(path), ..
    } = err
    {
        eprintln!("  path: {}", path.display());
    }
    if let Some(hint) = err.hint() {
        eprintln!("  hint: {hint}");
    }
}
