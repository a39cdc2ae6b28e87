//! Command-line interface: argument parsing, batch runs and reporting.

use std::process::ExitCode;

use anyhow::Result;

mod args;
mod commands;
mod exit_status;
mod files;
mod report;
mod run;

pub use args::{Arguments, Command, CommonArgs, OutputFormat, TransformCommand};
pub use commands::{CommandResult, CommandSummary, FileOutcome, TransformSummary};
pub use exit_status::ExitStatus;
pub use files::{ScanResult, scan_files};

pub fn run_cli(args: Arguments) -> Result<ExitCode> {
    let verbose = args.verbose();
    let format = match &args.command {
        Some(Command::Transform(cmd)) => cmd.format,
        _ => OutputFormat::Text,
    };

    let Some(args) = args.with_command_or_help() else {
        return Ok(ExitStatus::Success.into());
    };

    let result = run::run(args)?;
    report::print(&result, format, verbose);

    Ok(ExitStatus::from(&result).into())
}
