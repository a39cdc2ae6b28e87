use std::env;

use anyhow::{Context, Result, bail};

use super::{
    args::{Arguments, Command},
    commands::{CommandResult, init::init, transform::transform},
};

/// Dispatch a parsed command line to its command handler.
///
/// `Err` means the command could not run at all; per-file problems are
/// counted in the returned [`CommandResult`].
pub fn run(Arguments { command }: Arguments) -> Result<CommandResult> {
    match command {
        Some(Command::Transform(cmd)) => transform(cmd),
        Some(Command::Init) => {
            let cwd = env::current_dir().context("Failed to read the current directory")?;
            init(&cwd)
        }
        None => bail!("No command provided. Use --help to see available commands."),
    }
}
