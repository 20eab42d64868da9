use anyhow::Result;

use super::{
    args::{Arguments, Command},
    commands::CommandResult,
    commands::{check::check, init::init},
};

/// Dispatch to the command handler for the parsed arguments.
///
/// # Returns
/// - `Ok(CommandResult)` with issues and error/warning counts
/// - `Err` if the command fails (e.g., invalid config, missing root)
pub fn run(Arguments { command }: Arguments) -> Result<CommandResult> {
    match command {
        Some(Command::Check(cmd)) => check(cmd),
        Some(Command::Init(cmd)) => init(cmd),
        None => {
            anyhow::bail!("No command provided. Use --help to see available commands.")
        }
    }
}
