//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `check`: Check that manifests document the modules they reference
//! - `init`: Initialize a `.modrefrc.json` configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Check(cmd)) => cmd.common.verbose,
            Some(Command::Init(cmd)) => cmd.common.verbose,
            None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Project root directory; the config file is searched from here upwards
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Cargo-style human readable output
    #[default]
    Text,
    /// JSON array of issues
    Json,
}

#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Manifests or directories to check, relative to the root (overrides config includes)
    pub paths: Vec<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct InitCommand {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check that classes and defined types document the modules they reference
    Check(CheckCommand),
    /// Initialize a new .modrefrc.json configuration file
    Init(InitCommand),
}
