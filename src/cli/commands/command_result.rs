use std::path::PathBuf;

use super::super::args::OutputFormat;
use crate::issues::Issue;

#[derive(Debug)]
pub enum CommandSummary {
    Check(CheckSummary),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct CheckSummary {
    pub format: OutputFormat,
}

#[derive(Debug)]
pub struct InitSummary {
    /// Path of the created config file, `None` when one already existed.
    pub created: Option<PathBuf>,
}

/// Result of running modref commands
pub struct CommandResult {
    pub summary: CommandSummary,
    pub error_count: usize,
    pub warning_count: usize,
    /// All issues found during the check.
    /// Empty for non-check commands.
    pub issues: Vec<Issue>,
    /// Number of manifests that could not be read.
    pub parse_error_count: usize,
    /// Number of manifests that were checked.
    pub files_checked: usize,
}
