use super::{CommandResult, CommandSummary};
use crate::issues::{Issue, Severity};

pub fn finish(summary: CommandSummary, mut issues: Vec<Issue>, files_checked: usize) -> CommandResult {
    issues.sort();

    let parse_error_count = issues
        .iter()
        .filter(|i| matches!(i, Issue::ParseError(_)))
        .count();

    let mut error_count = issues
        .iter()
        .filter(|i| i.severity() == Severity::Error)
        .count();

    let warning_count = issues
        .iter()
        .filter(|i| i.severity() == Severity::Warning)
        .count();

    if let CommandSummary::Init(ref summary) = summary
        && summary.created.is_none()
    {
        error_count += 1;
    }

    CommandResult {
        summary,
        error_count,
        warning_count,
        issues,
        parse_error_count,
        files_checked,
    }
}
