//! Report formatting and printing utilities.
//!
//! Displays issues in cargo-style format, or as JSON for tooling. Separate
//! from core logic to allow modref to be used as a library.

use std::io::{self, Write};

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use super::{
    args::OutputFormat,
    commands::{CommandResult, CommandSummary, InitSummary},
};
use crate::config::CONFIG_FILE_NAME;
use crate::issues::{Issue, Report, ReportLocation, Severity};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print issues in cargo-style format to stdout.
pub fn report(issues: &[Issue]) {
    report_to(issues, &mut io::stdout().lock());
}

/// Print issues to a custom writer.
///
/// Useful for testing or redirecting output.
pub fn report_to<W: Write>(issues: &[Issue], writer: &mut W) {
    if issues.is_empty() {
        return;
    }

    let mut sorted = issues.to_vec();
    sorted.sort();

    // Calculate max line number width for alignment
    let max_line_width = calculate_max_line_width(&sorted);

    for issue in &sorted {
        print_issue(issue, writer, max_line_width);
    }

    print_summary(&sorted, writer);
}

/// Print a success message when no issues are found.
pub fn print_success_to<W: Write>(files: usize, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Checked {} {} - no issues found",
            files,
            if files == 1 { "manifest" } else { "manifests" }
        )
        .green()
    );
}

/// One issue in JSON output.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct JsonIssue<'a> {
    pub file: &'a str,
    pub line: usize,
    pub column: usize,
    pub severity: String,
    pub rule: String,
    pub message: String,
}

impl<'a> From<&'a Issue> for JsonIssue<'a> {
    fn from(issue: &'a Issue) -> Self {
        Self {
            file: issue.file_path(),
            line: issue.line(),
            column: issue.col(),
            severity: issue.severity().to_string(),
            rule: issue.rule().to_string(),
            message: issue.message(),
        }
    }
}

/// Write issues as a pretty-printed JSON array.
pub fn report_json_to<W: Write>(issues: &[Issue], writer: &mut W) -> Result<()> {
    let records: Vec<JsonIssue<'_>> = issues.iter().map(JsonIssue::from).collect();
    serde_json::to_writer_pretty(&mut *writer, &records).context("Failed to serialize issues")?;
    writeln!(writer).context("Failed to write report")?;
    Ok(())
}

pub fn print(result: &CommandResult) -> Result<()> {
    match &result.summary {
        CommandSummary::Check(summary) => match summary.format {
            OutputFormat::Text => {
                report(&result.issues);
                if result.issues.is_empty() {
                    print_success_to(result.files_checked, &mut io::stdout().lock());
                }
            }
            OutputFormat::Json => {
                report_json_to(&result.issues, &mut io::stdout().lock())?;
            }
        },
        CommandSummary::Init(summary) => print_init(summary),
    }
    Ok(())
}

fn print_init(summary: &InitSummary) {
    match &summary.created {
        Some(path) => println!(
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", path.display()).green()
        ),
        None => eprintln!(
            "{} {} already exists",
            "error:".bold().red(),
            CONFIG_FILE_NAME
        ),
    }
}

// ============================================================
// Internal Functions
// ============================================================

fn print_issue<W: Write>(issue: &Issue, writer: &mut W, max_line_width: usize) {
    let loc = issue.location();
    let (file_path, line, col, source_line) = extract_location_info(&loc);

    // Print severity and message (cargo-style)
    let severity = issue.report_severity();
    let severity_str = match severity {
        Severity::Error => "error".bold().red(),
        Severity::Warning => "warning".bold().yellow(),
    };

    let _ = writeln!(
        writer,
        "{}: {}  {}",
        severity_str,
        issue.message(),
        issue.report_rule().to_string().dimmed().cyan()
    );

    // Print clickable location: --> path:line:col
    if line > 0 {
        let _ = writeln!(writer, "  {} {}:{}:{}", "-->".blue(), file_path, line, col);
    } else {
        let _ = writeln!(writer, "  {} {}", "-->".blue(), file_path);
    }

    if let Some(source_line) = source_line {
        let caret_char = match severity {
            Severity::Error => "^".red(),
            Severity::Warning => "^".yellow(),
        };

        let _ = writeln!(
            writer,
            "{:>width$} {}",
            "",
            "|".blue(),
            width = max_line_width
        );
        let _ = writeln!(
            writer,
            "{:>width$} {} {}",
            line.to_string().blue(),
            "|".blue(),
            source_line,
            width = max_line_width
        );

        // Caret pointing to the column (col is 1-based)
        let prefix: String = source_line.chars().take(col.saturating_sub(1)).collect();
        let caret_padding = UnicodeWidthStr::width(prefix.as_str());
        let _ = writeln!(
            writer,
            "{:>width$} {} {:>padding$}{}",
            "",
            "|".blue(),
            "",
            caret_char,
            width = max_line_width,
            padding = caret_padding
        );
    }

    if let Some(details) = issue.details() {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} {}",
            "",
            "=".blue(),
            "note:".bold(),
            details,
            width = max_line_width
        );
    }

    let _ = writeln!(writer); // Empty line between issues
}

fn print_summary<W: Write>(issues: &[Issue], writer: &mut W) {
    let total_errors = issues
        .iter()
        .filter(|i| i.report_severity() == Severity::Error)
        .count();
    let total_warnings = issues
        .iter()
        .filter(|i| i.report_severity() == Severity::Warning)
        .count();
    let total_problems = total_errors + total_warnings;

    if total_problems > 0 {
        let _ = writeln!(
            writer,
            "{} {} {} ({} {}, {} {})",
            FAILURE_MARK.red(),
            total_problems,
            if total_problems == 1 {
                "problem"
            } else {
                "problems"
            },
            total_errors,
            if total_errors == 1 { "error" } else { "errors" }.red(),
            total_warnings,
            if total_warnings == 1 {
                "warning"
            } else {
                "warnings"
            }
            .yellow()
        );
    }
}

fn extract_location_info<'a>(
    loc: &'a ReportLocation<'a>,
) -> (&'a str, usize, usize, Option<&'a str>) {
    match loc {
        ReportLocation::Source(ctx) => (
            ctx.file_path(),
            ctx.line(),
            ctx.col(),
            Some(&ctx.source_line),
        ),
        ReportLocation::File { path } => (path, 0, 0, None),
    }
}

fn calculate_max_line_width(issues: &[Issue]) -> usize {
    issues
        .iter()
        .filter_map(|i| match i.location() {
            ReportLocation::Source(ctx) => Some(ctx.line()),
            ReportLocation::File { .. } => None,
        })
        .max()
        .map(|n| n.to_string().len())
        .unwrap_or(1)
}
