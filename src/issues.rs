//! Issue types for module reference analysis results.
//!
//! This module defines all issue types that can be detected while checking
//! manifests. Each issue is self-contained with all information needed by the
//! reporter to display it to users.

use enum_dispatch::enum_dispatch;

use crate::core::SourceContext;
use crate::core::extract::StructuralError;
use crate::core::validate::{Check, Violation};

// ============================================================
// Severity and Rule
// ============================================================

/// Severity level of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Rule identifier for each issue type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rule {
    MissingBody,
    UnexpectedToken,
    InternalReference,
    ComponentReference,
    FeatureReference,
    ReferenceOrder,
    ParseError,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::MissingBody => write!(f, "missing-body"),
            Rule::UnexpectedToken => write!(f, "unexpected-token"),
            Rule::InternalReference => write!(f, "internal-reference"),
            Rule::ComponentReference => write!(f, "component-reference"),
            Rule::FeatureReference => write!(f, "feature-reference"),
            Rule::ReferenceOrder => write!(f, "reference-order"),
            Rule::ParseError => write!(f, "parse-error"),
        }
    }
}

impl From<Check> for Rule {
    fn from(check: Check) -> Self {
        match check {
            Check::InternalReferences => Rule::InternalReference,
            Check::ComponentReferences => Rule::ComponentReference,
            Check::FeatureReferences => Rule::FeatureReference,
            Check::Order => Rule::ReferenceOrder,
        }
    }
}

// ============================================================
// Issue Types - Declarations (SourceContext)
// ============================================================

/// Declaration whose body brace could not be found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingBodyIssue {
    pub context: SourceContext,
    /// Human-readable declaration, e.g. `class profile::web`.
    pub declaration: String,
}

impl MissingBodyIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::MissingBody
    }
}

/// Token that the reference extractor could not process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnexpectedTokenIssue {
    pub context: SourceContext,
    pub declaration: String,
    pub error: StructuralError,
}

impl UnexpectedTokenIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::UnexpectedToken
    }
}

/// Header comments that do not document the declaration's references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceIssue {
    pub context: SourceContext,
    pub declaration: String,
    pub violation: Violation,
}

impl ReferenceIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule(&self) -> Rule {
        self.violation.check().into()
    }
}

// ============================================================
// Special Issue Types
// ============================================================

/// File could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseErrorIssue {
    pub file_path: String,
    pub error: String,
}

impl ParseErrorIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::ParseError
    }
}

// ============================================================
// Issue Enum
// ============================================================

/// A problem found during analysis.
#[enum_dispatch(Report)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    MissingBody(MissingBodyIssue),
    UnexpectedToken(UnexpectedTokenIssue),
    Reference(ReferenceIssue),
    ParseError(ParseErrorIssue),
}

impl Issue {
    pub fn severity(&self) -> Severity {
        self.report_severity()
    }

    pub fn rule(&self) -> Rule {
        self.report_rule()
    }
}

// ============================================================
// Report Trait (for CLI output)
// ============================================================

/// Location information for report output.
pub enum ReportLocation<'a> {
    /// Source code location (has source_line for context display).
    Source(&'a SourceContext),
    /// File-level only (for ParseError - no line context).
    File { path: &'a str },
}

/// Trait for types that can be reported to CLI.
///
/// Implemented by all issue types to provide a consistent interface for the
/// report functions. Uses `enum_dispatch` for zero-cost dispatch on the
/// `Issue` enum.
#[enum_dispatch]
pub trait Report {
    /// Get the location for this issue.
    fn location(&self) -> ReportLocation<'_>;

    /// Primary message to display.
    fn message(&self) -> String;

    /// Severity level.
    fn report_severity(&self) -> Severity;

    /// Rule identifier.
    fn report_rule(&self) -> Rule;

    /// Optional details for the "= note:" line.
    fn details(&self) -> Option<String> {
        None
    }
}

// ============================================================
// Report Implementations
// ============================================================

impl Report for MissingBodyIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.context)
    }

    fn message(&self) -> String {
        "No class or type body found".to_string()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(format!("in {}", self.declaration))
    }
}

impl Report for UnexpectedTokenIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.context)
    }

    fn message(&self) -> String {
        self.error.to_string()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(format!(
            "in {}; references after this token were not checked",
            self.declaration
        ))
    }
}

impl Report for ReferenceIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.context)
    }

    fn message(&self) -> String {
        self.violation.to_string()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        self.rule()
    }

    fn details(&self) -> Option<String> {
        Some(format!("in {}", self.declaration))
    }
}

impl Report for ParseErrorIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.file_path,
        }
    }

    fn message(&self) -> String {
        self.error.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }
}

// ============================================================
// Ordering for Issue (for sorting in reports)
// ============================================================

impl Issue {
    /// Get file path for sorting.
    pub fn file_path(&self) -> &str {
        match self.location() {
            ReportLocation::Source(ctx) => ctx.file_path(),
            ReportLocation::File { path } => path,
        }
    }

    /// Get line number for sorting.
    pub fn line(&self) -> usize {
        match self.location() {
            ReportLocation::Source(ctx) => ctx.line(),
            ReportLocation::File { .. } => 0,
        }
    }

    /// Get column number for sorting.
    pub fn col(&self) -> usize {
        match self.location() {
            ReportLocation::Source(ctx) => ctx.col(),
            ReportLocation::File { .. } => 0,
        }
    }
}

impl Ord for Issue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Sort by: file_path, line, col, rule, message
        self.file_path()
            .cmp(other.file_path())
            .then_with(|| self.line().cmp(&other.line()))
            .then_with(|| self.col().cmp(&other.col()))
            .then_with(|| self.rule().cmp(&other.rule()))
            .then_with(|| self.message().cmp(&other.message()))
    }
}

impl PartialOrd for Issue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    use crate::core::SourceLocation;
    use crate::core::extract::ReferenceKind;
    use crate::core::token::{Token, TokenKind};
    use crate::issues::*;

    fn context(line: usize, col: usize) -> SourceContext {
        SourceContext::new(
            SourceLocation::new("./manifests/init.pp", line, col),
            "  include profile::test",
        )
    }

    #[test]
    fn test_reference_issue_rule_follows_check() {
        let issue = ReferenceIssue {
            context: context(2, 11),
            declaration: "class test".to_string(),
            violation: Violation::UnreferencedModule {
                name: "profile::test".to_string(),
                origin: Token::new(TokenKind::Name, "profile::test", 2, 11),
            },
        };
        assert_eq!(issue.rule(), Rule::InternalReference);
        assert_eq!(
            issue.message(),
            "Module profile::test not referenced in the comments"
        );
        assert_eq!(issue.details().as_deref(), Some("in class test"));

        let order = ReferenceIssue {
            violation: Violation::CitedTooHigh {
                kind: ReferenceKind::Feature,
                name: "profile::f".to_string(),
                boundary: "@see profile::a".to_string(),
            },
            ..issue
        };
        assert_eq!(order.rule(), Rule::FeatureReference);
    }

    #[test]
    fn test_severity() {
        assert_eq!(MissingBodyIssue::severity(), Severity::Warning);
        assert_eq!(UnexpectedTokenIssue::severity(), Severity::Warning);
        assert_eq!(ReferenceIssue::severity(), Severity::Warning);
        assert_eq!(ParseErrorIssue::severity(), Severity::Error);
    }

    #[test]
    fn test_rule_display() {
        assert_eq!(Rule::MissingBody.to_string(), "missing-body");
        assert_eq!(Rule::ComponentReference.to_string(), "component-reference");
        assert_eq!(Rule::ReferenceOrder.to_string(), "reference-order");
    }

    #[test]
    fn test_issue_ordering() {
        let later = Issue::MissingBody(MissingBodyIssue {
            context: context(5, 1),
            declaration: "class b".to_string(),
        });
        let earlier = Issue::MissingBody(MissingBodyIssue {
            context: context(1, 1),
            declaration: "class a".to_string(),
        });
        let parse = Issue::ParseError(ParseErrorIssue {
            file_path: "./manifests/bad.pp".to_string(),
            error: "stream did not contain valid UTF-8".to_string(),
        });

        let mut issues = vec![later.clone(), earlier.clone(), parse.clone()];
        issues.sort();
        assert_eq!(issues, vec![parse, earlier, later]);
    }
}
