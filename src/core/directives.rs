//! puppet-lint style control comments.
//!
//! - `# lint:ignore:module_reference` on its own line starts an ignored range
//! - `# lint:endignore` ends every open range
//! - `# lint:ignore:module_reference` after code on a line ignores that line
//!
//! Several checks can be listed in one comment
//! (`# lint:ignore:module_reference lint:ignore:140chars`); checks other than
//! this one are ignored.

use std::collections::HashSet;

use crate::core::token::{Token, TokenKind};

/// Check name recognized in control comments.
pub const CHECK_NAME: &str = "module_reference";

const IGNORE_PREFIX: &str = "lint:ignore:";
const END_IGNORE: &str = "lint:endignore";

/// Parsed control comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Ignore { checks: HashSet<String> },
    EndIgnore,
}

impl Directive {
    /// Parse a directive from comment text.
    /// Returns None if not a control comment.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();

        if text.starts_with(END_IGNORE) {
            return Some(Self::EndIgnore);
        }

        let checks: HashSet<String> = text
            .split_whitespace()
            .filter_map(|word| word.strip_prefix(IGNORE_PREFIX))
            .filter(|check| !check.is_empty())
            .map(str::to_string)
            .collect();

        (!checks.is_empty()).then_some(Self::Ignore { checks })
    }

    fn ignores_this_check(&self) -> bool {
        matches!(self, Self::Ignore { checks } if checks.contains(CHECK_NAME))
    }
}

/// Range representing ignored lines [start, end] inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct IgnoredRange {
    start: usize,
    end: usize, // usize::MAX for open-ended
}

/// Lines of one file on which this check is disabled.
#[derive(Debug, Default)]
pub struct IgnoreContext {
    ignored_lines: HashSet<usize>,
    ignored_ranges: Vec<IgnoredRange>,
}

impl IgnoreContext {
    pub fn should_ignore(&self, line: usize) -> bool {
        self.ignored_lines.contains(&line)
            || self
                .ignored_ranges
                .iter()
                .any(|r| line >= r.start && line <= r.end)
    }

    /// Build the context from a file's tokens.
    pub fn from_tokens(tokens: &[Token]) -> Self {
        let mut ctx = Self::default();
        let mut open_range: Option<usize> = None;

        for (index, token) in tokens.iter().enumerate() {
            if token.kind != TokenKind::Comment {
                continue;
            }
            let Some(directive) = Directive::parse(&token.text) else {
                continue;
            };

            match directive {
                Directive::EndIgnore => {
                    if let Some(start) = open_range.take() {
                        ctx.ignored_ranges.push(IgnoredRange {
                            start,
                            end: token.line,
                        });
                    }
                }
                ref ignore if ignore.ignores_this_check() => {
                    if is_trailing(tokens, index) {
                        ctx.ignored_lines.insert(token.line);
                    } else {
                        // Only start a new range if not already open
                        open_range.get_or_insert(token.line);
                    }
                }
                Directive::Ignore { .. } => {}
            }
        }

        // Close any open range (extend to end of file)
        if let Some(start) = open_range {
            ctx.ignored_ranges.push(IgnoredRange {
                start,
                end: usize::MAX,
            });
        }

        ctx
    }
}

/// Whether the comment at `index` follows code on the same line.
fn is_trailing(tokens: &[Token], index: usize) -> bool {
    tokens[..index]
        .iter()
        .rev()
        .take_while(|t| t.kind != TokenKind::Newline)
        .any(|t| !t.kind.is_formatting())
}
