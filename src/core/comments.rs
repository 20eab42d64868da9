//! Header comment collection and annotation parsing.
//!
//! The header of a declaration is the contiguous run of `#` comments directly
//! above its keyword. Only annotation lines survive collection:
//!
//! ```puppet
//! # @ref apache
//! # @note puppetlabs-apache
//! # @see https://forge.puppet.com/modules/puppetlabs/apache
//! #
//! # @see profile::test
//! class test () { ... }
//! ```
//!
//! Positions in the returned list are indexes into the filtered sequence;
//! free-text and blank comment lines do not occupy a slot.

use crate::core::token::{Token, TokenKind};

const SEE_TAG: &str = "@see";
const REF_TAG: &str = "@ref";
const NOTE_TAG: &str = "@note";

/// A parsed annotation line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Annotation<'a> {
    /// `@see <target>[ <free text>]`
    See { target: &'a str, payload: &'a str },
    /// `@ref <pattern>[,<pattern>]*`
    Ref { patterns: &'a str },
    /// `@note <free text>`
    Note { text: &'a str },
}

impl<'a> Annotation<'a> {
    /// Parse a trimmed comment line. Returns `None` for anything that is not a
    /// well-formed annotation.
    pub fn parse(line: &'a str) -> Option<Self> {
        if let Some(payload) = tag_payload(line, SEE_TAG) {
            let target = payload.split_whitespace().next()?;
            return Some(Self::See { target, payload });
        }
        if let Some(patterns) = tag_payload(line, REF_TAG) {
            return Some(Self::Ref { patterns });
        }
        if let Some(text) = tag_payload(line, NOTE_TAG) {
            return Some(Self::Note { text });
        }
        None
    }

    /// The first whitespace-delimited word of a `@see` or `@ref` payload.
    pub fn leading_word(&self) -> Option<&'a str> {
        match self {
            Self::See { target, .. } => Some(target),
            Self::Ref { patterns } => patterns.split_whitespace().next(),
            Self::Note { .. } => None,
        }
    }
}

/// `line` must be `<tag> <payload>` with a non-empty payload.
fn tag_payload<'a>(line: &'a str, tag: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(tag)?;
    if !rest.starts_with([' ', '\t']) {
        return None;
    }
    let payload = rest.trim();
    (!payload.is_empty()).then_some(payload)
}

/// Whether a trimmed comment line carries one of the annotation tags.
pub fn is_annotation_line(line: &str) -> bool {
    [SEE_TAG, REF_TAG, NOTE_TAG]
        .iter()
        .any(|tag| line.starts_with(tag))
}

/// Collect the raw header comment tokens above the token at `start`, in
/// source order.
///
/// Indentation in front of the declaration keyword is skipped first, then the
/// walk continues backwards over comments and line breaks and stops at the
/// first token of any other kind.
pub fn collect_header(tokens: &[Token], start: usize) -> Vec<&Token> {
    let mut pointer = start.min(tokens.len());

    while pointer > 0 && matches!(tokens[pointer - 1].kind, TokenKind::Indent | TokenKind::Whitespace) {
        pointer -= 1;
    }

    let mut header = Vec::new();
    while pointer > 0 {
        let token = &tokens[pointer - 1];
        match token.kind {
            TokenKind::Comment => header.push(token),
            TokenKind::Newline => {}
            _ => break,
        }
        pointer -= 1;
    }

    header.reverse();
    header
}

/// Collect the annotation lines of the header above the token at `start`.
pub fn collect_annotations(tokens: &[Token], start: usize) -> Vec<String> {
    collect_header(tokens, start)
        .into_iter()
        .map(|token| token.text.trim())
        .filter(|line| is_annotation_line(line))
        .map(str::to_string)
        .collect()
}
