//! Discovery of class and defined type declarations in a token stream.

use std::fmt;

use crate::core::body::find_body_start;
use crate::core::token::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DeclarationKind {
    Class,
    DefinedType,
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclarationKind::Class => write!(f, "class"),
            DeclarationKind::DefinedType => write!(f, "defined type"),
        }
    }
}

/// A class or defined type definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub kind: DeclarationKind,
    pub name: String,
    /// Index of the `class` / `define` keyword.
    pub start: usize,
    /// Index of the closing body brace, or of the last token when the body is
    /// missing or unbalanced.
    pub end: usize,
}

impl Declaration {
    /// Tokens from the keyword through the end of the body.
    pub fn tokens<'t>(&self, tokens: &'t [Token]) -> &'t [Token] {
        &tokens[self.start..=self.end]
    }
}

fn next_significant(tokens: &[Token], from: usize) -> Option<(usize, &Token)> {
    tokens
        .iter()
        .enumerate()
        .skip(from)
        .find(|(_, t)| t.is_significant() && !t.kind.is_comment())
}

/// Find all class and defined type definitions, classes first, each group in
/// source order.
///
/// `class { 'name': }` is a resource-like class declaration, not a
/// definition, and is skipped.
pub fn find_declarations(tokens: &[Token]) -> Vec<Declaration> {
    let mut declarations = Vec::new();

    for (index, token) in tokens.iter().enumerate() {
        if token.kind != TokenKind::Name {
            continue;
        }
        let kind = match token.text.as_str() {
            "class" => DeclarationKind::Class,
            "define" => DeclarationKind::DefinedType,
            _ => continue,
        };
        let Some((_, name)) = next_significant(tokens, index + 1) else {
            continue;
        };
        if name.kind != TokenKind::Name {
            continue;
        }

        declarations.push(Declaration {
            kind,
            name: name.text.clone(),
            start: index,
            end: find_body_end(tokens, index),
        });
    }

    declarations.sort_by_key(|d| (d.kind, d.start));
    declarations
}

fn find_body_end(tokens: &[Token], start: usize) -> usize {
    let last = tokens.len() - 1;
    let Some(body_start) = find_body_start(&tokens[start..]) else {
        return last;
    };

    let mut depth = 1usize;
    for (index, token) in tokens.iter().enumerate().skip(start + body_start) {
        match token.kind {
            TokenKind::LBrace => depth += 1,
            TokenKind::RBrace => {
                depth -= 1;
                if depth == 0 {
                    return index;
                }
            }
            _ => {}
        }
    }
    last
}
