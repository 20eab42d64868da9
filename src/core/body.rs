//! Locating the opening brace of a declaration body.

use crate::core::token::{Token, TokenKind};

/// Find the index of the first token after the body's opening brace.
///
/// Any parenthesized parameter list before the body is skipped as a balanced
/// group, so braces inside parameter defaults (`Hash $h = {}`) are not
/// mistaken for the body. Returns `None` when no body brace exists.
pub fn find_body_start(tokens: &[Token]) -> Option<usize> {
    let mut params_started = false;
    let mut depth: isize = 0;

    for (index, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::LParen => {
                params_started = true;
                depth += 1;
            }
            TokenKind::RParen if params_started => depth -= 1,
            TokenKind::LBrace if !params_started || depth == 0 => return Some(index + 1),
            _ => {}
        }
    }

    None
}
