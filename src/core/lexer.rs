//! Puppet manifest tokenizer.
//!
//! Only the subset of the language needed to locate declarations, walk their
//! bodies and read their header comments is recognized. Everything else is
//! emitted as [`TokenKind::Other`], so tokenizing never fails.

use logos::{Lexer, Logos};

use crate::core::token::{Token, TokenKind};

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
enum RawToken {
    #[regex(r"(::)?[a-z_][A-Za-z0-9_]*(::[a-z_][A-Za-z0-9_]*)*")]
    Name,

    #[regex(r"(::)?[A-Z][A-Za-z0-9_]*(::[A-Z][A-Za-z0-9_]*)*")]
    ClassRef,

    #[regex(r"\$(::)?[A-Za-z0-9_]+(::[A-Za-z0-9_]+)*")]
    Variable,

    #[regex(r"'([^'\\]|\\.)*'")]
    SingleQuoted,

    #[regex(r#""([^"\\]|\\.)*""#)]
    DoubleQuoted,

    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Number,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBrack,
    #[token("]")]
    RBrack,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token("=>")]
    FatArrow,

    #[regex(r"#[^\r\n]*")]
    Comment,

    #[token("/*", block_comment)]
    BlockComment,

    #[regex(r"\r?\n")]
    Newline,

    #[regex(r"[ \t]+")]
    Whitespace,
}

/// Extends a `/*` match through the closing `*/`.
///
/// An unterminated comment is rejected and surfaces as [`TokenKind::Other`].
fn block_comment(lex: &mut Lexer<RawToken>) -> bool {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => false,
    }
}

/// Tokenize a manifest into tokens with 1-based line/column positions.
pub fn tokenize(source: &str) -> Vec<Token> {
    let line_starts = line_starts(source);
    let mut tokens: Vec<Token> = Vec::new();
    let mut lexer = RawToken::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let slice = lexer.slice();
        let (line, column) = position(source, &line_starts, span.start);

        let (kind, text) = match result {
            Ok(RawToken::Name) => (TokenKind::Name, slice.to_string()),
            Ok(RawToken::ClassRef) => (TokenKind::ClassRef, slice.to_string()),
            Ok(RawToken::Variable) => (TokenKind::Variable, slice.to_string()),
            Ok(RawToken::SingleQuoted) => (TokenKind::QuotedString, unquote_single(slice)),
            Ok(RawToken::DoubleQuoted) => (TokenKind::QuotedString, strip_quotes(slice).to_string()),
            Ok(RawToken::Number) => (TokenKind::Number, slice.to_string()),
            Ok(RawToken::LParen) => (TokenKind::LParen, slice.to_string()),
            Ok(RawToken::RParen) => (TokenKind::RParen, slice.to_string()),
            Ok(RawToken::LBrack) => (TokenKind::LBrack, slice.to_string()),
            Ok(RawToken::RBrack) => (TokenKind::RBrack, slice.to_string()),
            Ok(RawToken::LBrace) => (TokenKind::LBrace, slice.to_string()),
            Ok(RawToken::RBrace) => (TokenKind::RBrace, slice.to_string()),
            Ok(RawToken::Comma) => (TokenKind::Comma, slice.to_string()),
            Ok(RawToken::Colon) => (TokenKind::Colon, slice.to_string()),
            Ok(RawToken::FatArrow) => (TokenKind::FatArrow, slice.to_string()),
            Ok(RawToken::Comment) => (TokenKind::Comment, slice[1..].to_string()),
            Ok(RawToken::BlockComment) => (
                TokenKind::BlockComment,
                slice[2..slice.len() - 2].to_string(),
            ),
            Ok(RawToken::Newline) => (TokenKind::Newline, slice.to_string()),
            Ok(RawToken::Whitespace) => {
                let at_line_start = tokens
                    .last()
                    .is_none_or(|prev| prev.kind == TokenKind::Newline);
                let kind = if at_line_start {
                    TokenKind::Indent
                } else {
                    TokenKind::Whitespace
                };
                (kind, slice.to_string())
            }
            Err(()) => (TokenKind::Other, slice.to_string()),
        };

        tokens.push(Token::new(kind, text, line, column));
    }

    tokens
}

/// Byte offsets at which each line starts.
fn line_starts(source: &str) -> Vec<usize> {
    std::iter::once(0)
        .chain(source.match_indices('\n').map(|(i, _)| i + 1))
        .collect()
}

fn position(source: &str, line_starts: &[usize], offset: usize) -> (usize, usize) {
    let line_index = match line_starts.binary_search(&offset) {
        Ok(index) => index,
        Err(index) => index - 1,
    };
    let line_start = line_starts[line_index];
    let column = source[line_start..offset].chars().count() + 1;
    (line_index + 1, column)
}

fn strip_quotes(slice: &str) -> &str {
    &slice[1..slice.len() - 1]
}

fn unquote_single(slice: &str) -> String {
    strip_quotes(slice).replace("\\'", "'").replace("\\\\", "\\")
}

#[cfg(test)]
mod tests {
    use crate::core::lexer::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_include_statement() {
        let tokens = tokenize("include profile::base");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].kind, TokenKind::Name);
        assert_eq!(tokens[0].text, "include");
        assert_eq!(tokens[1].kind, TokenKind::Whitespace);
        assert_eq!(tokens[2].kind, TokenKind::Name);
        assert_eq!(tokens[2].text, "profile::base");
        assert_eq!((tokens[2].line, tokens[2].column), (1, 9));
    }

    #[test]
    fn test_quoted_strings_are_unquoted() {
        let tokens = tokenize(r#"'apache' "nginx" 'it\'s'"#);
        let strings: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::QuotedString)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(strings, vec!["apache", "nginx", "it's"]);
    }

    #[test]
    fn test_comment_text_excludes_marker() {
        let tokens = tokenize("# @see profile::base\nclass");
        assert_eq!(tokens[0].kind, TokenKind::Comment);
        assert_eq!(tokens[0].text, " @see profile::base");
        assert_eq!(tokens[1].kind, TokenKind::Newline);
        assert_eq!(tokens[2].text, "class");
        assert_eq!((tokens[2].line, tokens[2].column), (2, 1));
    }

    #[test]
    fn test_leading_whitespace_is_indent() {
        assert_eq!(
            kinds("  include x\n"),
            vec![
                TokenKind::Indent,
                TokenKind::Name,
                TokenKind::Whitespace,
                TokenKind::Name,
                TokenKind::Newline,
            ]
        );
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            kinds("({[]}),:=>"),
            vec![
                TokenKind::LParen,
                TokenKind::LBrace,
                TokenKind::LBrack,
                TokenKind::RBrack,
                TokenKind::RBrace,
                TokenKind::RParen,
                TokenKind::Comma,
                TokenKind::Colon,
                TokenKind::FatArrow,
            ]
        );
    }

    #[test]
    fn test_variables_and_class_refs() {
        let tokens = tokenize("$::fqdn Class['x']");
        assert_eq!(tokens[0].kind, TokenKind::Variable);
        assert_eq!(tokens[0].text, "$::fqdn");
        assert_eq!(tokens[2].kind, TokenKind::ClassRef);
        assert_eq!(tokens[2].text, "Class");
    }

    #[test]
    fn test_block_comment() {
        let tokens = tokenize("/* note */");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::BlockComment);
        assert_eq!(tokens[0].text, " note ");
    }

    #[test]
    fn test_block_comment_spans_lines_and_stars() {
        let tokens = tokenize("/** a\n * b **/\nclass");
        assert_eq!(tokens[0].kind, TokenKind::BlockComment);
        assert_eq!(tokens[0].text, "* a\n * b *");
        assert_eq!(tokens[1].kind, TokenKind::Newline);
        assert_eq!((tokens[2].line, tokens[2].column), (3, 1));
    }

    #[test]
    fn test_unterminated_block_comment_is_other() {
        let tokens = tokenize("/* open");
        assert_eq!(tokens[0].kind, TokenKind::Other);
        assert_eq!(tokens[0].text, "/*");
    }

    #[test]
    fn test_unknown_characters_become_other() {
        let tokens = tokenize("a = 1");
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Other && t.text == "="));
    }

    #[test]
    fn test_columns_count_characters() {
        let tokens = tokenize("'é' x");
        let x = tokens.last().unwrap();
        assert_eq!(x.text, "x");
        assert_eq!(x.column, 5);
    }
}
