//! Token types shared by the tokenizer and every analysis phase.

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Bare word or qualified name (`include`, `profile::base`, `::apache`).
    Name,
    /// Capitalized type or class reference (`Class`, `File`).
    ClassRef,
    /// Variable (`$name`, `$::fqdn`).
    Variable,
    /// Single- or double-quoted string. The token text is the unquoted content.
    QuotedString,
    Number,
    LParen,
    RParen,
    LBrack,
    RBrack,
    LBrace,
    RBrace,
    Comma,
    Colon,
    /// `=>`
    FatArrow,
    /// `# ...` comment. The token text is everything after the `#`.
    Comment,
    /// `/* ... */` comment. The token text is everything between the markers.
    BlockComment,
    Newline,
    /// Horizontal whitespace inside a line.
    Whitespace,
    /// Horizontal whitespace at the start of a line.
    Indent,
    /// Any character the lexer does not classify.
    Other,
}

impl TokenKind {
    /// Whitespace, newline and indent tokens carry no meaning for the analysis.
    pub fn is_formatting(self) -> bool {
        matches!(self, Self::Whitespace | Self::Newline | Self::Indent)
    }

    pub fn is_comment(self) -> bool {
        matches!(self, Self::Comment | Self::BlockComment)
    }

    /// Tokens that can name a class: bare names and quoted strings.
    pub fn is_name_like(self) -> bool {
        matches!(self, Self::Name | Self::QuotedString)
    }
}

/// A single token with its kind, text and 1-based source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            column,
        }
    }

    /// Tokens the reference extractor looks at.
    pub fn is_significant(&self) -> bool {
        !self.kind.is_formatting()
    }
}
