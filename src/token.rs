//! Defines the `Token` and `TokenKind` types.
//!
//! These are the intermediate representation between the `Tokenizer`
//! (lexer) and the recursive-descent `Parser`.

use std::fmt;

/// The classification of a `Token`.
///
/// Variants are listed in the tokenizer's match priority order: when two
/// patterns could match at the same position, the earlier kind wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `@` followed by word characters, e.g. `@meta`
    AtKeyword,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// A double-quoted string literal, escapes still undecoded
    String,
    /// A numeric literal such as `-1.5e3`
    Number,
    /// `+ - * / %` or a comparison operator
    Operator,
    /// `true`
    True,
    /// `false`
    False,
    /// `null`
    Null,
    /// A bare name such as `version_2`
    Identifier,
}

impl TokenKind {
    /// The upper-case name used in error messages, e.g. `RBRACE`.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::AtKeyword => "AT_KEYWORD",
            TokenKind::Colon => "COLON",
            TokenKind::Comma => "COMMA",
            TokenKind::Dot => "DOT",
            TokenKind::LeftParen => "LPAREN",
            TokenKind::RightParen => "RPAREN",
            TokenKind::LeftBrace => "LBRACE",
            TokenKind::RightBrace => "RBRACE",
            TokenKind::LeftBracket => "LBRACKET",
            TokenKind::RightBracket => "RBRACKET",
            TokenKind::String => "STRING",
            TokenKind::Number => "NUMBER",
            TokenKind::Operator => "OPERATOR",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::Null => "NULL",
            TokenKind::Identifier => "IDENTIFIER",
        }
    }

    /// Tokens that end a raw expression without being consumed by it.
    pub(crate) fn terminates_expression(self) -> bool {
        matches!(
            self,
            TokenKind::Comma | TokenKind::RightBrace | TokenKind::RightBracket
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single token produced by the `Tokenizer`.
///
/// `text` borrows the exact matched slice of the source, so a token never
/// outlives the input it was scanned from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// The type of the token.
    pub kind: TokenKind,
    /// The matched source text, verbatim.
    pub text: &'a str,
    /// Byte offset of the first character of the match.
    pub offset: usize,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, text: &'a str, offset: usize) -> Self {
        Token { kind, text, offset }
    }
}
