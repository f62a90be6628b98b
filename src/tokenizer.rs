//! The regex-driven tokenizer (lexer).
//!
//! Every token kind is one named alternative of a single compiled pattern.
//! The regex engine's leftmost-first semantics give the priority order: at
//! any position the earliest alternative that matches wins. Characters that
//! no alternative accepts are stepped over by the search itself.

use crate::error::ParseError;
use crate::token::{Token, TokenKind};
use regex::{CaptureMatches, Regex};
use std::sync::LazyLock;

/// What the tokenizer does with a match.
#[derive(Debug, Clone, Copy)]
enum Rule {
    Emit(TokenKind),
    Discard,
}

/// Token patterns in priority order. Each becomes one capture group, so
/// the patterns themselves may only use non-capturing groups.
const TOKEN_SPECIFICATION: &[(Rule, &str)] = &[
    (Rule::Emit(TokenKind::AtKeyword), r"@\w+"),
    (Rule::Emit(TokenKind::Colon), r":"),
    (Rule::Emit(TokenKind::Comma), r","),
    (Rule::Emit(TokenKind::Dot), r"\."),
    (Rule::Emit(TokenKind::LeftParen), r"\("),
    (Rule::Emit(TokenKind::RightParen), r"\)"),
    (Rule::Emit(TokenKind::LeftBrace), r"\{"),
    (Rule::Emit(TokenKind::RightBrace), r"\}"),
    (Rule::Emit(TokenKind::LeftBracket), r"\["),
    (Rule::Emit(TokenKind::RightBracket), r"\]"),
    (Rule::Emit(TokenKind::String), r#""(?:\\.|[^"\\])*""#),
    (
        Rule::Emit(TokenKind::Number),
        r"-?[0-9]+(?:\.[0-9]+)?(?:[eE][+-]?[0-9]+)?",
    ),
    (Rule::Emit(TokenKind::Operator), r"[+\-*/%]|==|!=|<=|>=|<|>"),
    (Rule::Emit(TokenKind::True), r"\btrue\b"),
    (Rule::Emit(TokenKind::False), r"\bfalse\b"),
    (Rule::Emit(TokenKind::Null), r"\bnull\b"),
    (Rule::Emit(TokenKind::Identifier), r"[A-Za-z_][A-Za-z0-9_]*"),
    (Rule::Discard, r"\s+"),
    (Rule::Discard, r"//.*?$|/\*.*?\*/"),
];

/// The combined pattern. `s` lets `.` cross newlines inside strings and
/// block comments; `m` makes `$` stop a line comment at the line end.
static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives: Vec<String> = TOKEN_SPECIFICATION
        .iter()
        .map(|(_, pattern)| format!("({pattern})"))
        .collect();
    Regex::new(&format!("(?sm){}", alternatives.join("|")))
        .expect("token patterns are valid regular expressions")
});

/// The tokenizer. Yields tokens in source order, skipping whitespace and
/// comments.
///
/// In the default lenient mode it never yields an error: characters no
/// pattern accepts are dropped. A strict tokenizer reports the first such
/// character as `ParseError::UnrecognizedCharacter`.
pub struct Tokenizer<'a> {
    /// The full input being scanned.
    input: &'a str,
    matches: CaptureMatches<'static, 'a>,
    /// Byte offset just past the last match.
    cursor: usize,
    strict: bool,
}

impl<'a> Tokenizer<'a> {
    /// Creates a lenient `Tokenizer` over `input`.
    pub fn new(input: &'a str) -> Self {
        Tokenizer {
            input,
            matches: TOKEN_PATTERN.captures_iter(input),
            cursor: 0,
            strict: false,
        }
    }

    /// Creates a `Tokenizer` that fails on unrecognized characters.
    pub fn strict(input: &'a str) -> Self {
        Tokenizer {
            strict: true,
            ..Tokenizer::new(input)
        }
    }

    /// Accounts for the text between the last match and `until`, which no
    /// pattern accepted.
    fn skip_unmatched(&self, until: usize) -> Option<ParseError> {
        let gap = &self.input[self.cursor..until];
        let ch = gap.chars().next()?;
        if self.strict {
            return Some(ParseError::UnrecognizedCharacter {
                ch,
                offset: self.cursor,
            });
        }
        tracing::debug!(
            offset = self.cursor,
            skipped = gap,
            "skipping unrecognized characters"
        );
        None
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Token<'a>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some(captures) = self.matches.next() else {
                let error = self.skip_unmatched(self.input.len());
                self.cursor = self.input.len();
                return error.map(Err);
            };

            // Exactly one alternative participates in a match; group 0 is the
            // whole match, so alternative `i` is group `i + 1`.
            let Some((index, matched)) = captures
                .iter()
                .skip(1)
                .enumerate()
                .find_map(|(i, group)| group.map(|m| (i, m)))
            else {
                continue;
            };

            let error = self.skip_unmatched(matched.start());
            self.cursor = matched.end();
            if let Some(error) = error {
                return Some(Err(error));
            }

            match TOKEN_SPECIFICATION[index].0 {
                Rule::Discard => continue,
                Rule::Emit(kind) => {
                    return Some(Ok(Token::new(kind, matched.as_str(), matched.start())));
                }
            }
        }
    }
}

/// Scans `input` into tokens, silently dropping unrecognized characters.
///
/// This never fails.
///
/// ```
/// use dml_parser::{tokenize, TokenKind};
///
/// let tokens = tokenize("@meta: x");
/// let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
/// assert_eq!(kinds, [TokenKind::AtKeyword, TokenKind::Colon, TokenKind::Identifier]);
/// ```
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    // A lenient tokenizer yields no errors, so flattening loses nothing.
    let tokens: Vec<Token<'_>> = Tokenizer::new(input).flatten().collect();
    tracing::trace!(count = tokens.len(), "tokenized input");
    tokens
}

/// Scans `input` into tokens, failing on the first unrecognized character.
pub fn tokenize_strict(input: &str) -> Result<Vec<Token<'_>>, ParseError> {
    let tokens = Tokenizer::strict(input).collect::<Result<Vec<_>, _>>()?;
    tracing::trace!(count = tokens.len(), "tokenized input (strict)");
    Ok(tokens)
}
