//! The recursive-descent parser.
//!
//! `Parser` walks a token slice with a single cursor and one token of
//! lookahead. Objects, arrays and values are mutually recursive methods,
//! so the current nesting is simply the call stack.

use crate::error::ParseError;
use crate::options::DEFAULT_MAX_DEPTH;
use crate::token::{Token, TokenKind};
use crate::value::{Map, Value};
use memchr::memchr;
use num_bigint::BigInt;

/// Parses a token sequence into a `Value`.
///
/// A parser is single-use: `parse` consumes it.
pub struct Parser<'t, 'a> {
    tokens: &'t [Token<'a>],
    /// Index of the current token.
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl<'t, 'a> Parser<'t, 'a> {
    pub fn new(tokens: &'t [Token<'a>]) -> Self {
        Parser {
            tokens,
            pos: 0,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the maximum nesting of objects and arrays.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parses the whole document.
    ///
    /// A leading `{` selects JSON-compatible mode: exactly one object is
    /// parsed and anything after its closing brace is ignored. Otherwise the
    /// input is a sequence of `key: value` sections.
    pub fn parse(mut self) -> Result<Value, ParseError> {
        let first = self.peek().ok_or(ParseError::NoTokens)?;
        if first.kind == TokenKind::LeftBrace {
            tracing::debug!("parsing document in object mode");
            let value = self.parse_object()?;
            if self.pos < self.tokens.len() {
                tracing::debug!(
                    ignored = self.tokens.len() - self.pos,
                    offset = self.tokens[self.pos].offset,
                    "ignoring tokens after the top-level object"
                );
            }
            Ok(value)
        } else {
            tracing::debug!("parsing document in section mode");
            self.parse_sections()
        }
    }

    fn parse_sections(&mut self) -> Result<Value, ParseError> {
        let mut sections = Map::new();
        while let Some(token) = self.peek() {
            let key = match token.kind {
                TokenKind::AtKeyword | TokenKind::Identifier => token.text.to_string(),
                found => {
                    return Err(ParseError::UnexpectedToken {
                        found,
                        offset: token.offset,
                        context: "at top-level key",
                    });
                }
            };
            self.advance();
            self.expect(TokenKind::Colon, "':'")?;
            let value = self.parse_value()?;
            sections.insert(key, value);
        }
        Ok(Value::Object(sections))
    }

    fn parse_value(&mut self) -> Result<Value, ParseError> {
        let token = self.current()?;
        match token.kind {
            TokenKind::LeftBrace => self.parse_object(),
            TokenKind::LeftBracket => self.parse_array(),
            TokenKind::String => {
                self.advance();
                decode_string(&token).map(Value::String)
            }
            TokenKind::Number => {
                self.advance();
                parse_number(&token)
            }
            TokenKind::True => {
                self.advance();
                Ok(Value::Bool(true))
            }
            TokenKind::False => {
                self.advance();
                Ok(Value::Bool(false))
            }
            TokenKind::Null => {
                self.advance();
                Ok(Value::Null)
            }
            _ => Ok(self.parse_expression()),
        }
    }

    fn parse_object(&mut self) -> Result<Value, ParseError> {
        let open = self.expect(TokenKind::LeftBrace, "'{'")?;
        self.enter(&open)?;

        let mut object = Map::new();
        if self.current()?.kind != TokenKind::RightBrace {
            loop {
                let key = self.parse_key()?;
                self.expect(TokenKind::Colon, "':'")?;
                let value = self.parse_value()?;
                // Re-inserting keeps the key's original position.
                object.insert(key, value);

                let token = self.current()?;
                match token.kind {
                    TokenKind::Comma => {
                        self.advance();
                        self.reject_trailing_comma(TokenKind::RightBrace)?;
                    }
                    TokenKind::RightBrace => break,
                    found => {
                        return Err(ParseError::MissingDelimiter {
                            expected: "',' or '}'",
                            found,
                            offset: token.offset,
                        });
                    }
                }
            }
        }

        self.advance(); // '}'
        self.depth -= 1;
        Ok(Value::Object(object))
    }

    fn parse_array(&mut self) -> Result<Value, ParseError> {
        let open = self.expect(TokenKind::LeftBracket, "'['")?;
        self.enter(&open)?;

        let mut array = Vec::new();
        if self.current()?.kind != TokenKind::RightBracket {
            loop {
                array.push(self.parse_value()?);

                let token = self.current()?;
                match token.kind {
                    TokenKind::Comma => {
                        self.advance();
                        self.reject_trailing_comma(TokenKind::RightBracket)?;
                    }
                    TokenKind::RightBracket => break,
                    found => {
                        return Err(ParseError::MissingDelimiter {
                            expected: "',' or ']'",
                            found,
                            offset: token.offset,
                        });
                    }
                }
            }
        }

        self.advance(); // ']'
        self.depth -= 1;
        Ok(Value::Array(array))
    }

    /// Object keys are broader than top-level keys: quoted strings are
    /// accepted and decoded.
    fn parse_key(&mut self) -> Result<String, ParseError> {
        let token = self.current()?;
        let key = match token.kind {
            TokenKind::String => decode_string(&token)?,
            TokenKind::Identifier | TokenKind::AtKeyword => token.text.to_string(),
            found => {
                return Err(ParseError::UnexpectedToken {
                    found,
                    offset: token.offset,
                    context: "in key",
                });
            }
        };
        self.advance();
        Ok(key)
    }

    /// Concatenates raw token text up to the next `,`, `}`, `]` or the end
    /// of input. No separator is inserted, so `a + b` becomes `a+b`.
    fn parse_expression(&mut self) -> Value {
        let mut expression = String::new();
        while let Some(token) = self.peek() {
            if token.kind.terminates_expression() {
                break;
            }
            expression.push_str(token.text);
            self.advance();
        }
        Value::RawExpression(expression)
    }

    fn reject_trailing_comma(&self, closer: TokenKind) -> Result<(), ParseError> {
        let token = self.current()?;
        if token.kind == closer {
            return Err(ParseError::TrailingComma {
                found: token.kind,
                offset: token.offset,
            });
        }
        Ok(())
    }

    /// Records one more level of nesting, opened by `open`.
    fn enter(&mut self, open: &Token<'_>) -> Result<(), ParseError> {
        if self.depth >= self.max_depth {
            return Err(ParseError::NestingTooDeep {
                limit: self.max_depth,
                offset: open.offset,
            });
        }
        self.depth += 1;
        Ok(())
    }

    // --- Cursor helpers ---

    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos).copied()
    }

    fn current(&self) -> Result<Token<'a>, ParseError> {
        self.peek().ok_or(ParseError::UnexpectedEndOfInput)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    /// Consumes the current token if it is `kind`.
    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<Token<'a>, ParseError> {
        let token = self.current()?;
        if token.kind != kind {
            return Err(ParseError::MissingDelimiter {
                expected,
                found: token.kind,
                offset: token.offset,
            });
        }
        self.advance();
        Ok(token)
    }
}

/// Parses an already tokenized document with default options.
pub fn parse_tokens(tokens: &[Token<'_>]) -> Result<Value, ParseError> {
    Parser::new(tokens).parse()
}

/// Classifies a NUMBER token: any `.`, `e` or `E` makes it a float.
/// Integers are kept exact whatever their size.
fn parse_number(token: &Token<'_>) -> Result<Value, ParseError> {
    let text = token.text;
    let invalid = || ParseError::InvalidNumber {
        text: text.to_string(),
        offset: token.offset,
    };

    if text.contains(['.', 'e', 'E']) {
        return text.parse::<f64>().map(Value::Float).map_err(|_| invalid());
    }
    text.parse::<BigInt>().map(Value::Int).map_err(|_| invalid())
}

/// Strips the quotes from a STRING token and resolves its escapes.
pub(crate) fn decode_string(token: &Token<'_>) -> Result<String, ParseError> {
    let content = token
        .text
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(token.text);

    // Hot path: no escapes, nothing to build.
    if memchr(b'\\', content.as_bytes()).is_none() {
        return Ok(content.to_string());
    }

    let base = token.offset + 1;
    let mut decoded = String::with_capacity(content.len());
    let mut cursor = 0;
    while let Some(index) = memchr(b'\\', &content.as_bytes()[cursor..]) {
        let start = cursor + index;
        decoded.push_str(&content[cursor..start]);

        let escape = &content[start..];
        let (ch, len) = decode_escape(escape).ok_or_else(|| ParseError::InvalidEscape {
            sequence: escape_excerpt(escape).to_string(),
            offset: base + start,
        })?;
        if let Some(ch) = ch {
            decoded.push(ch);
        }
        cursor = start + len;
    }
    decoded.push_str(&content[cursor..]);
    Ok(decoded)
}

/// Decodes the escape at the start of `s` (which begins with `\`).
///
/// Returns the decoded character, or `None` for a line continuation,
/// together with the number of bytes the escape spans.
fn decode_escape(s: &str) -> Option<(Option<char>, usize)> {
    let marker = s[1..].chars().next()?;
    let simple = match marker {
        '\n' => return Some((None, 2)),
        '\\' | '\'' | '"' | '/' => marker,
        'a' => '\u{07}',
        'b' => '\u{08}',
        'f' => '\u{0C}',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'v' => '\u{0B}',
        '0'..='7' => {
            let digits = s[1..]
                .bytes()
                .take(3)
                .take_while(|b| (b'0'..=b'7').contains(b))
                .count();
            let code = u32::from_str_radix(&s[1..1 + digits], 8).ok()?;
            return Some((Some(char::from_u32(code)?), 1 + digits));
        }
        'x' => return hex_escape(s, 2).map(|c| (Some(c), 4)),
        'U' => return hex_escape(s, 8).map(|c| (Some(c), 10)),
        'N' => {
            // \N{NAME}, resolved against the Unicode character names.
            let name = s[2..].strip_prefix('{')?;
            let close = memchr(b'}', name.as_bytes())?;
            let ch = unicode_names2::character(&name[..close])?;
            return Some((Some(ch), 3 + close + 1));
        }
        'u' => {
            let code = hex_code(s, 4)?;
            return match code {
                0xD800..=0xDBFF => {
                    // A high surrogate must be followed by an escaped low one.
                    let low = s.get(6..).filter(|rest| rest.starts_with("\\u"))?;
                    let low = hex_code(low, 4).filter(|c| (0xDC00..=0xDFFF).contains(c))?;
                    let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                    Some((Some(char::from_u32(combined)?), 12))
                }
                _ => Some((Some(char::from_u32(code)?), 6)),
            };
        }
        _ => return None,
    };
    Some((Some(simple), 2))
}

/// Reads exactly `digits` hex digits following the two-byte escape marker.
fn hex_code(s: &str, digits: usize) -> Option<u32> {
    let hex = s.get(2..2 + digits)?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}

fn hex_escape(s: &str, digits: usize) -> Option<char> {
    char::from_u32(hex_code(s, digits)?)
}

/// The text of a failed escape, for error messages: the backslash, its
/// marker, and for hex escapes as many following characters as the escape
/// would have used. A named escape runs to its closing brace.
fn escape_excerpt(s: &str) -> &str {
    let width = match s[1..].chars().next() {
        Some('N') => return s.find('}').map_or(&s[..2], |close| &s[..=close]),
        Some('x') => 4,
        Some('u') => 6,
        Some('U') => 10,
        _ => 2,
    };
    let end = s
        .char_indices()
        .nth(width)
        .map_or(s.len(), |(i, _)| i);
    &s[..end]
}
