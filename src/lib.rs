//! # dml-parser
//!
//! `dml-parser` reads DML (Data Markup Language), a superset of JSON, into
//! an in-memory [`Value`] tree.
//!
//! On top of JSON, DML allows:
//!
//! * **Sections:** a document that does not start with `{` is a list of
//!   `key: value` pairs whose keys are bare identifiers or `@keywords`.
//! * **Unquoted object keys:** identifiers and `@keywords` work as keys
//!   inside objects as well as quoted strings.
//! * **Raw expressions:** a value that is not an object, array, string,
//!   number or literal is kept as the verbatim text of its tokens, joined
//!   without separators. It is never evaluated.
//!
//! ## Quick Start
//!
//! ```
//! use dml_parser::{parse, Value};
//!
//! let doc = parse(r#"
//!     @meta: {name: "inventory", version: 2}
//!     limit: max_items * 2
//! "#).unwrap();
//!
//! assert_eq!(doc.get("@meta").and_then(|m| m.get("version")), Some(&Value::from(2)));
//! assert_eq!(doc.get("limit"), Some(&Value::RawExpression("max_items*2".to_string())));
//! ```
//!
//! A document that starts with `{` is parsed as a single object, so plain
//! JSON objects are valid DML:
//!
//! ```
//! use dml_parser::parse;
//!
//! let doc = parse(r#"{"id": 1815, "tags": ["a", "b"]}"#).unwrap();
//! assert_eq!(doc.stringify().unwrap(), r#"{"id":1815,"tags":["a","b"]}"#);
//! ```
//!
//! ## Tokenizing
//!
//! Characters that no token pattern accepts are dropped silently. Use
//! [`ParseOptions::with_strict`] to reject them instead.

/// Contains the `ParseError` and `Error` types.
pub mod error;
/// Contains `ParseOptions`.
pub mod options;
/// Contains the recursive-descent `Parser`.
pub mod parser;
/// Contains the `Token` and `TokenKind` types.
pub mod token;
/// Contains the regex-driven `Tokenizer`.
pub mod tokenizer;
/// Contains the `Value` enum and the JSON rendering logic.
pub mod value;

pub use error::{Error, ParseError};
pub use options::{ParseOptions, DEFAULT_MAX_DEPTH};
pub use parser::{parse_tokens, Parser};
pub use token::{Token, TokenKind};
pub use tokenizer::{tokenize, tokenize_strict, Tokenizer};
pub use value::{Map, StringifyOptions, Value};

use std::fs;
use std::path::Path;

/// Parses a DML string into a `Value` with default options.
///
/// # Errors
/// Returns a `ParseError` describing the first grammar violation, with the
/// offending token kind and byte offset.
///
/// # Examples
/// ```
/// use dml_parser::{parse, Value};
///
/// let doc = parse("answer: 42").unwrap();
/// assert_eq!(doc.get("answer"), Some(&Value::from(42)));
/// ```
pub fn parse(input: &str) -> Result<Value, ParseError> {
    parse_with(input, &ParseOptions::default())
}

/// Parses a DML string into a `Value` using `options`.
pub fn parse_with(input: &str, options: &ParseOptions) -> Result<Value, ParseError> {
    let tokens = if options.strict {
        tokenize_strict(input)?
    } else {
        tokenize(input)
    };
    Parser::new(&tokens)
        .with_max_depth(options.max_depth)
        .parse()
}

/// Reads the file at `path` as UTF-8 and parses it with default options.
///
/// # Errors
/// Returns `Error::Io` if the file cannot be read or is not valid UTF-8,
/// and `Error::Parse` if its contents are not valid DML.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Value, Error> {
    parse_file_with(path, &ParseOptions::default())
}

/// Reads the file at `path` and parses it using `options`.
pub fn parse_file_with(path: impl AsRef<Path>, options: &ParseOptions) -> Result<Value, Error> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = source.len(), "read DML file");
    Ok(parse_with(&source, options)?)
}
