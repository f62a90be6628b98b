//! Contains the `Value` enum, the in-memory tree a DML document parses into.
//!
//! This module also includes the "stringify" logic for rendering a `Value`
//! as JSON, which is how parsed documents are displayed.
use crate::error::ParseError;
use indexmap::IndexMap;
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use std::fmt;

/// The key/value storage of `Value::Object`.
///
/// Iteration follows the order in which keys first appeared in the source.
/// Inserting an existing key replaces its value but keeps its position.
pub type Map = IndexMap<String, Value>;

/// A parsed DML value.
#[derive(Debug, PartialEq, Clone)]
pub enum Value {
    /// An object, or the set of top-level sections of a document.
    Object(Map),
    /// An array (list).
    Array(Vec<Value>),
    /// A string with its escapes resolved.
    String(String),
    /// A number written without `.`, `e` or `E`. Exact at any size.
    Int(BigInt),
    /// A number written with a fraction or an exponent.
    Float(f64),
    /// `true` or `false`.
    Bool(bool),
    /// `null`.
    Null,
    /// Any other value: the verbatim text of its tokens, joined without
    /// separators. Never evaluated.
    RawExpression(String),
}

impl Value {
    /// Parses a DML string into a `Value`.
    ///
    /// Shorthand for [`crate::parse`].
    ///
    /// # Errors
    /// Returns a `ParseError` if the input is empty or malformed.
    pub fn parse(input: &str) -> Result<Value, ParseError> {
        crate::parse(input)
    }

    /// The name of the variant, e.g. `"object"` or `"raw expression"`.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Object(_) => "object",
            Value::Array(_) => "array",
            Value::String(_) => "string",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Null => "null",
            Value::RawExpression(_) => "raw expression",
        }
    }

    /// Looks up `key` if this is an object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object()?.get(key)
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<&BigInt> {
        match self {
            Value::Int(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the integer if it fits in an `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_int().and_then(|n| i64::try_from(n).ok())
    }

    /// Returns the number as a float, widening `Int`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            Value::Int(n) => n.to_f64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_raw_expression(&self) -> Option<&str> {
        match self {
            Value::RawExpression(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Int(BigInt::from(n))
                }
            }
        )*
    };
}

from_integer!(i32, i64, u32, u64, i128, u128);

impl From<BigInt> for Value {
    fn from(n: BigInt) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Object(map)
    }
}

/// How [`Value::stringify_with`] renders JSON.
///
/// The default is compact, strict JSON with UTF-8 passed through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StringifyOptions {
    /// One member per line, four spaces per level, `": "` after keys.
    pub pretty: bool,
    /// Escape every non-ASCII character as `\uXXXX`, using a surrogate
    /// pair above U+FFFF.
    pub ascii_only: bool,
    /// Write `NaN`, `Infinity` and `-Infinity` instead of failing. The
    /// output is then no longer strict JSON.
    pub non_finite: bool,
}

impl StringifyOptions {
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_ascii_only(mut self, ascii_only: bool) -> Self {
        self.ascii_only = ascii_only;
        self
    }

    pub fn with_non_finite(mut self, non_finite: bool) -> Self {
        self.non_finite = non_finite;
        self
    }
}

impl Value {
    /// Serializes the `Value` into a compact JSON string.
    ///
    /// A `RawExpression` is written as a JSON string.
    ///
    /// # Errors
    /// Returns `fmt::Error` if the value contains a NaN or infinite float,
    /// which JSON cannot represent.
    pub fn stringify(&self) -> Result<String, fmt::Error> {
        self.stringify_with(&StringifyOptions::default())
    }

    /// Serializes the `Value` into indented JSON: one member per line,
    /// four spaces per level, `": "` after keys.
    ///
    /// # Errors
    /// Returns `fmt::Error` if the value contains a NaN or infinite float.
    pub fn stringify_pretty(&self) -> Result<String, fmt::Error> {
        self.stringify_with(&StringifyOptions::default().with_pretty(true))
    }

    /// Serializes the `Value` as `options` describe.
    ///
    /// # Errors
    /// Returns `fmt::Error` for a NaN or infinite float unless
    /// `options.non_finite` is set.
    ///
    /// # Examples
    /// ```
    /// use dml_parser::{parse, StringifyOptions};
    ///
    /// let doc = parse("x: 1e999").unwrap();
    /// let options = StringifyOptions::default().with_non_finite(true);
    /// assert_eq!(doc.stringify_with(&options).unwrap(), r#"{"x":Infinity}"#);
    /// ```
    pub fn stringify_with(&self, options: &StringifyOptions) -> Result<String, fmt::Error> {
        let mut output = String::new();
        if options.pretty {
            Self::write_value_pretty(self, &mut output, options, 0)?;
        } else {
            Self::write_value(self, &mut output, options)?;
        }
        Ok(output)
    }

    fn write_value<W: fmt::Write>(value: &Value, w: &mut W, opts: &StringifyOptions) -> fmt::Result {
        match value {
            Value::Array(a) => Self::write_array(a, w, opts),
            Value::Object(o) => Self::write_object(o, w, opts),
            scalar => Self::write_scalar(scalar, w, opts),
        }
    }

    /// Writes anything that is not a container. Shared by both printers.
    fn write_scalar<W: fmt::Write>(value: &Value, w: &mut W, opts: &StringifyOptions) -> fmt::Result {
        match value {
            Value::Null => w.write_str("null"),
            Value::Bool(b) => w.write_str(if *b { "true" } else { "false" }),
            Value::Int(n) => write!(w, "{n}"),
            Value::Float(f) if !f.is_finite() => {
                if !opts.non_finite {
                    return Err(fmt::Error);
                }
                w.write_str(if f.is_nan() {
                    "NaN"
                } else if *f > 0.0 {
                    "Infinity"
                } else {
                    "-Infinity"
                })
            }
            // Debug formatting always keeps a '.' or an exponent, so the
            // output reads back as a float.
            Value::Float(f) => write!(w, "{f:?}"),
            Value::String(s) | Value::RawExpression(s) => Self::write_string(s, w, opts),
            Value::Array(_) | Value::Object(_) => Err(fmt::Error),
        }
    }

    fn write_array<W: fmt::Write>(arr: &[Value], w: &mut W, opts: &StringifyOptions) -> fmt::Result {
        w.write_char('[')?;
        for (i, val) in arr.iter().enumerate() {
            if i > 0 {
                w.write_char(',')?;
            }
            Self::write_value(val, w, opts)?;
        }
        w.write_char(']')
    }

    fn write_object<W: fmt::Write>(obj: &Map, w: &mut W, opts: &StringifyOptions) -> fmt::Result {
        w.write_char('{')?;
        for (i, (key, val)) in obj.iter().enumerate() {
            if i > 0 {
                w.write_char(',')?;
            }
            Self::write_string(key, w, opts)?;
            w.write_char(':')?;
            Self::write_value(val, w, opts)?;
        }
        w.write_char('}')
    }

    /// Writes `s` as a quoted JSON string.
    fn write_string<W: fmt::Write>(s: &str, w: &mut W, opts: &StringifyOptions) -> fmt::Result {
        w.write_char('"')?;
        for c in s.chars() {
            match c {
                '"' => w.write_str("\\\""),
                '\\' => w.write_str("\\\\"),
                '\u{0008}' => w.write_str("\\b"),
                '\u{000C}' => w.write_str("\\f"),
                '\n' => w.write_str("\\n"),
                '\r' => w.write_str("\\r"),
                '\t' => w.write_str("\\t"),
                // Control characters must be escaped as \uXXXX
                '\u{0000}'..='\u{001F}' => write!(w, "\\u{:04x}", c as u32),
                c if opts.ascii_only && !c.is_ascii() => {
                    let mut units = [0u16; 2];
                    for unit in c.encode_utf16(&mut units) {
                        write!(w, "\\u{:04x}", unit)?;
                    }
                    Ok(())
                }
                _ => w.write_char(c),
            }?;
        }
        w.write_char('"')
    }

    // --- Pretty-Printing Logic ---
    /// The indentation used for pretty-printing (four spaces).
    const INDENT: &'static str = "    ";

    fn write_value_pretty<W: fmt::Write>(
        value: &Value,
        w: &mut W,
        opts: &StringifyOptions,
        depth: usize,
    ) -> fmt::Result {
        match value {
            Value::Array(a) => Self::write_array_pretty(a, w, opts, depth),
            Value::Object(o) => Self::write_object_pretty(o, w, opts, depth),
            scalar => Self::write_scalar(scalar, w, opts),
        }
    }

    fn write_array_pretty<W: fmt::Write>(
        arr: &[Value],
        w: &mut W,
        opts: &StringifyOptions,
        depth: usize,
    ) -> fmt::Result {
        if arr.is_empty() {
            return w.write_str("[]");
        }

        let new_depth = depth + 1;
        let indent = Self::INDENT.repeat(new_depth);

        w.write_str("[\n")?;
        for (i, val) in arr.iter().enumerate() {
            if i > 0 {
                w.write_str(",\n")?;
            }
            w.write_str(&indent)?;
            Self::write_value_pretty(val, w, opts, new_depth)?;
        }
        write!(w, "\n{}]", Self::INDENT.repeat(depth))
    }

    fn write_object_pretty<W: fmt::Write>(
        obj: &Map,
        w: &mut W,
        opts: &StringifyOptions,
        depth: usize,
    ) -> fmt::Result {
        if obj.is_empty() {
            return w.write_str("{}");
        }

        let new_depth = depth + 1;
        let indent = Self::INDENT.repeat(new_depth);

        w.write_str("{\n")?;
        for (i, (key, val)) in obj.iter().enumerate() {
            if i > 0 {
                w.write_str(",\n")?;
            }
            w.write_str(&indent)?;
            Self::write_string(key, w, opts)?;
            w.write_str(": ")?;
            Self::write_value_pretty(val, w, opts, new_depth)?;
        }
        write!(w, "\n{}}}", Self::INDENT.repeat(depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn object(entries: Vec<(&str, Value)>) -> Value {
        Value::Object(entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }

    #[test]
    fn test_stringify_all_types() {
        assert_eq!(Value::Null.stringify().unwrap(), "null");
        assert_eq!(Value::Bool(true).stringify().unwrap(), "true");
        assert_eq!(Value::Bool(false).stringify().unwrap(), "false");
        assert_eq!(Value::from(-42).stringify().unwrap(), "-42");
        assert_eq!(Value::Float(1000.0).stringify().unwrap(), "1000.0");
        assert_eq!(Value::Float(-0.5).stringify().unwrap(), "-0.5");
        assert_eq!(Value::Float(1e300).stringify().unwrap(), "1e300");
        assert_eq!(
            Value::RawExpression("a+b".to_string()).stringify().unwrap(),
            r#""a+b""#
        );
        assert_eq!(Value::Array(vec![]).stringify().unwrap(), "[]");
        assert_eq!(Value::Object(Map::new()).stringify().unwrap(), "{}");

        let arr = Value::Array(vec![
            Value::from(1),
            Value::from("test"),
            Value::Bool(true),
            Value::Null,
            Value::Object(Map::new()),
        ]);
        assert_eq!(arr.stringify().unwrap(), r#"[1,"test",true,null,{}]"#);
    }

    #[test]
    fn test_stringify_keeps_insertion_order() {
        let value = object(vec![
            ("zeta", Value::from(1)),
            ("alpha", Value::from(2)),
            ("mid", Value::from(3)),
        ]);
        assert_eq!(value.stringify().unwrap(), r#"{"zeta":1,"alpha":2,"mid":3}"#);
    }

    #[test]
    fn test_stringify_string_escapes() {
        let s = Value::from("\" \\ / \u{0008} \u{000C} \n \r \t");
        assert_eq!(s.stringify().unwrap(), r#""\" \\ / \b \f \n \r \t""#);

        let s = Value::from("hello\u{0001}world é");
        assert_eq!(s.stringify().unwrap(), r#""hello\u0001world é""#);
    }

    #[test]
    fn test_stringify_big_integers_exactly() {
        let big: BigInt = "-123456789012345678901234567890".parse().unwrap();
        let value = Value::Array(vec![Value::from(u64::MAX), Value::from(big.clone())]);
        assert_eq!(
            value.stringify().unwrap(),
            "[18446744073709551615,-123456789012345678901234567890]"
        );
        assert_eq!(Value::from(big.clone()).as_int(), Some(&big));
        assert_eq!(Value::from(big).as_i64(), None);
        assert_eq!(Value::from(u64::MAX).as_f64(), Some(u64::MAX as f64));
    }

    #[test]
    fn test_stringify_ascii_only() {
        let options = StringifyOptions::default().with_ascii_only(true);
        let s = Value::from("caf\u{e9} \u{2013} \u{1F600} \u{1}");
        assert_eq!(
            s.stringify_with(&options).unwrap(),
            r#""caf\u00e9 \u2013 \ud83d\ude00 \u0001""#
        );
        let key = object(vec![("\u{e9}", Value::Null)]);
        assert_eq!(key.stringify_with(&options).unwrap(), r#"{"\u00e9":null}"#);
    }

    #[test]
    fn test_stringify_non_finite_literals() {
        let value = Value::Array(vec![
            Value::Float(f64::INFINITY),
            Value::Float(f64::NEG_INFINITY),
            Value::Float(f64::NAN),
        ]);
        let options = StringifyOptions::default().with_non_finite(true);
        assert_eq!(
            value.stringify_with(&options).unwrap(),
            "[Infinity,-Infinity,NaN]"
        );
        assert_eq!(
            value.stringify_with(&options.with_pretty(true)).unwrap(),
            "[\n    Infinity,\n    -Infinity,\n    NaN\n]"
        );
    }

    #[test]
    fn test_stringify_rejects_non_finite() {
        assert!(Value::Float(f64::NAN).stringify().is_err());
        assert!(Value::Array(vec![Value::Float(f64::INFINITY)])
            .stringify_pretty()
            .is_err());
    }

    #[test]
    fn test_stringify_pretty_print() {
        let value = object(vec![
            ("@meta", object(vec![("name", Value::from("x")), ("version", Value::from(1))])),
            (
                "items",
                Value::Array(vec![Value::from(1), Value::Null, Value::Array(vec![])]),
            ),
            ("empty", Value::Object(Map::new())),
        ]);
        let expected = r#"{
    "@meta": {
        "name": "x",
        "version": 1
    },
    "items": [
        1,
        null,
        []
    ],
    "empty": {}
}"#;
        assert_eq!(value.stringify_pretty().unwrap(), expected);
    }

    #[test]
    fn test_stringify_pretty_empty() {
        assert_eq!(Value::Object(Map::new()).stringify_pretty().unwrap(), "{}");
        assert_eq!(Value::Array(vec![]).stringify_pretty().unwrap(), "[]");
        assert_eq!(Value::from(7).stringify_pretty().unwrap(), "7");
    }

    #[test]
    fn test_accessors() {
        let value = object(vec![
            ("n", Value::from(3)),
            ("f", Value::Float(2.5)),
            ("s", Value::from("text")),
            ("e", Value::RawExpression("x*2".to_string())),
            ("list", Value::from(vec![Value::Bool(false)])),
            ("nothing", Value::Null),
        ]);
        assert_eq!(value.type_name(), "object");
        assert_eq!(value.get("n").and_then(Value::as_i64), Some(3));
        assert_eq!(value.get("n").and_then(Value::as_f64), Some(3.0));
        assert_eq!(value.get("f").and_then(Value::as_f64), Some(2.5));
        assert_eq!(value.get("f").and_then(Value::as_i64), None);
        assert_eq!(value.get("s").and_then(Value::as_str), Some("text"));
        assert_eq!(value.get("e").and_then(Value::as_raw_expression), Some("x*2"));
        assert_eq!(value.get("e").and_then(Value::as_str), None);
        assert_eq!(
            value.get("list").and_then(Value::as_array),
            Some(&[Value::Bool(false)][..])
        );
        assert!(value.get("nothing").is_some_and(Value::is_null));
        assert_eq!(value.get("missing"), None);
        assert_eq!(Value::from(1).get("n"), None);
    }

    #[test]
    fn test_reinsert_keeps_position() {
        let mut map = Map::new();
        map.insert("a".to_string(), Value::from(1));
        map.insert("b".to_string(), Value::from(2));
        map.insert("a".to_string(), Value::from(3));
        assert_eq!(Value::Object(map).stringify().unwrap(), r#"{"a":3,"b":2}"#);
    }
}
