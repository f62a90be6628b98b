//! Property tests: JSON objects must parse the same way serde_json parses
//! them, and rendering a parsed document back to JSON must be lossless.

use dml_parser::{parse, Value};
use proptest::prelude::*;
use serde_json::Value as SerdeValue;

fn to_serde(value: &Value) -> SerdeValue {
    match value {
        Value::Object(map) => SerdeValue::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), to_serde(v)))
                .collect(),
        ),
        Value::Array(items) => SerdeValue::Array(items.iter().map(to_serde).collect()),
        Value::String(s) | Value::RawExpression(s) => SerdeValue::String(s.clone()),
        Value::Int(n) => i64::try_from(n)
            .map(SerdeValue::from)
            .or_else(|_| u64::try_from(n).map(SerdeValue::from))
            .expect("integer within serde_json's range"),
        Value::Float(f) => SerdeValue::from(*f),
        Value::Bool(b) => SerdeValue::Bool(*b),
        Value::Null => SerdeValue::Null,
    }
}

fn arb_leaf() -> impl Strategy<Value = SerdeValue> {
    prop_oneof![
        Just(SerdeValue::Null),
        any::<bool>().prop_map(SerdeValue::Bool),
        any::<i64>().prop_map(SerdeValue::from),
        any::<u64>().prop_map(SerdeValue::from),
        // Eighths are exact in binary, so every float parser agrees on them.
        (-1_000_000i32..1_000_000).prop_map(|n| SerdeValue::from(f64::from(n) / 8.0)),
        ".{0,12}".prop_map(SerdeValue::String),
    ]
}

fn arb_object(inner: impl Strategy<Value = SerdeValue>) -> impl Strategy<Value = SerdeValue> {
    prop::collection::vec((".{0,8}", inner), 0..6)
        .prop_map(|entries| SerdeValue::Object(entries.into_iter().collect()))
}

fn arb_value() -> impl Strategy<Value = SerdeValue> {
    arb_leaf().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(SerdeValue::Array),
            arb_object(inner),
        ]
    })
}

proptest! {
    #[test]
    fn json_objects_parse_like_serde(doc in arb_object(arb_value())) {
        let text = serde_json::to_string(&doc).unwrap();
        let ours = parse(&text).unwrap();
        let theirs: SerdeValue = serde_json::from_str(&text).unwrap();
        prop_assert_eq!(to_serde(&ours), theirs);
    }

    #[test]
    fn pretty_json_parses_like_compact(doc in arb_object(arb_value())) {
        let compact = parse(&serde_json::to_string(&doc).unwrap()).unwrap();
        let pretty = parse(&serde_json::to_string_pretty(&doc).unwrap()).unwrap();
        prop_assert_eq!(compact, pretty);
    }

    #[test]
    fn stringify_round_trips(doc in arb_object(arb_value())) {
        let first = parse(&serde_json::to_string(&doc).unwrap()).unwrap();
        let again = parse(&first.stringify().unwrap()).unwrap();
        prop_assert_eq!(&first, &again);
        let pretty = parse(&first.stringify_pretty().unwrap()).unwrap();
        prop_assert_eq!(&first, &pretty);
    }

    #[test]
    fn arbitrary_input_never_panics(input in any::<String>()) {
        let _ = parse(&input);
    }

    #[test]
    fn expression_text_is_concatenated_tokens(
        words in prop::collection::vec(
            "[a-z]{1,6}".prop_filter("literal keyword", |w| !matches!(w.as_str(), "true" | "false" | "null")),
            1..6,
        )
    ) {
        let source = format!("expr: {}", words.join(" "));
        let doc = parse(&source).unwrap();
        let expected = Value::RawExpression(words.concat());
        prop_assert_eq!(doc.get("expr"), Some(&expected));
    }
}
