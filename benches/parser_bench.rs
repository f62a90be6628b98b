use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dml_parser::{parse, tokenize};
use serde_json::Value;

// A sample "medium" document that is valid JSON and therefore valid DML.
const MEDIUM_JSON: &str = r#"
{
    "service": "inventory",
    "replicas": 3,
    "debug": false,
    "regions": ["eu-west", "us-east", "ap-south"],
    "routes": [
        { "path": "/items", "timeout": 2.5, "cached": true },
        { "path": "/orders", "timeout": 10, "cached": false }
    ],
    "limits": {"burst": [null, 64, 6.4e1], "label": "tier \"gold\""}
}
"#;

// The same kind of data in section form, with raw expressions.
const MEDIUM_DML: &str = r#"
@meta: {name: "inventory", version: 3, tags: ["engine", "analytical"]}
@limits: {max_items: capacity * 2, ratio: 0.75, enabled: true}
tasks: [
    {id: 1, title: "ship", when: now() + days(2)},
    {id: 2, title: "restock", when: @meta.version >= 3}
]
owner: admin.name
"#;

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("DML Parsing");

    group.bench_function("tokenize (JSON input)", |b| {
        b.iter(|| tokenize(black_box(MEDIUM_JSON)).len())
    });

    group.bench_function("parse (JSON input)", |b| {
        b.iter(|| parse(black_box(MEDIUM_JSON)).unwrap())
    });

    group.bench_function("parse (DML sections)", |b| {
        b.iter(|| parse(black_box(MEDIUM_DML)).unwrap())
    });

    group.bench_function("serde_json::from_str", |b| {
        b.iter(|| {
            let _: Value = serde_json::from_str(black_box(MEDIUM_JSON)).unwrap();
        })
    });

    group.finish();
}

fn bench_stringifying(c: &mut Criterion) {
    let value = parse(MEDIUM_JSON).unwrap();
    let serde_value: Value = serde_json::from_str(MEDIUM_JSON).unwrap();

    let mut group = c.benchmark_group("JSON Rendering");

    group.bench_function("Value::stringify_pretty", |b| {
        b.iter(|| black_box(&value).stringify_pretty().unwrap())
    });

    group.bench_function("serde_json::to_string_pretty", |b| {
        b.iter(|| serde_json::to_string_pretty(black_box(&serde_value)).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_parsing, bench_stringifying);
criterion_main!(benches);
