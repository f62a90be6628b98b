#![no_main]
use dml_parser::{parse, parse_with, ParseOptions};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Only UTF-8 input can reach the parser.
    if let Ok(s) = std::str::from_utf8(data) {
        // We are looking for panics, so results are ignored. Whatever
        // parses must also render without panicking.
        if let Ok(value) = parse(s) {
            let _ = value.stringify_pretty();
        }
        let _ = parse_with(s, &ParseOptions::default().with_strict(true));
    }
});
