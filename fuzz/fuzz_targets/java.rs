#![no_main]
use libfuzzer_sys::fuzz_target;
use parsers::{locate_method, parse_java};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(unit) = parse_java(s, "Fuzz.java") {
            for decl in &unit.types {
                for m in &decl.methods {
                    let _ = locate_method(s, &decl.name, &m.name);
                }
            }
        }
    }
});
