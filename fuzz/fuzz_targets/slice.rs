#![no_main]
use libfuzzer_sys::fuzz_target;
use parsers::slice::extract_code_block;

fuzz_target!(|data: &[u8]| {
    if let Some((&start, rest)) = data.split_first() {
        if let Ok(s) = std::str::from_utf8(rest) {
            let _ = extract_code_block(s, start as usize);
        }
    }
});
