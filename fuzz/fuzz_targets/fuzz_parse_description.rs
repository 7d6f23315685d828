#![no_main]

use libfuzzer_sys::fuzz_target;

use icondiff_core::{extract, extract_description, parse_description, EncodeConfig};

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = parse_description(extract_description(text));
    }
    let _ = extract(Some(data), &EncodeConfig::fast());
});
