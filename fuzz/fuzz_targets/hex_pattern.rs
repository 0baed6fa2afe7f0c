#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(pattern) = fwver::search::parse_hex_pattern(text) {
            assert_eq!(pattern.len() * 2, text.len());
            let _ = fwver::count(data, &pattern);
        }
    }
});
