//! Fuzz target: field extraction from request payloads
//!
//! Feeds arbitrary text to the extractor and the typed helpers and asserts
//! that nothing panics and no output exceeds its buffer.
//!
//! cargo fuzz run fuzz_field_extractor

#![no_main]

use libfuzzer_sys::fuzz_target;
use wastenode::field::{self, VALUE_CAP};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };

    for key in ["threshold", "distance", "action", ""] {
        let mut small: heapless::String<4> = heapless::String::new();
        if field::extract(text, key, &mut small).is_ok() {
            assert!(small.len() <= 4);
        }
        if let Ok(v) = field::get(text, key) {
            assert!(v.len() <= VALUE_CAP);
        }
        let _ = field::get_i32(text, key);
        let _ = field::get_bool(text, key);
    }
});
