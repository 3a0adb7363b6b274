#![no_main]

use libfuzzer_sys::fuzz_target;
use profile_xml::{is_xml_char, sanitize_utf16};

fuzz_target!(|data: &[u8]| {
    let units: Vec<u16> = data
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect();
    let cleaned = sanitize_utf16(&units, true).expect("clean mode never fails");
    assert!(cleaned.chars().all(is_xml_char));
    let _ = sanitize_utf16(&units, false);
});
