#![no_main]

use libfuzzer_sys::fuzz_target;
use profile_xml::{is_xml_char, sanitize};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let cleaned = sanitize(s, true).expect("clean mode never fails");
        assert!(cleaned.chars().all(is_xml_char));
        if let Err(e) = sanitize(s, false) {
            assert!(!is_xml_char(s[e.offset..].chars().next().unwrap()));
        }
    }
});
