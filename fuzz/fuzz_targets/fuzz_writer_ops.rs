#![no_main]

use libfuzzer_sys::fuzz_target;
use profile_xml::{Profile, WriterOptionsBuilder, XmlBufferWriter};

// Each byte pair is one writer operation; the writer must never panic and
// the stack must balance once every opened element is closed.
fuzz_target!(|data: &[u8]| {
    let Ok(options) = WriterOptionsBuilder::new(Profile::COMFORT)
        .auto_clean(data.first().is_some_and(|b| b & 1 == 1))
        .build()
    else {
        return;
    };
    let Ok(mut w) = XmlBufferWriter::in_memory(options) else {
        return;
    };
    let mut open = 0usize;
    for op in data.chunks_exact(2) {
        let profile = Profile::from_bits_truncate(u32::from(op[1]));
        let text = char::from(op[1]).to_string();
        let _ = match op[0] % 7 {
            0 => {
                open += 1;
                w.start_element("", "E", profile)
            }
            1 if open > 0 => {
                open -= 1;
                w.end_element()
            }
            2 => w.write_element_string("", "L", &text, profile),
            3 if open > 0 => w.write_attribute_string("", "a", &text, profile),
            4 if open > 0 => w.write_value(&text, profile),
            5 => w.write_comment("c", profile),
            6 => w.write_raw_indentation(profile),
            _ => Ok(()),
        };
    }
    assert_eq!(w.depth(), open);
    let _ = w.end_document();
    assert_eq!(w.depth(), 0);
    let _ = w.into_string();
});
