//! XML 1.0 character validation.
//!
//! `Char ::= #x9 | #xA | #xD | [#x20-#xD7FF] | [#xE000-#xFFFD] | [#x10000-#x10FFFF]`
//!
//! In strict mode the first disallowed character is reported as
//! [`InvalidCharacter`]; in clean mode every disallowed character is dropped
//! and the rest of the text is kept in order.

use std::borrow::Cow;

use super::error::InvalidCharacter;

/// Whether `c` matches the XML 1.0 `Char` production.
pub fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\u{9}'
            | '\u{A}'
            | '\u{D}'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Validate (`clean == false`) or clean (`clean == true`) a string.
///
/// Text without disallowed characters is returned borrowed.
pub fn sanitize(text: &str, clean: bool) -> Result<Cow<'_, str>, InvalidCharacter> {
    let Some(offset) = text.find(|c: char| !is_xml_char(c)) else {
        return Ok(Cow::Borrowed(text));
    };

    if !clean {
        let code_point = text[offset..].chars().next().map_or(0, u32::from);
        return Err(InvalidCharacter {
            value: text.to_owned(),
            offset,
            code_point,
        });
    }

    let cleaned: String = text.chars().filter(|&c| is_xml_char(c)).collect();
    log::debug!(
        "stripped {} invalid XML character(s) from text",
        text.chars().count() - cleaned.chars().count()
    );
    Ok(Cow::Owned(cleaned))
}

/// Decode UTF-16 code units, validating or cleaning them like [`sanitize`].
///
/// Correctly paired surrogates decode to supplementary-plane characters;
/// lone surrogates count as invalid characters.
pub fn sanitize_utf16(units: &[u16], clean: bool) -> Result<String, InvalidCharacter> {
    let mut out = String::with_capacity(units.len());
    let mut index = 0;

    for decoded in char::decode_utf16(units.iter().copied()) {
        let (ch, width, code_point) = match decoded {
            Ok(c) => (Some(c).filter(|&c| is_xml_char(c)), c.len_utf16(), u32::from(c)),
            Err(e) => (None, 1, u32::from(e.unpaired_surrogate())),
        };
        match ch {
            Some(c) => out.push(c),
            None if clean => {}
            None => {
                return Err(InvalidCharacter {
                    value: String::from_utf16_lossy(units),
                    offset: index,
                    code_point,
                });
            }
        }
        index += width;
    }

    Ok(out)
}
