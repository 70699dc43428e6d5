//! Windows-1252, the code page level files are stored in.
//!
//! Conversion goes through `encoding_rs`. Its decoder follows the WHATWG
//! index and maps the five bytes the code page leaves undefined to the C1
//! control with the same value, so those are filtered out here.

use encoding_rs::WINDOWS_1252;

/// Whether `c` is one of the C1 controls (`U+0080..=U+009F`). No defined
/// Windows-1252 byte decodes to one.
pub fn is_undefined(c: char) -> bool {
    ('\u{80}'..='\u{9F}').contains(&c)
}

/// Decode a single byte. Returns `None` for the five undefined bytes.
pub fn decode_byte(byte: u8) -> Option<char> {
    let bytes = [byte];
    let text = WINDOWS_1252.decode_without_bom_handling_and_without_replacement(&bytes)?;
    text.chars().next().filter(|c| !is_undefined(*c))
}

/// Encode a single character, if the code page can represent it.
pub fn encode_char(c: char) -> Option<u8> {
    if is_undefined(c) {
        return None;
    }
    let mut buf = [0u8; 4];
    let (bytes, _, unmappable) = WINDOWS_1252.encode(c.encode_utf8(&mut buf));
    match (unmappable, bytes.as_ref()) {
        (false, &[byte]) => Some(byte),
        _ => None,
    }
}
