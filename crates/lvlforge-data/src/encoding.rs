//! Whole-file Windows-1252 conversion.

use encoding_rs::WINDOWS_1252;
use lvlforge_types::cp1252;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    #[error("byte {byte:#04x} at offset {offset} is undefined in Windows-1252")]
    UndefinedByte { offset: usize, byte: u8 },
    #[error("line {line}: {ch:?} cannot be written in Windows-1252")]
    Unencodable { line: usize, ch: char },
    #[error("text is not valid Windows-1252")]
    Malformed,
}

/// Decode a level file's raw bytes.
pub fn decode(bytes: &[u8]) -> Result<String, EncodingError> {
    let text = WINDOWS_1252
        .decode_without_bom_handling_and_without_replacement(bytes)
        .ok_or(EncodingError::Malformed)?;
    // Single-byte code page: the n-th char came from the n-th byte.
    if let Some((offset, (&byte, _))) = bytes
        .iter()
        .zip(text.chars())
        .enumerate()
        .find(|(_, (_, c))| cp1252::is_undefined(*c))
    {
        return Err(EncodingError::UndefinedByte { offset, byte });
    }
    Ok(text.into_owned())
}

/// Encode text for writing back to disk.
pub fn encode(text: &str) -> Result<Vec<u8>, EncodingError> {
    let (bytes, _, unmappable) = WINDOWS_1252.encode(text);
    if unmappable || text.chars().any(cp1252::is_undefined) {
        return Err(first_unencodable(text));
    }
    Ok(bytes.into_owned())
}

fn first_unencodable(text: &str) -> EncodingError {
    text.split('\n')
        .enumerate()
        .find_map(|(i, line)| {
            line.chars()
                .find(|&ch| cp1252::encode_char(ch).is_none())
                .map(|ch| EncodingError::Unencodable { line: i + 1, ch })
        })
        .unwrap_or(EncodingError::Malformed)
}
