//! XML Encoding Detection and Conversion
//!
//! Detects UTF-16 by BOM or byte pattern and converts it to UTF-8.
//! Everything else must already be UTF-8.

use crate::error::ParseError;
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XmlEncoding {
    Utf8,
    Utf16Le,
    Utf16Be,
}

impl XmlEncoding {
    /// Detect encoding from byte order mark or initial bytes
    pub fn detect(input: &[u8]) -> Self {
        match input {
            [0xFF, 0xFE, ..] => XmlEncoding::Utf16Le,
            [0xFE, 0xFF, ..] => XmlEncoding::Utf16Be,
            // No BOM: '<' next to a NUL byte
            [0x00, b'<', ..] => XmlEncoding::Utf16Be,
            [b'<', 0x00, ..] => XmlEncoding::Utf16Le,
            _ => XmlEncoding::Utf8,
        }
    }
}

/// Decode document bytes to UTF-8 text
///
/// UTF-8 input without a BOM is borrowed; a UTF-8 BOM is stripped.
pub fn decode_document(input: &[u8]) -> Result<Cow<'_, str>, ParseError> {
    match XmlEncoding::detect(input) {
        XmlEncoding::Utf8 => {
            let body = input.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(input);
            std::str::from_utf8(body).map(Cow::Borrowed).map_err(|e| {
                let offset = e.valid_up_to();
                ParseError::at("Invalid UTF-8 encoding", body, offset)
            })
        }
        XmlEncoding::Utf16Le => decode_utf16(input, [0xFF, 0xFE], u16::from_le_bytes),
        XmlEncoding::Utf16Be => decode_utf16(input, [0xFE, 0xFF], u16::from_be_bytes),
    }
}

fn decode_utf16(
    input: &[u8],
    bom: [u8; 2],
    unit: fn([u8; 2]) -> u16,
) -> Result<Cow<'_, str>, ParseError> {
    let bytes = input.strip_prefix(&bom).unwrap_or(input);
    if bytes.len() % 2 != 0 {
        return Err(ParseError::at("Invalid UTF-16: odd number of bytes", input, input.len()));
    }

    let code_units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|chunk| unit([chunk[0], chunk[1]]))
        .collect();

    String::from_utf16(&code_units)
        .map(Cow::Owned)
        .map_err(|e| ParseError::at(format!("Invalid UTF-16: {}", e), input, 0))
}
