//! XML Attribute Parsing
//!
//! Splits the inside of a start tag into name/value pairs. Values are
//! returned raw; entity decoding happens in the reader, which knows the
//! document's declared entities.

use super::scanner::{is_name_char, is_name_start_char, is_whitespace};

/// An attribute as written in the tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAttribute<'a> {
    pub name: &'a str,
    /// Undecoded value, without quotes
    pub value: &'a str,
    /// Byte offset of the value within the parsed slice
    pub value_offset: usize,
}

/// Attribute syntax error with its offset in the parsed slice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeError {
    pub message: &'static str,
    pub offset: usize,
}

fn fail<T>(message: &'static str, offset: usize) -> Result<T, AttributeError> {
    Err(AttributeError { message, offset })
}

/// Parse attributes from tag content (between the element name and '>' or '/>')
pub fn parse_attributes(input: &str) -> Result<Vec<RawAttribute<'_>>, AttributeError> {
    let bytes = input.as_bytes();
    let mut attrs: Vec<RawAttribute<'_>> = Vec::new();
    let mut pos = 0;

    loop {
        let ws_start = pos;
        while pos < bytes.len() && is_whitespace(bytes[pos]) {
            pos += 1;
        }
        if pos >= bytes.len() {
            break;
        }
        if pos == ws_start {
            return fail("Whitespace required before attribute", pos);
        }

        // Name
        let name_start = pos;
        if !is_name_start_char(bytes[pos]) {
            return fail("Attribute name must start with letter, underscore, or colon", pos);
        }
        while pos < bytes.len() && is_name_char(bytes[pos]) {
            pos += 1;
        }
        let name = &input[name_start..pos];

        while pos < bytes.len() && is_whitespace(bytes[pos]) {
            pos += 1;
        }
        if pos >= bytes.len() || bytes[pos] != b'=' {
            return fail("Attribute value required", pos);
        }
        pos += 1;
        while pos < bytes.len() && is_whitespace(bytes[pos]) {
            pos += 1;
        }

        // Quoted value
        let quote = match bytes.get(pos) {
            Some(&q @ (b'"' | b'\'')) => q,
            _ => return fail("Attribute value must be quoted", pos),
        };
        pos += 1;
        let value_start = pos;
        let len = match memchr::memchr(quote, &bytes[pos..]) {
            Some(len) => len,
            None => return fail("Attribute value has mismatched quotes", value_start - 1),
        };
        let value = &input[value_start..value_start + len];
        if let Some(lt) = memchr::memchr(b'<', value.as_bytes()) {
            return fail("Attribute value cannot contain '<'", value_start + lt);
        }
        pos = value_start + len + 1;

        if attrs.iter().any(|a| a.name == name) {
            return fail("Duplicate attribute", name_start);
        }
        attrs.push(RawAttribute {
            name,
            value,
            value_offset: value_start,
        });
    }

    Ok(attrs)
}
