//! XML Entity Decoding
//!
//! Handles:
//! - Built-in entities: &lt; &gt; &amp; &quot; &apos;
//! - Numeric character references: &#123; &#x7B;
//! - General entities declared in the DOCTYPE internal subset
//!
//! External entities are recorded but never resolved. Nothing here touches
//! the file system or the network.
//!
//! Uses Cow for zero-copy when no references are present.

use crate::options::{EntityPolicy, ParseOptions};
use memchr::memchr;
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

/// An entity value may reference other entities, but theirs may not
const MAX_NESTING: usize = 1;

/// Expansion may produce this many bytes per input byte
const EXPANSION_FACTOR: usize = 8;

/// Floor for the budget of short documents
const MIN_EXPANSION_BUDGET: usize = 16 * 1024;

/// A reference that could not be decoded, with its byte offset in the decoded slice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityError {
    pub message: String,
    pub offset: usize,
}

impl EntityError {
    fn new(message: impl Into<String>, offset: usize) -> Self {
        EntityError {
            message: message.into(),
            offset,
        }
    }
}

/// Bytes that internal entity expansion may still produce for one document
///
/// Each expansion is charged the length of the entity's replacement text
/// before it is decoded, so the total output of all expansions stays under
/// the initial budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpansionBudget {
    remaining: usize,
}

impl ExpansionBudget {
    pub fn new(bytes: usize) -> Self {
        ExpansionBudget { remaining: bytes }
    }

    /// Budget for a document of `len` bytes
    pub fn for_input(len: usize) -> Self {
        Self::new(len.saturating_mul(EXPANSION_FACTOR).max(MIN_EXPANSION_BUDGET))
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    fn charge(&mut self, bytes: usize) -> Result<(), EntityError> {
        self.remaining = self
            .remaining
            .checked_sub(bytes)
            .ok_or_else(|| EntityError::new("Entity expansion exceeds the size limit", 0))?;
        Ok(())
    }
}

/// General entities declared by the document
#[derive(Debug, Clone, Default)]
pub struct EntityTable {
    internal: HashMap<String, String>,
    external: HashSet<String>,
}

impl EntityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an entity with a literal replacement text. First declaration wins.
    pub fn declare_internal(&mut self, name: &str, value: &str) {
        if !self.is_declared(name) {
            self.internal.insert(name.to_string(), value.to_string());
        }
    }

    /// Declare an entity with a SYSTEM or PUBLIC identifier. First declaration wins.
    pub fn declare_external(&mut self, name: &str) {
        if !self.is_declared(name) {
            self.external.insert(name.to_string());
        }
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.internal.contains_key(name) || self.external.contains(name)
    }

    pub fn is_external(&self, name: &str) -> bool {
        self.external.contains(name)
    }

    pub fn internal_value(&self, name: &str) -> Option<&str> {
        self.internal.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.internal.len() + self.external.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Decode character data or an attribute value
///
/// Returns Borrowed if no references are present.
#[inline]
pub fn decode_text<'s>(
    input: &'s str,
    table: &EntityTable,
    options: &ParseOptions,
    budget: &mut ExpansionBudget,
) -> Result<Cow<'s, str>, EntityError> {
    // Fast path: no '&' at all
    if memchr(b'&', input.as_bytes()).is_none() {
        return Ok(Cow::Borrowed(input));
    }
    let mut out = String::with_capacity(input.len());
    let mut expansion = Expansion { active: Vec::new(), budget };
    decode_into(input, table, options, &mut out, &mut expansion)?;
    Ok(Cow::Owned(out))
}

/// Entities being expanded, outermost first, and the document's budget
struct Expansion<'b> {
    active: Vec<String>,
    budget: &'b mut ExpansionBudget,
}

fn decode_into(
    input: &str,
    table: &EntityTable,
    options: &ParseOptions,
    out: &mut String,
    expansion: &mut Expansion<'_>,
) -> Result<(), EntityError> {
    let bytes = input.as_bytes();
    let mut pos = 0;

    while let Some(amp) = memchr(b'&', &bytes[pos..]) {
        let amp_pos = pos + amp;
        out.push_str(&input[pos..amp_pos]);

        let semi = memchr(b';', &bytes[amp_pos..])
            .map(|i| amp_pos + i)
            .ok_or_else(|| EntityError::new("Unterminated entity reference", amp_pos))?;
        let name = &input[amp_pos + 1..semi];

        if let Some(digits) = name.strip_prefix('#') {
            let c = decode_char_ref(digits)
                .ok_or_else(|| EntityError::new(format!("Invalid character reference &{};", name), amp_pos))?;
            out.push(c);
        } else if let Some(c) = predefined(name) {
            out.push_str(c);
        } else {
            if !is_valid_entity_name(name) {
                return Err(EntityError::new("Malformed entity reference", amp_pos));
            }
            expand_named(name, table, options, out, expansion)
                .map_err(|e| EntityError::new(e.message, amp_pos))?;
        }
        pos = semi + 1;
    }

    out.push_str(&input[pos..]);
    Ok(())
}

fn expand_named(
    name: &str,
    table: &EntityTable,
    options: &ParseOptions,
    out: &mut String,
    expansion: &mut Expansion<'_>,
) -> Result<(), EntityError> {
    if options.expand_internal_entities {
        if let Some(value) = table.internal_value(name) {
            if expansion.active.iter().any(|n| n == name) {
                return Err(EntityError::new(format!("Recursive entity reference &{};", name), 0));
            }
            if expansion.active.len() > MAX_NESTING {
                return Err(EntityError::new(format!("Entity &{}; nested too deeply", name), 0));
            }
            expansion.budget.charge(value.len())?;
            expansion.active.push(name.to_string());
            let result = decode_into(value, table, options, out, expansion);
            expansion.active.pop();
            return result;
        }
    }

    if let Some(c) = character_entity(name) {
        if !table.is_declared(name) {
            out.push_str(c);
            return Ok(());
        }
    }

    match options.entity_policy {
        EntityPolicy::Skip => {
            tracing::trace!(entity = name, external = table.is_external(name), "skipping entity reference");
            Ok(())
        }
        EntityPolicy::Keep => {
            out.push('&');
            out.push_str(name);
            out.push(';');
            Ok(())
        }
        EntityPolicy::Reject => {
            let what = if table.is_external(name) { "External" } else { "Undeclared" };
            Err(EntityError::new(format!("{} entity &{}; not allowed", what, name), 0))
        }
    }
}

#[inline]
fn predefined(name: &str) -> Option<&'static str> {
    match name {
        "lt" => Some("<"),
        "gt" => Some(">"),
        "amp" => Some("&"),
        "quot" => Some("\""),
        "apos" => Some("'"),
        _ => None,
    }
}

/// Character entities from the ISO sets the patent DTDs import.
/// The DTD itself is never loaded, so the common ones are known here.
fn character_entity(name: &str) -> Option<&'static str> {
    match name {
        "nbsp" => Some("\u{00A0}"),
        "copy" => Some("\u{00A9}"),
        "reg" => Some("\u{00AE}"),
        "trade" => Some("\u{2122}"),
        "deg" => Some("\u{00B0}"),
        "plusmn" => Some("\u{00B1}"),
        "micro" => Some("\u{00B5}"),
        "middot" => Some("\u{00B7}"),
        "times" => Some("\u{00D7}"),
        "mdash" => Some("\u{2014}"),
        "ndash" => Some("\u{2013}"),
        "lsquo" => Some("\u{2018}"),
        "rsquo" => Some("\u{2019}"),
        "ldquo" => Some("\u{201C}"),
        "rdquo" => Some("\u{201D}"),
        "hellip" => Some("\u{2026}"),
        _ => None,
    }
}

/// Decode the part after `&#` and before `;`
fn decode_char_ref(digits: &str) -> Option<char> {
    let codepoint = if let Some(hex) = digits.strip_prefix('x').or_else(|| digits.strip_prefix('X')) {
        if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        u32::from_str_radix(hex, 16).ok()?
    } else {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse::<u32>().ok()?
    };

    if !is_valid_xml_char(codepoint) {
        return None;
    }
    char::from_u32(codepoint)
}

fn is_valid_entity_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    match bytes.first() {
        Some(&b) if super::scanner::is_name_start_char(b) => {}
        _ => return false,
    }
    bytes.iter().all(|&b| super::scanner::is_name_char(b))
}

/// Char ::= #x9 | #xA | #xD | [#x20-#xD7FF] | [#xE000-#xFFFD] | [#x10000-#x10FFFF]
#[inline]
pub fn is_valid_xml_char(codepoint: u32) -> bool {
    matches!(codepoint,
        0x9 | 0xA | 0xD |
        0x20..=0xD7FF |
        0xE000..=0xFFFD |
        0x10000..=0x10FFFF
    )
}

/// Collect `<!ENTITY ...>` declarations from a DOCTYPE internal subset
///
/// Parameter entities (`<!ENTITY % ...>`) are ignored. Declarations inside
/// comments are ignored.
pub fn collect_entity_decls(subset: &[u8], table: &mut EntityTable) {
    let mut pos = 0;
    while pos < subset.len() {
        let rest = &subset[pos..];
        if rest.starts_with(b"<!--") {
            pos += memchr::memmem::find(&rest[4..], b"-->").map(|i| i + 7).unwrap_or(rest.len());
            continue;
        }
        if rest.starts_with(b"<!ENTITY") {
            let end = find_decl_end(rest).unwrap_or(rest.len());
            parse_entity_decl(&rest[8..end], table);
            pos += end + 1;
            continue;
        }
        pos += 1;
    }
}

/// Position of the '>' closing a declaration, skipping quoted literals
fn find_decl_end(decl: &[u8]) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (i, &b) in decl.iter().enumerate() {
        match (quote, b) {
            (None, b'"' | b'\'') => quote = Some(b),
            (Some(q), _) if q == b => quote = None,
            (None, b'>') => return Some(i),
            _ => {}
        }
    }
    None
}

fn parse_entity_decl(body: &[u8], table: &mut EntityTable) {
    let body = trim_start(body);
    if body.first() == Some(&b'%') {
        return;
    }
    let name_len = body.iter().take_while(|&&b| super::scanner::is_name_char(b)).count();
    if name_len == 0 {
        return;
    }
    let Ok(name) = std::str::from_utf8(&body[..name_len]) else {
        return;
    };
    let rest = trim_start(&body[name_len..]);

    match rest.first() {
        Some(&q @ (b'"' | b'\'')) => {
            if let Some(len) = memchr(q, &rest[1..]) {
                if let Ok(value) = std::str::from_utf8(&rest[1..1 + len]) {
                    table.declare_internal(name, value);
                }
            }
        }
        _ if rest.starts_with(b"SYSTEM") || rest.starts_with(b"PUBLIC") => {
            table.declare_external(name);
        }
        _ => {}
    }
}

fn trim_start(bytes: &[u8]) -> &[u8] {
    let skip = bytes.iter().take_while(|&&b| super::scanner::is_whitespace(b)).count();
    &bytes[skip..]
}
