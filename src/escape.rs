//! HTML escaping with preserved inline regions
//!
//! Patent abstracts keep chemical formulas as `<sub>` markup. The markup has
//! to reach an HTML renderer intact while the surrounding text is escaped.

use memchr::memmem;
use std::borrow::Cow;

/// Escape `&`, `<` and `>` (quotes are left alone)
pub fn escape_html(text: &str) -> Cow<'_, str> {
    html_escape::encode_text(text)
}

/// Escape everything outside `<sub>...</sub>` regions
pub fn escape_html_nosub(text: &str) -> String {
    escape_html_excluding(text, "sub")
}

/// Escape everything outside `<tag>...</tag>` regions
///
/// Regions, markers included, are copied byte for byte. Nested regions of
/// the same tag stay inside the outermost one. An opening marker with no
/// matching close is escaped like ordinary text; regions after it are still
/// preserved.
pub fn escape_html_excluding(text: &str, tag: &str) -> String {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);
    let bytes = text.as_bytes();

    let mut out = String::with_capacity(text.len() + 16);
    let mut pos = 0;
    while let Some(start) = memmem::find(&bytes[pos..], open.as_bytes()).map(|i| pos + i) {
        match region_end(bytes, start, open.as_bytes(), close.as_bytes()) {
            Some(end) => {
                out.push_str(&escape_html(&text[pos..start]));
                out.push_str(&text[start..end]);
                pos = end;
            }
            None => {
                let after_open = start + open.len();
                out.push_str(&escape_html(&text[pos..after_open]));
                pos = after_open;
            }
        }
    }
    out.push_str(&escape_html(&text[pos..]));
    out
}

/// End offset (after the closing marker) of the region opened at `start`
fn region_end(bytes: &[u8], start: usize, open: &[u8], close: &[u8]) -> Option<usize> {
    let mut depth = 1usize;
    let mut pos = start + open.len();
    loop {
        let next_close = memmem::find(&bytes[pos..], close)? + pos;
        match memmem::find(&bytes[pos..next_close], open) {
            Some(i) => {
                depth += 1;
                pos += i + open.len();
            }
            None => {
                depth -= 1;
                pos = next_close + close.len();
                if depth == 0 {
                    return Some(pos);
                }
            }
        }
    }
}
