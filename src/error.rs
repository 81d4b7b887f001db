//! Error types
//!
//! - `ParseError`: the document is not well-formed XML (fatal for that document)
//! - `FieldNotFound`: a tag lookup matched nothing (callers treat it as empty)
//! - `PatentError`: everything that can stop a `PatentRecord` from being built

use thiserror::Error;

/// Well-formedness failure, located in the input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at line {line}, column {column} (byte {position})")]
pub struct ParseError {
    pub message: String,
    /// Byte offset into the (UTF-8) input
    pub position: usize,
    /// 1-based line
    pub line: usize,
    /// 1-based column, counted in characters
    pub column: usize,
}

impl ParseError {
    /// Create an error at `position`, computing line and column from `input`
    pub fn at(message: impl Into<String>, input: &[u8], position: usize) -> Self {
        let (line, column) = line_col(input, position);
        ParseError {
            message: message.into(),
            position,
            line,
            column,
        }
    }
}

/// 1-based line and column of a byte offset
pub fn line_col(input: &[u8], position: usize) -> (usize, usize) {
    let position = position.min(input.len());
    let before = &input[..position];
    let line = memchr::memchr_iter(b'\n', before).count() + 1;
    let line_start = memchr::memrchr(b'\n', before).map(|i| i + 1).unwrap_or(0);
    // Count characters, not bytes: skip UTF-8 continuation bytes
    let column = before[line_start..]
        .iter()
        .filter(|&&b| b & 0xC0 != 0x80)
        .count()
        + 1;
    (line, column)
}

/// A tag lookup found no matching element
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no element named <{tag}>")]
pub struct FieldNotFound {
    pub tag: String,
}

impl FieldNotFound {
    pub fn new(tag: impl Into<String>) -> Self {
        FieldNotFound { tag: tag.into() }
    }
}

/// Errors building a patent record
#[derive(Debug, Error)]
pub enum PatentError {
    /// Malformed XML
    #[error("XML parse error: {0}")]
    Parse(#[from] ParseError),

    /// Reading the input stream failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Well-formed XML whose document element is not a patent grant or application
    #[error("not a patent document: root element is <{root}>")]
    NotAPatent { root: String },
}
