//! Core XML parsing primitives
//!
//! The building blocks under the attribute tree:
//! - Scanner: SIMD-accelerated delimiter detection using memchr
//! - Tokenizer: State machine for XML token extraction
//! - Entities: entity decoding and internal-subset entity declarations
//! - Attributes: attribute splitting and validation
//! - Encoding: UTF-16 detection and conversion to UTF-8

pub mod attributes;
pub mod encoding;
pub mod entities;
pub mod scanner;
pub mod tokenizer;
