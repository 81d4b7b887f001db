//! XML Reader Module
//!
//! - Events: decoded XML event types for pull parsing
//! - SliceReader: pull reader over an in-memory document

pub mod events;
pub mod slice;

pub use events::{Attribute, EndElement, StartElement, XmlEvent};
pub use slice::{parse_events, SliceReader};
