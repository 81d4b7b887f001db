//! Attribute Tree
//!
//! Parses a whole document into an `AttributeNode` tree:
//! - Node: one element with its content, attributes and children
//! - Selection: `Single` / `Group` results of tag lookups
//! - Builder: stack-based construction from start/text/end events

pub mod builder;
pub mod node;
pub mod selection;

pub use builder::{BuildError, TreeBuilder};
pub use node::AttributeNode;
pub use selection::Selection;

use crate::core::encoding::decode_document;
use crate::error::{ParseError, PatentError};
use crate::options::ParseOptions;
use crate::reader::{SliceReader, StartElement, XmlEvent};
use std::io::Read;
use tracing::debug;

/// Parse document bytes with default options
pub fn parse(input: &[u8]) -> Result<AttributeNode, ParseError> {
    parse_with_options(input, &ParseOptions::default())
}

/// Parse UTF-8 text with default options
pub fn parse_str(text: &str) -> Result<AttributeNode, ParseError> {
    build(text, &ParseOptions::default())
}

/// Read a whole stream, then parse it
pub fn parse_reader<R: Read>(mut reader: R) -> Result<AttributeNode, PatentError> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    Ok(parse(&buf)?)
}

/// Parse document bytes (UTF-8 or UTF-16)
pub fn parse_with_options(input: &[u8], options: &ParseOptions) -> Result<AttributeNode, ParseError> {
    let text = decode_document(input)?;
    build(&text, options)
}

fn attribute_pairs(elem: StartElement<'_>) -> Vec<(String, String)> {
    elem.attributes
        .into_iter()
        .map(|a| (a.name.to_string(), a.value.into_owned()))
        .collect()
}

/// Drive the reader into a builder, locating structural errors at the
/// event that caused them
fn build(text: &str, options: &ParseOptions) -> Result<AttributeNode, ParseError> {
    let mut reader = SliceReader::with_options(text, options.clone());
    let mut builder = TreeBuilder::with_max_depth(options.max_depth);

    loop {
        let event = reader.next_event()?;
        let at = reader.event_start();

        let step = match event {
            XmlEvent::StartElement(elem) => {
                let tag = elem.name;
                builder.start_element(tag, attribute_pairs(elem))
            }
            XmlEvent::EmptyElement(elem) => {
                let tag = elem.name;
                builder
                    .start_element(tag, attribute_pairs(elem))
                    .and_then(|_| builder.end_element(tag))
            }
            XmlEvent::EndElement(end) => builder.end_element(end.name),
            XmlEvent::Text(content) => builder.text(&content),
            XmlEvent::CData(content) => {
                if builder.depth() == 0 {
                    return Err(reader.error_at("CDATA section not allowed at document level", at));
                }
                builder.text(content)
            }
            XmlEvent::DocType { .. } => {
                if builder.seen_root() {
                    return Err(reader.error_at("DOCTYPE must come before the root element", at));
                }
                Ok(())
            }
            XmlEvent::Comment(_)
            | XmlEvent::ProcessingInstruction { .. }
            | XmlEvent::XmlDeclaration { .. } => Ok(()),
            XmlEvent::EndDocument => break,
        };

        step.map_err(|e| reader.error_at(e.to_string(), at))?;
    }

    let root = builder
        .finish()
        .map_err(|e| reader.error_at(e.to_string(), text.len()))?;

    debug!(
        root = root.children().first().map(AttributeNode::tag).unwrap_or_default(),
        nodes = root.node_count(),
        bytes = text.len(),
        "parsed attribute tree"
    );
    Ok(root)
}
