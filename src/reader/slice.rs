//! Slice Reader
//!
//! Turns tokens into decoded events over an in-memory document. Text and
//! attribute values borrow from the input unless they contain references.

use super::events::{Attribute, EndElement, StartElement, XmlEvent};
use crate::core::attributes::parse_attributes;
use crate::core::entities::{collect_entity_decls, decode_text, EntityTable, ExpansionBudget};
use crate::core::tokenizer::{Token, TokenKind, Tokenizer};
use crate::error::ParseError;
use crate::options::ParseOptions;
use std::borrow::Cow;

/// Pull reader over UTF-8 document text
pub struct SliceReader<'a> {
    text: &'a str,
    tokenizer: Tokenizer<'a>,
    options: ParseOptions,
    entities: EntityTable,
    budget: ExpansionBudget,
    /// Start offset of the most recent event
    event_start: usize,
    seen_markup: bool,
    done: bool,
}

impl<'a> SliceReader<'a> {
    pub fn new(text: &'a str) -> Self {
        Self::with_options(text, ParseOptions::default())
    }

    pub fn with_options(text: &'a str, options: ParseOptions) -> Self {
        SliceReader {
            text,
            tokenizer: Tokenizer::new(text),
            options,
            entities: EntityTable::new(),
            budget: ExpansionBudget::for_input(text.len()),
            event_start: 0,
            seen_markup: false,
            done: false,
        }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Entities declared so far by the DOCTYPE internal subset
    pub fn entities(&self) -> &EntityTable {
        &self.entities
    }

    /// Byte offset where the most recent event started
    pub fn event_start(&self) -> usize {
        self.event_start
    }

    /// Build an error located in this reader's input
    pub fn error_at(&self, message: impl Into<String>, position: usize) -> ParseError {
        ParseError::at(message, self.text.as_bytes(), position)
    }

    /// Get the next XML event
    pub fn next_event(&mut self) -> Result<XmlEvent<'a>, ParseError> {
        let token = self.tokenizer.next_token()?;
        self.event_start = token.span.0;

        let event = match token.kind {
            TokenKind::Eof => XmlEvent::EndDocument,

            TokenKind::StartTag => XmlEvent::StartElement(self.start_element(&token)?),
            TokenKind::EmptyTag => XmlEvent::EmptyElement(self.start_element(&token)?),
            TokenKind::EndTag => XmlEvent::EndElement(EndElement::new(token.name.unwrap_or_default())),

            TokenKind::Text => {
                let raw = token.content.unwrap_or_default();
                XmlEvent::Text(self.decode(raw, token.content_offset)?)
            }
            TokenKind::CData => XmlEvent::CData(token.content.unwrap_or_default()),
            TokenKind::Comment => XmlEvent::Comment(token.content.unwrap_or_default()),

            TokenKind::ProcessingInstruction => XmlEvent::ProcessingInstruction {
                target: token.name.unwrap_or_default(),
                data: token.content.unwrap_or_default().trim_start(),
            },

            TokenKind::XmlDeclaration => {
                if self.seen_markup {
                    return Err(self.error_at(
                        "XML declaration allowed only at the start of the document",
                        token.span.0,
                    ));
                }
                self.xml_declaration(&token)?
            }

            TokenKind::DocType => {
                if let Some(subset) = token.content {
                    collect_entity_decls(subset.as_bytes(), &mut self.entities);
                }
                XmlEvent::DocType { name: token.name.unwrap_or_default() }
            }
        };

        self.seen_markup = true;
        Ok(event)
    }

    fn decode(&mut self, raw: &'a str, offset: usize) -> Result<Cow<'a, str>, ParseError> {
        decode_text(raw, &self.entities, &self.options, &mut self.budget)
            .map_err(|e| self.error_at(e.message, offset + e.offset))
    }

    fn attributes(&mut self, token: &Token<'a>) -> Result<Vec<Attribute<'a>>, ParseError> {
        let raw = token.content.unwrap_or_default();
        let base = token.content_offset;

        let raw_attrs = parse_attributes(raw).map_err(|e| self.error_at(e.message, base + e.offset))?;
        let mut attributes = Vec::with_capacity(raw_attrs.len());
        for attr in raw_attrs {
            let value = self.decode(attr.value, base + attr.value_offset)?;
            attributes.push(Attribute { name: attr.name, value });
        }
        Ok(attributes)
    }

    fn start_element(&mut self, token: &Token<'a>) -> Result<StartElement<'a>, ParseError> {
        let attributes = self.attributes(token)?;
        Ok(StartElement::new(token.name.unwrap_or_default(), attributes))
    }

    fn xml_declaration(&mut self, token: &Token<'a>) -> Result<XmlEvent<'a>, ParseError> {
        let attrs = self.attributes(token)?;
        let find = |name: &str| attrs.iter().find(|a| a.name == name).map(|a| a.value.clone());

        let version = find("version")
            .ok_or_else(|| self.error_at("XML declaration requires a version", token.span.0))?;
        let encoding = find("encoding");
        let standalone = find("standalone").map(|v| v == "yes");

        Ok(XmlEvent::XmlDeclaration { version, encoding, standalone })
    }
}

impl<'a> Iterator for SliceReader<'a> {
    type Item = Result<XmlEvent<'a>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_event() {
            Ok(XmlEvent::EndDocument) => {
                self.done = true;
                None
            }
            Ok(event) => Some(Ok(event)),
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Read every event of a document
pub fn parse_events(text: &str) -> Result<Vec<XmlEvent<'_>>, ParseError> {
    SliceReader::new(text).collect()
}
