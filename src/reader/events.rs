//! XML Event Types
//!
//! Event types for pull-parser style XML processing. Text and attribute
//! values are already entity-decoded.

use std::borrow::Cow;

/// XML parsing event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlEvent<'a> {
    /// <name attrs...>
    StartElement(StartElement<'a>),
    /// </name>
    EndElement(EndElement<'a>),
    /// <name attrs.../>
    EmptyElement(StartElement<'a>),
    /// Character data between tags
    Text(Cow<'a, str>),
    /// CDATA section content, verbatim
    CData(&'a str),
    Comment(&'a str),
    /// <?target data?>
    ProcessingInstruction { target: &'a str, data: &'a str },
    /// <?xml version="1.0"?>
    XmlDeclaration {
        version: Cow<'a, str>,
        encoding: Option<Cow<'a, str>>,
        standalone: Option<bool>,
    },
    /// DOCTYPE root name
    DocType { name: &'a str },
    EndDocument,
}

/// A decoded attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute<'a> {
    pub name: &'a str,
    pub value: Cow<'a, str>,
}

/// Start element event data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartElement<'a> {
    /// Full element name (may include prefix)
    pub name: &'a str,
    pub attributes: Vec<Attribute<'a>>,
}

impl<'a> StartElement<'a> {
    pub fn new(name: &'a str, attributes: Vec<Attribute<'a>>) -> Self {
        StartElement { name, attributes }
    }
}

/// End element event data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndElement<'a> {
    pub name: &'a str,
}

impl<'a> EndElement<'a> {
    pub fn new(name: &'a str) -> Self {
        EndElement { name }
    }
}
