//! Patent records
//!
//! `PatentRecord` wraps the attribute tree of one USPTO grant or application
//! document. Fields are derived from the tree on every access; `snapshot`
//! materialises them all at once into a serialisable `PatentData`.

pub mod fields;
pub mod records;

pub use records::{Assignee, Citation, Claim, Inventor, LegalRepresentative, RelatedDocument, UsClass};

use crate::error::PatentError;
use crate::tree::{self, AttributeNode};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::str::FromStr;

/// Which kind of patent document was parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// `us-patent-grant`
    Grant,
    /// `us-patent-application`
    Application,
}

impl DocumentKind {
    pub fn from_root_tag(tag: &str) -> Option<Self> {
        match tag {
            "us-patent-grant" => Some(DocumentKind::Grant),
            "us-patent-application" => Some(DocumentKind::Application),
            _ => None,
        }
    }

    /// Tag of the bibliographic block under the document element
    pub fn bibliographic_tag(self) -> &'static str {
        match self {
            DocumentKind::Grant => "us-bibliographic-data-grant",
            DocumentKind::Application => "us-bibliographic-data-application",
        }
    }
}

/// One parsed patent document
#[derive(Debug, Clone)]
pub struct PatentRecord {
    root: AttributeNode,
    doc_kind: DocumentKind,
}

impl PatentRecord {
    /// Wrap a parsed tree whose document element is a patent grant or application
    pub fn from_root(root: AttributeNode) -> Result<Self, PatentError> {
        let tag = root.children().first().map(AttributeNode::tag).unwrap_or_default();
        let doc_kind = DocumentKind::from_root_tag(tag)
            .ok_or_else(|| PatentError::NotAPatent { root: tag.to_string() })?;
        Ok(PatentRecord { root, doc_kind })
    }

    pub fn from_bytes(input: &[u8]) -> Result<Self, PatentError> {
        Self::from_root(tree::parse(input)?)
    }

    /// Read the whole stream and parse it
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, PatentError> {
        Self::from_root(tree::parse_reader(reader)?)
    }

    /// Synthetic document node
    pub fn root(&self) -> &AttributeNode {
        &self.root
    }

    pub fn document_kind(&self) -> DocumentKind {
        self.doc_kind
    }

    /// The `us-patent-grant` / `us-patent-application` element
    pub fn document(&self) -> &AttributeNode {
        // from_root guarantees the document element exists
        &self.root.children()[0]
    }

    /// Compute every field
    pub fn snapshot(&self) -> PatentData {
        PatentData {
            document_kind: self.doc_kind,
            country: self.country(),
            patent: self.patent(),
            kind: self.kind(),
            date_grant: self.date_grant(),
            pat_type: self.pat_type(),
            date_app: self.date_app(),
            country_app: self.country_app(),
            patent_app: self.patent_app(),
            code_app: self.code_app(),
            clm_num: self.clm_num(),
            classes: self.classes(),
            abstract_text: self.abstract_text(),
            invention_title: self.invention_title(),
            asg_list: self.asg_list(),
            cit_list: self.cit_list(),
            rel_list: self.rel_list(),
            inv_list: self.inv_list(),
            law_list: self.law_list(),
            claims: self.claims(),
        }
    }
}

impl FromStr for PatentRecord {
    type Err = PatentError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::from_root(tree::parse_str(text)?)
    }
}

/// Every field of a patent record as plain data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatentData {
    pub document_kind: DocumentKind,
    pub country: String,
    pub patent: String,
    pub kind: String,
    pub date_grant: String,
    pub pat_type: String,
    pub date_app: String,
    pub country_app: String,
    pub patent_app: String,
    pub code_app: String,
    pub clm_num: Option<u32>,
    pub classes: Vec<UsClass>,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub invention_title: String,
    pub asg_list: Vec<Assignee>,
    pub cit_list: Vec<Citation>,
    pub rel_list: Vec<RelatedDocument>,
    pub inv_list: Vec<Inventor>,
    pub law_list: Vec<LegalRepresentative>,
    pub claims: Vec<Claim>,
}
