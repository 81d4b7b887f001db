//! Small records built from aligned rows
//!
//! Each list field is extracted as one column per value path, aligned into
//! rows, and every row becomes one of these records. Columns appear in a row
//! in field declaration order.

use serde::{Deserialize, Serialize};

/// Pops row values front to back; missing trailing values read as empty
struct RowReader(std::vec::IntoIter<String>);

impl RowReader {
    fn new(row: Vec<String>) -> Self {
        RowReader(row.into_iter())
    }

    fn next(&mut self) -> String {
        self.0.next().unwrap_or_default()
    }
}

/// A US classification split into class and subclass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsClass {
    pub class: String,
    pub subclass: String,
}

impl UsClass {
    /// Split a raw classification: first three characters are the class,
    /// the rest the subclass, spaces removed from both
    pub fn parse(raw: &str) -> Self {
        let split = raw.char_indices().nth(3).map_or(raw.len(), |(i, _)| i);
        let (class, subclass) = raw.split_at(split);
        UsClass {
            class: class.replace(' ', ""),
            subclass: subclass.trim().replace(' ', ""),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    pub org_name: String,
    pub last_name: String,
    pub first_name: String,
    /// USPTO assignee type code, e.g. "02" for a US company
    pub role: String,
    pub city: String,
    pub state: String,
    pub country: String,
}

impl Assignee {
    pub(crate) const COLUMNS: &'static [&'static str] = &[
        "addressbook.orgname|orgname",
        "addressbook.last-name|last-name",
        "addressbook.first-name|first-name",
        "addressbook.role|role",
        "addressbook.address.city|address.city",
        "addressbook.address.state|address.state",
        "addressbook.address.country|address.country",
    ];

    pub(crate) fn from_row(row: Vec<String>) -> Self {
        let mut r = RowReader::new(row);
        Assignee {
            org_name: r.next(),
            last_name: r.next(),
            first_name: r.next(),
            role: r.next(),
            city: r.next(),
            state: r.next(),
            country: r.next(),
        }
    }
}

/// A cited patent or non-patent document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    /// "cited by examiner" / "cited by applicant"
    pub category: String,
    pub country: String,
    pub doc_number: String,
    pub date: String,
    pub kind: String,
    pub name: String,
    /// Free text of a non-patent citation
    pub other: String,
}

impl Citation {
    pub(crate) const COLUMNS: &'static [&'static str] = &[
        "category",
        "patcit.document-id.country",
        "patcit.document-id.doc-number",
        "patcit.document-id.date",
        "patcit.document-id.kind",
        "patcit.document-id.name",
        "nplcit.othercit",
    ];

    pub(crate) fn from_row(row: Vec<String>) -> Self {
        let mut r = RowReader::new(row);
        Citation {
            category: r.next(),
            country: r.next(),
            doc_number: r.next(),
            date: super::fields::normalize_date(&r.next()),
            kind: r.next(),
            name: r.next(),
            other: r.next(),
        }
    }

    pub fn is_patent(&self) -> bool {
        !self.doc_number.is_empty()
    }
}

/// A parent application, provisional or related publication
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedDocument {
    /// Relation tag, e.g. "continuation" or "us-provisional-application"
    pub relation: String,
    pub country: String,
    pub doc_number: String,
    pub date: String,
    pub kind: String,
    /// Parent status, empty when not stated
    pub status: String,
}

impl RelatedDocument {
    /// Paths under a `relation` element, or under the related entry itself
    pub(crate) const COLUMNS: &'static [&'static str] = &[
        "parent-doc.document-id.country|document-id.country",
        "parent-doc.document-id.doc-number|document-id.doc-number",
        "parent-doc.document-id.date|document-id.date",
        "parent-doc.document-id.kind|document-id.kind",
        "parent-doc.parent-status|parent-status",
    ];

    pub(crate) fn from_row(row: Vec<String>) -> Self {
        let mut r = RowReader::new(row);
        RelatedDocument {
            relation: r.next(),
            country: r.next(),
            doc_number: r.next(),
            date: super::fields::normalize_date(&r.next()),
            kind: r.next(),
            status: r.next(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventor {
    pub last_name: String,
    pub first_name: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postcode: String,
    pub nationality: String,
    pub residence: String,
}

impl Inventor {
    pub(crate) const COLUMNS: &'static [&'static str] = &[
        "addressbook.last-name",
        "addressbook.first-name",
        "addressbook.address.street",
        "addressbook.address.city",
        "addressbook.address.state",
        "addressbook.address.country",
        "addressbook.address.postcode",
        "nationality.country",
        "residence.country",
    ];

    pub(crate) fn from_row(row: Vec<String>) -> Self {
        let mut r = RowReader::new(row);
        Inventor {
            last_name: r.next(),
            first_name: r.next(),
            street: r.next(),
            city: r.next(),
            state: r.next(),
            country: r.next(),
            postcode: r.next(),
            nationality: r.next(),
            residence: r.next(),
        }
    }
}

/// An attorney, agent or firm of record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalRepresentative {
    /// `rep-type` attribute, e.g. "attorney"
    pub rep_type: String,
    pub org_name: String,
    pub last_name: String,
    pub first_name: String,
    pub country: String,
}

impl LegalRepresentative {
    pub(crate) const COLUMNS: &'static [&'static str] = &[
        "addressbook.orgname",
        "addressbook.last-name",
        "addressbook.first-name",
        "addressbook.address.country",
    ];

    pub(crate) fn from_row(row: Vec<String>) -> Self {
        let mut r = RowReader::new(row);
        LegalRepresentative {
            rep_type: r.next(),
            org_name: r.next(),
            last_name: r.next(),
            first_name: r.next(),
            country: r.next(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// `num` attribute as written, e.g. "00001"
    pub number: String,
    /// Claim text with whitespace runs collapsed
    pub text: String,
    /// `idref` of the first claim referenced, e.g. "CLM-00001"
    pub depends_on: String,
}

impl Claim {
    pub(crate) fn from_row(row: Vec<String>) -> Self {
        let mut r = RowReader::new(row);
        Claim {
            number: r.next(),
            text: r.next(),
            depends_on: r.next(),
        }
    }

    pub fn is_independent(&self) -> bool {
        self.depends_on.is_empty()
    }
}
