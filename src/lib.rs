//! patxml - USPTO patent XML into structured records
//!
//! Layers:
//! A: XML reader (core scanner/tokenizer + slice reader, parse_events)
//! B: Attribute tree (tree::parse, dotted-path lookups with Single/Group results)
//! C: Patent records (PatentRecord field rules, PatentData snapshots)
//! D: Helpers (list alignment, HTML escaping with preserved `<sub>` regions)
//! E: Batch parsing across documents (rayon, `parallel` feature)
//!
//! ```
//! use patxml::PatentRecord;
//!
//! let xml = r#"<us-patent-grant><us-bibliographic-data-grant>
//!   <publication-reference><document-id>
//!     <country>US</country><doc-number>08141299</doc-number><kind>B2</kind>
//!     <date>20120327</date>
//!   </document-id></publication-reference>
//! </us-bibliographic-data-grant></us-patent-grant>"#;
//!
//! let record: PatentRecord = xml.parse().unwrap();
//! assert_eq!(record.patent(), "08141299");
//! assert_eq!(record.date_grant(), "20120327");
//! ```

pub mod align;
pub mod batch;
pub mod core;
pub mod error;
pub mod escape;
pub mod options;
pub mod patent;
pub mod reader;
pub mod tree;

pub use batch::parse_many;
pub use error::{FieldNotFound, ParseError, PatentError};
pub use options::{EntityPolicy, ParseOptions};
pub use patent::{DocumentKind, PatentData, PatentRecord};
pub use tree::{AttributeNode, Selection, TreeBuilder};
