//! Batch parsing
//!
//! Parses independent documents with Rayon when the `parallel` feature is
//! on, sequentially otherwise. Results come back in input order and one
//! document's failure never affects the others.

use crate::error::PatentError;
use crate::patent::{PatentData, PatentRecord};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::warn;

fn parse_one(index: usize, input: &[u8]) -> Result<PatentData, PatentError> {
    PatentRecord::from_bytes(input)
        .map(|record| record.snapshot())
        .inspect_err(|e| warn!(index, error = %e, "failed to parse patent document"))
}

/// Parse many documents, one result per input
#[cfg(feature = "parallel")]
pub fn parse_many<D: AsRef<[u8]> + Sync>(documents: &[D]) -> Vec<Result<PatentData, PatentError>> {
    documents
        .par_iter()
        .enumerate()
        .map(|(i, doc)| parse_one(i, doc.as_ref()))
        .collect()
}

/// Parse many documents, one result per input
#[cfg(not(feature = "parallel"))]
pub fn parse_many<D: AsRef<[u8]>>(documents: &[D]) -> Vec<Result<PatentData, PatentError>> {
    documents
        .iter()
        .enumerate()
        .map(|(i, doc)| parse_one(i, doc.as_ref()))
        .collect()
}
