//! Parse options
//!
//! The defaults match what a patent pipeline wants: internal entities are
//! expanded, anything external is skipped without being fetched.

use serde::{Deserialize, Serialize};

/// Default limit on element nesting
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// What to do with a reference to an entity that is undeclared or external
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityPolicy {
    /// Drop the reference from the text
    #[default]
    Skip,
    /// Keep the literal `&name;` in the text
    Keep,
    /// Fail the parse
    Reject,
}

/// Options for building an attribute tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Handling of undeclared and external entity references
    pub entity_policy: EntityPolicy,
    /// Expand general entities declared with a literal value in the internal subset
    pub expand_internal_entities: bool,
    /// Maximum element nesting depth
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            entity_policy: EntityPolicy::Skip,
            expand_internal_entities: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entity_policy(mut self, policy: EntityPolicy) -> Self {
        self.entity_policy = policy;
        self
    }

    pub fn expand_internal_entities(mut self, expand: bool) -> Self {
        self.expand_internal_entities = expand;
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}
