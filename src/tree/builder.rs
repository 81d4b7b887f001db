//! Tree Builder
//!
//! Turns start/text/end callbacks into an `AttributeNode` tree. Holds a stack
//! of open elements under the synthetic document node; an element is attached
//! to its parent when it closes.

use super::node::AttributeNode;
use crate::options::DEFAULT_MAX_DEPTH;
use thiserror::Error;

/// Structural problem found while building
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("Tag mismatch: <{expected}> closed with </{found}>")]
    Mismatch { expected: String, found: String },

    #[error("Unexpected end tag: </{tag}> without matching start tag")]
    UnexpectedEnd { tag: String },

    #[error("Unclosed element <{tag}> at end of document")]
    Unclosed { tag: String },

    #[error("Document has no root element")]
    NoRoot,

    #[error("Document has multiple root elements")]
    MultipleRoots,

    #[error("Text content not allowed at document level")]
    TextOutsideRoot,

    #[error("Element nesting exceeds maximum depth of {limit}")]
    TooDeep { limit: usize },
}

#[derive(Debug)]
pub struct TreeBuilder {
    /// stack[0] is the document node
    stack: Vec<AttributeNode>,
    max_depth: usize,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        TreeBuilder {
            stack: vec![AttributeNode::root()],
            max_depth,
        }
    }

    /// Number of open elements
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    /// Whether the document element has been opened already
    pub fn seen_root(&self) -> bool {
        self.stack.len() > 1 || !self.stack[0].children().is_empty()
    }

    fn top(&mut self) -> &mut AttributeNode {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    /// Open an element under the current one
    pub fn start_element(
        &mut self,
        tag: &str,
        attributes: Vec<(String, String)>,
    ) -> Result<(), BuildError> {
        if self.depth() == 0 && self.seen_root() {
            return Err(BuildError::MultipleRoots);
        }
        if self.depth() >= self.max_depth {
            return Err(BuildError::TooDeep { limit: self.max_depth });
        }

        let anchor = self.top().content_len();
        let mut node = AttributeNode::new(tag, attributes);
        node.set_anchor(anchor);
        self.stack.push(node);
        Ok(())
    }

    /// Append character data to the current element
    ///
    /// Whitespace outside the document element is dropped.
    pub fn text(&mut self, text: &str) -> Result<(), BuildError> {
        if self.depth() == 0 {
            if text.bytes().all(|b| matches!(b, b' ' | b'\t' | b'\n' | b'\r')) {
                return Ok(());
            }
            return Err(BuildError::TextOutsideRoot);
        }
        self.top().push_text(text);
        Ok(())
    }

    /// Close the current element, which must be named `tag`
    pub fn end_element(&mut self, tag: &str) -> Result<(), BuildError> {
        if self.depth() == 0 {
            return Err(BuildError::UnexpectedEnd { tag: tag.to_string() });
        }
        if self.top().tag() != tag {
            return Err(BuildError::Mismatch {
                expected: self.top().tag().to_string(),
                found: tag.to_string(),
            });
        }

        if let Some(node) = self.stack.pop() {
            self.top().push_child(node);
        }
        Ok(())
    }

    /// Finish the tree, returning the document node
    pub fn finish(mut self) -> Result<AttributeNode, BuildError> {
        if self.depth() > 0 {
            return Err(BuildError::Unclosed {
                tag: self.top().tag().to_string(),
            });
        }
        let root = self.stack.pop().unwrap_or_default();
        if root.children().is_empty() {
            return Err(BuildError::NoRoot);
        }
        Ok(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(calls: impl FnOnce(&mut TreeBuilder) -> Result<(), BuildError>) -> Result<AttributeNode, BuildError> {
        let mut builder = TreeBuilder::new();
        calls(&mut builder)?;
        builder.finish()
    }

    #[test]
    fn test_build_nested() {
        let root = build(|b| {
            b.start_element("a", vec![("id".into(), "1".into())])?;
            b.text("x")?;
            b.start_element("b", vec![])?;
            b.text("y")?;
            b.end_element("b")?;
            b.text("z")?;
            b.end_element("a")
        })
        .unwrap();

        let a = &root.children()[0];
        assert_eq!(a.tag(), "a");
        assert_eq!(a.get_attribute("id"), Some("1"));
        assert_eq!(a.get_content(), "xz");
        assert_eq!(a.inner_text(), "xyz");
        assert_eq!(a.children()[0].get_content(), "y");
    }

    #[test]
    fn test_mismatch() {
        let err = build(|b| {
            b.start_element("a", vec![])?;
            b.end_element("b")
        })
        .unwrap_err();
        assert_eq!(
            err,
            BuildError::Mismatch { expected: "a".into(), found: "b".into() }
        );
    }

    #[test]
    fn test_unclosed() {
        let err = build(|b| b.start_element("a", vec![])).unwrap_err();
        assert_eq!(err, BuildError::Unclosed { tag: "a".into() });
    }

    #[test]
    fn test_no_root() {
        assert_eq!(build(|b| b.text("\n  ")).unwrap_err(), BuildError::NoRoot);
    }

    #[test]
    fn test_multiple_roots() {
        let err = build(|b| {
            b.start_element("a", vec![])?;
            b.end_element("a")?;
            b.start_element("b", vec![])
        })
        .unwrap_err();
        assert_eq!(err, BuildError::MultipleRoots);
    }

    #[test]
    fn test_text_outside_root() {
        let err = build(|b| b.text("stray")).unwrap_err();
        assert_eq!(err, BuildError::TextOutsideRoot);
    }

    #[test]
    fn test_unexpected_end() {
        let err = build(|b| b.end_element("a")).unwrap_err();
        assert_eq!(err, BuildError::UnexpectedEnd { tag: "a".into() });
    }

    #[test]
    fn test_max_depth() {
        let mut builder = TreeBuilder::with_max_depth(2);
        builder.start_element("a", vec![]).unwrap();
        builder.start_element("b", vec![]).unwrap();
        assert_eq!(
            builder.start_element("c", vec![]),
            Err(BuildError::TooDeep { limit: 2 })
        );
    }
}
