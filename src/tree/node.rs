//! Attribute tree node
//!
//! One XML element, owning its children in document order. Child tags act
//! as path segments: looking a tag up yields the single matching child, or
//! a group when the tag repeats.

use super::selection::Selection;
use crate::error::FieldNotFound;

/// A parsed XML element
///
/// The synthetic document node returned by the parser has an empty tag and
/// holds the document element as its only child.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeNode {
    tag: String,
    /// Character data directly inside this element, untrimmed
    content: String,
    /// Declaration order
    attributes: Vec<(String, String)>,
    children: Vec<AttributeNode>,
    /// Offset into the parent's content at which this element opened
    anchor: usize,
}

impl AttributeNode {
    /// Create an element node
    pub fn new(tag: impl Into<String>, attributes: Vec<(String, String)>) -> Self {
        AttributeNode {
            tag: tag.into(),
            attributes,
            ..Default::default()
        }
    }

    /// Create the synthetic document node
    pub fn root() -> Self {
        AttributeNode::default()
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn is_root(&self) -> bool {
        self.tag.is_empty()
    }

    /// Text directly inside this element (children's text excluded)
    pub fn get_content(&self) -> &str {
        &self.content
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn children(&self) -> &[AttributeNode] {
        &self.children
    }

    /// Number of nodes in this subtree, including this one
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(AttributeNode::node_count).sum::<usize>()
    }

    /// Look up the children named `tag`
    ///
    /// A tag containing `_` that matches nothing is retried with `-`, so
    /// `us_bibliographic_data_grant` reaches `us-bibliographic-data-grant`.
    pub fn resolve(&self, tag: &str) -> Result<Selection<'_>, FieldNotFound> {
        Selection::from_nodes(self.lookup(tag)).ok_or_else(|| FieldNotFound::new(tag))
    }

    /// Follow a dotted path of tags, broadcasting over groups at each step
    pub fn resolve_path(&self, path: &str) -> Result<Selection<'_>, FieldNotFound> {
        Selection::Single(self).resolve_path(path)
    }

    /// Content of every direct child named `tag`
    ///
    /// Agrees with `resolve`: where that reports `FieldNotFound`, this is an
    /// empty list.
    pub fn contents_of(&self, tag: &str) -> Vec<&str> {
        self.lookup(tag).into_iter().map(AttributeNode::get_content).collect()
    }

    /// All character data in this subtree, in document order
    pub fn inner_text(&self) -> String {
        let mut out = String::with_capacity(self.content.len());
        self.write_text(None, &mut out);
        out
    }

    /// Like `inner_text`, but elements named `keep_tag` are written back as
    /// literal `<keep_tag>...</keep_tag>` markup
    pub fn marked_text(&self, keep_tag: &str) -> String {
        let mut out = String::with_capacity(self.content.len());
        self.write_text(Some(keep_tag), &mut out);
        out
    }

    fn write_text(&self, keep_tag: Option<&str>, out: &mut String) {
        let mut last = 0;
        for child in &self.children {
            out.push_str(&self.content[last..child.anchor]);
            last = child.anchor;

            if keep_tag == Some(child.tag.as_str()) {
                out.push('<');
                out.push_str(&child.tag);
                out.push('>');
                child.write_text(keep_tag, out);
                out.push_str("</");
                out.push_str(&child.tag);
                out.push('>');
            } else {
                child.write_text(keep_tag, out);
            }
        }
        out.push_str(&self.content[last..]);
    }

    /// Children matching `tag`, with the `_` to `-` fallback
    pub(crate) fn lookup(&self, tag: &str) -> Vec<&AttributeNode> {
        let found = self.children_named(tag);
        if found.is_empty() && tag.contains('_') {
            return self.children_named(&tag.replace('_', "-"));
        }
        found
    }

    fn children_named(&self, tag: &str) -> Vec<&AttributeNode> {
        self.children.iter().filter(|c| c.tag == tag).collect()
    }

    // Builder hooks

    pub(crate) fn push_text(&mut self, text: &str) {
        self.content.push_str(text);
    }

    /// Offset a child opened now would be anchored at
    pub(crate) fn content_len(&self) -> usize {
        self.content.len()
    }

    pub(crate) fn set_anchor(&mut self, anchor: usize) {
        self.anchor = anchor;
    }

    pub(crate) fn push_child(&mut self, child: AttributeNode) {
        self.children.push(child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::parse_str;

    #[test]
    fn test_root_is_synthetic() {
        let root = parse_str("<a/>").unwrap();
        assert!(root.is_root());
        assert_eq!(root.tag(), "");
        assert_eq!(root.children().len(), 1);
        assert_eq!(root.children()[0].tag(), "a");
        assert!(!root.children()[0].is_root());
    }

    #[test]
    fn test_content_is_untrimmed() {
        let root = parse_str("<a>  two  words\n</a>").unwrap();
        let a = root.resolve("a").unwrap().first();
        assert_eq!(a.get_content(), "  two  words\n");
    }

    #[test]
    fn test_content_excludes_children() {
        let root = parse_str("<p>H<sub>2</sub>O</p>").unwrap();
        let p = root.resolve("p").unwrap().first();
        assert_eq!(p.get_content(), "HO");
        assert_eq!(p.inner_text(), "H2O");
        assert_eq!(p.marked_text("sub"), "H<sub>2</sub>O");
    }

    #[test]
    fn test_marked_text_only_keeps_named_tag() {
        let root = parse_str("<p><b>x</b> and <sub>i</sub><i>y</i></p>").unwrap();
        let p = root.resolve("p").unwrap().first();
        assert_eq!(p.marked_text("sub"), "x and <sub>i</sub>y");
    }

    #[test]
    fn test_attributes_in_order() {
        let root = parse_str("<a z=\"1\" b=\"2\"/>").unwrap();
        let a = root.resolve("a").unwrap().first();
        assert_eq!(
            a.attributes(),
            &[("z".to_string(), "1".to_string()), ("b".to_string(), "2".to_string())]
        );
        assert_eq!(a.get_attribute("b"), Some("2"));
        assert_eq!(a.get_attribute("c"), None);
    }

    #[test]
    fn test_resolve_missing() {
        let root = parse_str("<a><b/></a>").unwrap();
        let err = root.resolve_path("a.c").unwrap_err();
        assert_eq!(err.tag, "c");
    }

    #[test]
    fn test_underscore_fallback() {
        let root = parse_str("<doc><us-parties><x/></us-parties></doc>").unwrap();
        assert!(root.resolve_path("doc.us_parties.x").is_ok());
        // Exact spelling wins when present
        let root = parse_str("<doc><a_b>1</a_b><a-b>2</a-b></doc>").unwrap();
        assert_eq!(root.resolve_path("doc.a_b").unwrap().get_content(), vec!["1"]);
    }

    #[test]
    fn test_contents_of_direct_children_only() {
        let root = parse_str("<a><x><c>1</c></x><y><z><c>2</c></z></y><c>3</c></a>").unwrap();
        let a = root.resolve("a").unwrap().first();
        assert_eq!(a.contents_of("c"), vec!["3"]);

        let x = a.resolve("x").unwrap().first();
        assert_eq!(x.contents_of("c"), vec!["1"]);
        assert!(x.resolve("z").is_err());
        assert!(x.contents_of("z").is_empty());
    }

    #[test]
    fn test_contents_of_agrees_with_resolve() {
        let root = parse_str("<a><x><c>1</c></x></a>").unwrap();
        let a = root.resolve("a").unwrap().first();
        assert!(a.contents_of("c").is_empty());
        assert_eq!(a.resolve("c").unwrap_err().tag, "c");
    }

    #[test]
    fn test_node_count() {
        let root = parse_str("<a><b/><b><c/></b></a>").unwrap();
        assert_eq!(root.node_count(), 5);
    }
}
