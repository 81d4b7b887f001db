//! Tag lookup results
//!
//! A lookup that matches one child yields `Single`; two or more yield a
//! `Group` in document order. Every operation on a group broadcasts across
//! its members and flattens one level.
//!
//! Lookups build selections through `Selection::from_nodes`, so a selection
//! always holds at least one node. A hand-built `Group(vec![])` breaks that:
//! `first` and indexing panic on it.

use super::node::AttributeNode;
use crate::error::FieldNotFound;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<'a> {
    Single(&'a AttributeNode),
    /// Two or more nodes, document order
    Group(Vec<&'a AttributeNode>),
}

impl<'a> Selection<'a> {
    /// `None` for no nodes, `Single` for one, `Group` otherwise
    pub fn from_nodes(mut nodes: Vec<&'a AttributeNode>) -> Option<Self> {
        match nodes.len() {
            0 => None,
            1 => nodes.pop().map(Selection::Single),
            _ => Some(Selection::Group(nodes)),
        }
    }

    fn as_slice(&self) -> &[&'a AttributeNode] {
        match self {
            Selection::Single(node) => std::slice::from_ref(node),
            Selection::Group(nodes) => nodes,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// False for any selection produced by a lookup or `from_nodes`
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Selection::Group(_))
    }

    pub fn get(&self, index: usize) -> Option<&'a AttributeNode> {
        self.as_slice().get(index).copied()
    }

    /// The first member in document order
    ///
    /// # Panics
    ///
    /// On an empty `Group`, which `from_nodes` never builds.
    pub fn first(&self) -> &'a AttributeNode {
        match self {
            Selection::Single(node) => *node,
            Selection::Group(nodes) => nodes[0],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a AttributeNode> + '_ {
        self.as_slice().iter().copied()
    }

    /// Look `tag` up on every member and merge the matches
    pub fn resolve(&self, tag: &str) -> Result<Selection<'a>, FieldNotFound> {
        let nodes: Vec<&'a AttributeNode> = self.iter().flat_map(|node| node.lookup(tag)).collect();
        Selection::from_nodes(nodes).ok_or_else(|| FieldNotFound::new(tag))
    }

    /// Resolve each segment of a dotted path in turn; empty segments are ignored
    pub fn resolve_path(&self, path: &str) -> Result<Selection<'a>, FieldNotFound> {
        path.split('.')
            .filter(|step| !step.is_empty())
            .try_fold(self.clone(), |selection, step| selection.resolve(step))
    }

    /// Each member's own content
    pub fn get_content(&self) -> Vec<&'a str> {
        self.iter().map(AttributeNode::get_content).collect()
    }

    /// Every member's `contents_of(tag)`, concatenated in order
    pub fn contents_of(&self, tag: &str) -> Vec<&'a str> {
        self.iter().flat_map(|node| node.contents_of(tag)).collect()
    }

    /// Value of attribute `name` on each member that carries it
    pub fn attribute(&self, name: &str) -> Vec<&'a str> {
        self.iter().filter_map(|node| node.get_attribute(name)).collect()
    }
}

impl<'a> std::ops::Index<usize> for Selection<'a> {
    type Output = AttributeNode;

    fn index(&self, index: usize) -> &AttributeNode {
        self.as_slice()[index]
    }
}

impl<'s, 'a> IntoIterator for &'s Selection<'a> {
    type Item = &'a AttributeNode;
    type IntoIter = std::iter::Copied<std::slice::Iter<'s, &'a AttributeNode>>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::parse_str;

    const DOC: &str = "<a>\
        <b><c>hello</c><c>world</c><d>1</d></b>\
        <b><c>3</c><d>2</d></b>\
        <e k=\"v1\"/><e/><e k=\"v3\"/>\
        </a>";

    #[test]
    fn test_single_is_not_a_group() {
        let root = parse_str(DOC).unwrap();
        let a = root.resolve("a").unwrap();
        assert!(matches!(a, Selection::Single(_)));
        assert_eq!(a.len(), 1);
        assert_eq!(a.first().tag(), "a");
    }

    #[test]
    fn test_group_in_document_order() {
        let root = parse_str(DOC).unwrap();
        let b = root.resolve_path("a.b").unwrap();
        assert!(b.is_group());
        assert_eq!(b.len(), 2);
        assert_eq!(b[1].contents_of("c"), vec!["3"]);
        assert!(b.get(2).is_none());
    }

    #[test]
    fn test_broadcast_flattens_one_level() {
        let root = parse_str(DOC).unwrap();
        let c = root.resolve_path("a.b.c").unwrap();
        assert_eq!(c.len(), 3);
        assert_eq!(c.get_content(), vec!["hello", "world", "3"]);
        assert_eq!(root.resolve_path("a.b").unwrap().contents_of("d"), vec!["1", "2"]);
    }

    #[test]
    fn test_broadcast_to_single_match() {
        let root = parse_str("<a><b><c>x</c></b><b/></a>").unwrap();
        let c = root.resolve_path("a.b.c").unwrap();
        assert!(matches!(c, Selection::Single(n) if n.get_content() == "x"));
    }

    #[test]
    fn test_group_attribute_skips_missing() {
        let root = parse_str(DOC).unwrap();
        let e = root.resolve_path("a.e").unwrap();
        assert_eq!(e.attribute("k"), vec!["v1", "v3"]);
    }

    #[test]
    fn test_path_ignores_empty_segments() {
        let root = parse_str(DOC).unwrap();
        assert_eq!(root.resolve_path("").unwrap().first().tag(), "");
        assert_eq!(root.resolve_path(".a..b.").unwrap().len(), 2);
    }

    #[test]
    fn test_iterate() {
        let root = parse_str(DOC).unwrap();
        let tags: Vec<&str> = root.resolve_path("a.b.d").unwrap().iter().map(|n| n.get_content()).collect();
        assert_eq!(tags, vec!["1", "2"]);
        let mut count = 0;
        for _ in &root.resolve_path("a.e").unwrap() {
            count += 1;
        }
        assert_eq!(count, 3);
    }

    #[test]
    fn test_from_nodes() {
        let root = parse_str(DOC).unwrap();
        let a = root.resolve("a").unwrap().first();
        assert!(Selection::from_nodes(vec![]).is_none());
        assert!(matches!(Selection::from_nodes(vec![a]), Some(Selection::Single(_))));

        let pair = Selection::from_nodes(vec![a, a]).unwrap();
        assert!(pair.is_group());
        assert!(!pair.is_empty());
    }

    #[test]
    #[should_panic]
    fn test_first_of_empty_group_panics() {
        Selection::Group(vec![]).first();
    }
}
