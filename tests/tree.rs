// tests/tree.rs

use patxml::tree::{self, Selection};
use patxml::{EntityPolicy, ParseOptions};

const BASIC: &str = include_str!("fixtures/basic.xml");

#[test]
fn test_basic_tag_counts() {
    let root = tree::parse_str(BASIC).unwrap();
    assert_eq!(root.resolve("a").unwrap().len(), 1);
    assert_eq!(root.resolve_path("a.b").unwrap().len(), 2);
    assert_eq!(root.resolve_path("a.b.c").unwrap().len(), 3);
    assert_eq!(root.resolve_path("a.b.d").unwrap().len(), 2);
    assert_eq!(root.resolve_path("a.c").unwrap().len(), 3);
}

#[test]
fn test_basic_tag_contents() {
    let root = tree::parse_str(BASIC).unwrap();
    let c = root.resolve_path("a.b.c").unwrap();
    assert_eq!(c[0].get_content(), "hello");
    assert_eq!(c[1].get_content(), "world");
    assert_eq!(c[2].get_content(), "3");

    let d = root.resolve_path("a.b.d").unwrap();
    assert_eq!(d.get_content(), vec!["1", "2"]);
}

#[test]
fn test_basic_contents_of() {
    let root = tree::parse_str(BASIC).unwrap();
    let b = root.resolve_path("a.b").unwrap();
    assert_eq!(b.contents_of("c"), vec!["hello", "world", "3"]);
    assert_eq!(b[0].contents_of("c"), vec!["hello", "world"]);

    // Direct children win over deeper matches
    let a = root.resolve("a").unwrap();
    assert_eq!(a.contents_of("c"), vec!["x", "y", "z"]);
}

#[test]
fn test_single_versus_group() {
    let root = tree::parse_str(BASIC).unwrap();
    assert!(matches!(root.resolve("a").unwrap(), Selection::Single(_)));
    assert!(matches!(root.resolve_path("a.b").unwrap(), Selection::Group(_)));
    assert_eq!(root.resolve_path("a.nothing").unwrap_err().tag, "nothing");
}

#[test]
fn test_whitespace_preserved() {
    let root = tree::parse_str(BASIC).unwrap();
    let b = root.resolve_path("a.b").unwrap();
    assert_eq!(b[1].get_content(), "\n    \n    \n  ");
}

#[test]
fn test_bytes_and_reader_agree() {
    let from_str = tree::parse_str(BASIC).unwrap();
    let from_bytes = tree::parse(BASIC.as_bytes()).unwrap();
    let from_reader = tree::parse_reader(BASIC.as_bytes()).unwrap();
    assert_eq!(from_str, from_bytes);
    assert_eq!(from_str, from_reader);
}

#[test]
fn test_parse_error_location() {
    let input = "<a>\n  <b>\n  </a>\n";
    let err = tree::parse_str(input).unwrap_err();
    assert_eq!(err.line, 3);
    assert_eq!(err.column, 3);
    assert!(err.to_string().contains("line 3, column 3"));
}

#[test]
fn test_undeclared_entity_policies() {
    let input = b"<a>x&unknown;y</a>";

    let root = tree::parse(input).unwrap();
    assert_eq!(root.resolve("a").unwrap().get_content(), vec!["xy"]);

    let keep = ParseOptions::new().entity_policy(EntityPolicy::Keep);
    let root = tree::parse_with_options(input, &keep).unwrap();
    assert_eq!(root.resolve("a").unwrap().get_content(), vec!["x&unknown;y"]);

    let reject = ParseOptions::new().entity_policy(EntityPolicy::Reject);
    let err = tree::parse_with_options(input, &reject).unwrap_err();
    assert_eq!(err.position, 4);
}
