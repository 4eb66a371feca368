//! Integration tests for selector compilation and evaluation.

use shard_common::Error;
use shard_dom::Tree;
use shard_html::parse;
use shard_query::{Matcher, Query, Selector};

/// Helper to parse a string that is known to be non-empty
fn parse_str(html: &str) -> Tree {
    parse(html).unwrap()
}

/// Helper to run a selector from the root and collect the verbatim strings
fn select_strings(tree: &Tree, selector: &str) -> Vec<String> {
    tree.try_find_by_css_selector(selector)
        .unwrap()
        .iter()
        .map(|tag| tag.string().into_owned())
        .collect()
}

/// Helper to get the byte position of a selector syntax error
fn error_position(selector: &str) -> usize {
    match Selector::parse(selector) {
        Err(Error::Syntax { position, .. }) => position,
        other => panic!("expected syntax error for {selector:?}, got {other:?}"),
    }
}

// ========== compilation ==========

#[test]
fn test_single_compound_compiles_to_filters() {
    let selector = Selector::parse("p#main.note[data-x]").unwrap();
    assert_eq!(
        selector.matcher(),
        &Matcher::And(vec![
            Matcher::ByName("p".into()),
            Matcher::ById("main".into()),
            Matcher::ByClass("note".into()),
            Matcher::Attribute {
                name: "data-x".into(),
                value: None,
            },
        ])
    );
    assert!(selector.matcher().is_filter());
}

#[test]
fn test_alternatives_compile_to_or() {
    let matcher = Selector::parse("a, b").unwrap().into_matcher();
    assert_eq!(
        matcher,
        Matcher::Or(vec![
            Matcher::And(vec![Matcher::ByName("a".into())]),
            Matcher::And(vec![Matcher::ByName("b".into())]),
        ])
    );
}

#[test]
fn test_quoted_attribute_value_is_unquoted() {
    let matcher = Selector::parse("[title='a ] b']").unwrap().into_matcher();
    assert_eq!(
        matcher,
        Matcher::And(vec![Matcher::Attribute {
            name: "title".into(),
            value: Some("a ] b".into()),
        }])
    );
}

#[test]
fn test_selector_keeps_its_source() {
    let selector: Selector = "div > p".parse().unwrap();
    assert_eq!(selector.source(), "div > p");
    assert_eq!(selector.to_string(), "div > p");
}

// ========== syntax errors ==========

#[test]
fn test_empty_selector() {
    assert_eq!(error_position(""), 0);
    assert_eq!(error_position("   "), 3);
}

#[test]
fn test_empty_alternative() {
    assert_eq!(error_position("p,,a"), 2);
    assert_eq!(error_position("p,"), 2);
}

#[test]
fn test_dangling_combinator() {
    assert_eq!(error_position("div >"), 4);
    assert_eq!(error_position("div +, p"), 4);
}

#[test]
fn test_doubled_combinator() {
    assert_eq!(error_position("a > > b"), 4);
    assert_eq!(error_position("a>+b"), 2);
}

#[test]
fn test_empty_id_and_class() {
    assert_eq!(error_position("#"), 0);
    assert_eq!(error_position("p ."), 2);
}

#[test]
fn test_bracket_errors() {
    assert_eq!(error_position("a[href"), 1);
    assert_eq!(error_position("a[href='x"), 1);
    assert_eq!(error_position("a[]"), 1);
    assert_eq!(error_position("a]"), 1);
}

#[test]
fn test_unexpected_character() {
    assert_eq!(error_position("a ~ b"), 2);
}

#[test]
fn test_syntax_error_carries_selector() {
    let err = Selector::parse("a ~ b").unwrap_err();
    assert_eq!(
        err,
        Error::Syntax {
            selector: "a ~ b".into(),
            position: 2,
            reason: "unexpected character",
        }
    );
}

// ========== evaluation ==========

#[test]
fn test_id_child_class() {
    let tree = parse_str(r#"<div id="x"><p class="a">A</p><p>B</p></div>"#);
    assert_eq!(select_strings(&tree, "#x > p.a"), vec![r#"<p class="a">A</p>"#]);
    assert_eq!(
        select_strings(&tree, "div p"),
        vec![r#"<p class="a">A</p>"#, "<p>B</p>"]
    );
}

#[test]
fn test_path_starts_from_the_input_set() {
    let tree = parse_str("<div><p>x</p></div>");
    // The root is `div`, so a bare `p` filters it away.
    assert!(select_strings(&tree, "p").is_empty());
    assert_eq!(select_strings(&tree, "div p"), vec!["<p>x</p>"]);
}

#[test]
fn test_leading_combinator_is_relative() {
    let tree = parse_str("<ul><li>1</li><li><b>2</b></li></ul>");
    assert_eq!(
        select_strings(&tree, "> li"),
        vec!["<li>1</li>", "<li><b>2</b></li>"]
    );
    assert_eq!(select_strings(&tree, " b"), Vec::<String>::new());
    assert_eq!(select_strings(&tree, "ul li > b"), vec!["<b>2</b>"]);
}

#[test]
fn test_following_sibling_takes_every_later_tag() {
    let tree = parse_str(r#"<ul><li id="1">1</li> <li id="2">2</li> <li id="3">3</li></ul>"#);
    assert_eq!(
        select_strings(&tree, "ul > #1 + li"),
        vec![r#"<li id="2">2</li>"#, r#"<li id="3">3</li>"#]
    );
    assert!(select_strings(&tree, "ul > #3 + li").is_empty());
}

#[test]
fn test_attribute_presence_and_value() {
    let tree = parse_str(r#"<div><a href="x">1</a><a>2</a><a href='y z'>3</a></div>"#);
    assert_eq!(
        select_strings(&tree, "div a[href]"),
        vec![r#"<a href="x">1</a>"#, "<a href='y z'>3</a>"]
    );
    assert_eq!(select_strings(&tree, "div a[href=x]"), vec![r#"<a href="x">1</a>"#]);
    assert_eq!(
        select_strings(&tree, r#"div [href="y z"]"#),
        vec!["<a href='y z'>3</a>"]
    );
}

#[test]
fn test_alternatives_union_in_first_seen_order() {
    let tree = parse_str(r#"<ul><li class="a b">1</li><li class="b">2</li></ul>"#);
    let set = tree.try_find_by_css_selector("ul .b, ul .a").unwrap();
    assert_eq!(set.len(), 2);
    assert_eq!(
        set.iter().map(|tag| tag.string().into_owned()).collect::<Vec<_>>(),
        vec![r#"<li class="a b">1</li>"#, r#"<li class="b">2</li>"#]
    );
}

#[test]
fn test_structural_steps_deduplicate() {
    let tree = parse_str("<div><div><p>x</p></div></div>");
    let divs = tree.find_by_name("div");
    assert_eq!(divs.len(), 2);
    // Both divs reach the same `p`, which is kept once.
    assert_eq!(divs.find_by_css_selector("div p").len(), 1);
    // A subtree search has no such step and reports it per start.
    assert_eq!(divs.find_by_name("p").len(), 2);
}

#[test]
fn test_lenient_selector_returns_empty_set() {
    let tree = parse_str("<div><p>x</p></div>");
    assert!(tree.find_by_css_selector("div >").is_empty());
    assert!(tree.find_by_css_selector("a ~ b").is_empty());
    assert!(tree.try_find_by_css_selector("div >").is_err());
}
