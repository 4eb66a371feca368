//! Tests for tree mutation: arena splicing, write_tag/write_text, delete.

use shard_common::Error;
use shard_dom::{Content, NodeId, SegmentKind, Tag, Text, Tree};

/// Helper to create a detached tag segment and return its NodeId.
fn alloc_tag(tree: &mut Tree, name: &str) -> NodeId {
    tree.alloc(SegmentKind::Tag(Tag::new(name)), Content::Synthesized)
}

fn alloc_text(tree: &mut Tree, data: &str) -> NodeId {
    tree.alloc(
        SegmentKind::Text(Text::new(data.as_bytes())),
        Content::Synthesized,
    )
}

fn empty_tree(root: &str) -> Tree {
    let source = format!("<{root}></{root}>");
    Tree::new(source.into_bytes(), Tag::new(root))
}

// ========== remove_child ==========

#[test]
fn test_remove_child_single_child() {
    let mut tree = empty_tree("div");
    let child = alloc_tag(&mut tree, "p");
    tree.append_child(NodeId::ROOT, child);

    assert_eq!(tree.children(NodeId::ROOT).len(), 1);
    assert!(tree.remove_child(NodeId::ROOT, child));

    assert_eq!(tree.children(NodeId::ROOT).len(), 0);
    assert_eq!(tree.parent(child), None);
    assert_eq!(tree.prev_sibling(child), None);
    assert_eq!(tree.next_sibling(child), None);
    // Removing it twice is a no-op
    assert!(!tree.remove_child(NodeId::ROOT, child));
}

#[test]
fn test_remove_child_middle_of_three() {
    let mut tree = empty_tree("div");
    let a = alloc_tag(&mut tree, "a");
    let b = alloc_tag(&mut tree, "b");
    let c = alloc_tag(&mut tree, "c");
    tree.append_child(NodeId::ROOT, a);
    tree.append_child(NodeId::ROOT, b);
    tree.append_child(NodeId::ROOT, c);

    assert!(tree.remove_child(NodeId::ROOT, b));

    // a and c are siblings now
    assert_eq!(tree.children(NodeId::ROOT), &[a, c]);
    assert_eq!(tree.next_sibling(a), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(a));
}

// ========== insert_child / replace_with_children ==========

#[test]
fn test_insert_child_at_front() {
    let mut tree = empty_tree("div");
    let existing = alloc_tag(&mut tree, "b");
    tree.append_child(NodeId::ROOT, existing);

    let new_child = alloc_tag(&mut tree, "a");
    tree.insert_child(NodeId::ROOT, 0, new_child);

    assert_eq!(tree.children(NodeId::ROOT), &[new_child, existing]);
    assert_eq!(tree.parent(new_child), Some(NodeId::ROOT));
    assert_eq!(tree.prev_sibling(new_child), None);
    assert_eq!(tree.prev_sibling(existing), Some(new_child));
}

#[test]
fn test_replace_with_children_keeps_order_and_links() {
    let mut tree = empty_tree("body");
    let before = alloc_tag(&mut tree, "h1");
    let wrapper = alloc_tag(&mut tree, "div");
    let after = alloc_tag(&mut tree, "footer");
    tree.append_child(NodeId::ROOT, before);
    tree.append_child(NodeId::ROOT, wrapper);
    tree.append_child(NodeId::ROOT, after);
    let a = alloc_tag(&mut tree, "a");
    let b = alloc_text(&mut tree, "b");
    tree.append_child(wrapper, a);
    tree.append_child(wrapper, b);

    assert!(tree.replace_with_children(NodeId::ROOT, wrapper));

    assert_eq!(tree.children(NodeId::ROOT), &[before, a, b, after]);
    assert_eq!(tree.parent(a), Some(NodeId::ROOT));
    assert_eq!(tree.parent(wrapper), None);
    assert_eq!(tree.next_sibling(before), Some(a));
    assert_eq!(tree.prev_sibling(after), Some(b));
}

// ========== write_tag / write_text ==========

#[test]
fn test_write_tag_at_front_then_delete_restores_children() {
    let mut tree = empty_tree("div");
    let a = alloc_tag(&mut tree, "a");
    let b = alloc_text(&mut tree, "b");
    tree.append_child(NodeId::ROOT, a);
    tree.append_child(NodeId::ROOT, b);
    let original = tree.children(NodeId::ROOT).to_vec();

    let span = tree.write_tag(NodeId::ROOT, 0, "span").unwrap();
    assert_eq!(tree.children(NodeId::ROOT), &[span, a, b]);
    assert_eq!(tree.get(span).unwrap().content(), Content::Synthesized);

    tree.delete(span, false).unwrap();
    assert_eq!(tree.children(NodeId::ROOT), original.as_slice());
}

#[test]
fn test_write_position_is_clamped() {
    let mut tree = empty_tree("ul");
    // Empty children force position 0
    let first = tree.write_tag(NodeId::ROOT, 7, "li").unwrap();
    assert_eq!(tree.children(NodeId::ROOT), &[first]);

    // Exactly the child count appends
    let last = tree.write_text(NodeId::ROOT, 1, "tail").unwrap();
    assert_eq!(tree.children(NodeId::ROOT), &[first, last]);

    // Past the end lands at the last index
    let middle = tree.write_tag(NodeId::ROOT, 99, "li").unwrap();
    assert_eq!(tree.children(NodeId::ROOT), &[first, middle, last]);
    assert_eq!(tree.tag(middle).unwrap().index(), Some(1));
}

#[test]
fn test_written_text_renders_trimmed() {
    let mut tree = empty_tree("p");
    let text = tree.write_text(NodeId::ROOT, 0, "  padded run \n").unwrap();
    let view = tree.text(text).unwrap();
    assert!(std::ptr::eq(view.tree(), &tree));
    assert_eq!(view.modify(), "padded run");
    assert_eq!(view.string(), "  padded run \n");
    assert_eq!(tree.modify(), "<p>padded run</p>");
}

#[test]
fn test_write_into_void_tag_fails_without_change() {
    let mut tree = empty_tree("p");
    let br = tree.write_tag(NodeId::ROOT, 0, "br").unwrap();
    assert!(tree.tag(br).unwrap().is_void());

    let before = tree.len();
    let err = tree.write_text(br, 0, "nope").unwrap_err();
    assert_eq!(
        err,
        Error::NoSpaceToWrite {
            tag: "br".to_string()
        }
    );
    let err = tree.write_tag(br, 0, "span").unwrap_err();
    assert!(matches!(err, Error::NoSpaceToWrite { .. }));
    assert_eq!(tree.len(), before);
    assert!(tree.children(br).is_empty());
}

#[test]
fn test_write_into_text_or_unknown_node_fails() {
    let mut tree = empty_tree("p");
    let text = tree.write_text(NodeId::ROOT, 0, "hello").unwrap();
    assert!(matches!(
        tree.write_tag(text, 0, "b"),
        Err(Error::NotATag { .. })
    ));
    assert_eq!(
        tree.write_tag(NodeId(42), 0, "b"),
        Err(Error::UnknownNode { node: 42 })
    );
}

#[test]
fn test_edits_mark_ancestors_synthesized() {
    let mut tree = empty_tree("html");
    let body = tree.alloc(
        SegmentKind::Tag(Tag::new("body")),
        Content::Verbatim {
            offset: 6,
            limit: 6,
        },
    );
    tree.append_child(NodeId::ROOT, body);
    let sibling = tree.alloc(
        SegmentKind::Tag(Tag::new("aside")),
        Content::Verbatim {
            offset: 6,
            limit: 6,
        },
    );
    tree.append_child(NodeId::ROOT, sibling);

    let _ = tree.write_text(body, 0, "x").unwrap();

    assert_eq!(tree.get(body).unwrap().content(), Content::Synthesized);
    assert_eq!(tree.get(NodeId::ROOT).unwrap().content(), Content::Synthesized);
    assert!(tree.get(sibling).unwrap().content().is_verbatim());
}

// ========== delete ==========

#[test]
fn test_delete_root_is_refused() {
    let mut tree = empty_tree("html");
    assert_eq!(
        tree.delete(NodeId::ROOT, false),
        Err(Error::RootUndeletable {
            tag: "html".to_string()
        })
    );
    assert_eq!(
        tree.delete(NodeId::ROOT, true),
        Err(Error::RootUndeletable {
            tag: "html".to_string()
        })
    );
}

#[test]
fn test_delete_twice_reports_detached() {
    let mut tree = empty_tree("div");
    let p = tree.write_tag(NodeId::ROOT, 0, "p").unwrap();
    tree.delete(p, false).unwrap();
    assert!(!tree.is_attached(p));
    assert_eq!(tree.delete(p, false), Err(Error::Detached { node: p.0 }));
}

#[test]
fn test_delete_inside_removed_subtree_reports_detached() {
    let mut tree = empty_tree("div");
    let p = tree.write_tag(NodeId::ROOT, 0, "p").unwrap();
    let i = tree.write_tag(p, 0, "i").unwrap();
    let x = tree.write_text(i, 0, "x").unwrap();
    tree.delete(p, false).unwrap();

    assert!(!tree.is_attached(i));
    assert_eq!(tree.delete(i, false), Err(Error::Detached { node: i.0 }));
    assert_eq!(tree.delete(x, true), Err(Error::Detached { node: x.0 }));
    // The removed subtree is left as it was
    assert_eq!(tree.children(p), &[i]);
    assert_eq!(tree.children(i), &[x]);
}

#[test]
fn test_delete_with_promotion() {
    let mut tree = empty_tree("div");
    let head = tree.write_text(NodeId::ROOT, 0, "head").unwrap();
    let section = tree.write_tag(NodeId::ROOT, 1, "section").unwrap();
    let tail = tree.write_text(NodeId::ROOT, 2, "tail").unwrap();
    let x = tree.write_tag(section, 0, "x").unwrap();
    let y = tree.write_text(section, 1, "y").unwrap();
    let z = tree.write_tag(section, 2, "z").unwrap();

    tree.delete(section, true).unwrap();

    assert_eq!(tree.children(NodeId::ROOT), &[head, x, y, z, tail]);
    for id in [x, y, z] {
        assert_eq!(tree.parent(id), Some(NodeId::ROOT));
    }
    assert_eq!(tree.modify(), "<div>head<x></x>y<z></z>tail</div>");
}

#[test]
fn test_delete_text_node() {
    let mut tree = empty_tree("p");
    let a = tree.write_text(NodeId::ROOT, 0, "a").unwrap();
    let b = tree.write_text(NodeId::ROOT, 1, "b").unwrap();
    tree.delete(a, true).unwrap();
    assert_eq!(tree.children(NodeId::ROOT), &[b]);
    assert_eq!(tree.modify(), "<p>b</p>");
}

// ========== attributes ==========

#[test]
fn test_set_and_remove_attribute() {
    let mut tree = empty_tree("a");
    assert_eq!(tree.set_attribute(NodeId::ROOT, "href", "/x"), Ok(None));
    assert_eq!(
        tree.set_attribute(NodeId::ROOT, "class", "big red"),
        Ok(None)
    );
    let root = tree.root_tag();
    assert!(root.has_class("red"));
    assert_eq!(root.get_attribute("href"), "/x");
    assert_eq!(tree.modify(), "<a href=\"/x\" class=\"big red\"></a>");

    assert_eq!(
        tree.remove_attribute(NodeId::ROOT, "href"),
        Ok(Some("/x".to_string()))
    );
    assert_eq!(tree.remove_attribute(NodeId::ROOT, "href"), Ok(None));
    assert_eq!(tree.modify(), "<a class=\"big red\"></a>");
}
