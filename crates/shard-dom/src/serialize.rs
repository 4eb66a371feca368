//! Canonical serialization of (possibly edited) subtrees.
//!
//! `modify` never slices the source buffer: it re-renders every tag from its
//! name and attributes, so structural edits always show up, at the cost of the
//! original formatting. Text runs are written trimmed.

use std::fmt::Write as _;

use crate::{NodeId, SegmentKind, Tag, TagRef, Text, TextRef, Tree};

impl Tree {
    /// Render the whole document, edits included.
    #[must_use]
    pub fn modify(&self) -> String {
        self.root_tag().modify()
    }
}

impl TagRef<'_> {
    /// Render this tag and its current children.
    #[must_use]
    pub fn modify(&self) -> String {
        let mut out = String::new();
        write_segment(self.tree(), self.id(), &mut out);
        out
    }
}

impl TextRef<'_> {
    /// Render this text run: its bytes with surrounding whitespace trimmed.
    #[must_use]
    pub fn modify(&self) -> String {
        text_modify(self.tree().as_text(self.id()))
    }
}

impl Text {
    /// Render this text run: its bytes with surrounding whitespace trimmed.
    #[must_use]
    pub fn modify(&self) -> String {
        String::from_utf8_lossy(self.trimmed()).into_owned()
    }
}

fn text_modify(text: Option<&Text>) -> String {
    text.map(Text::modify).unwrap_or_default()
}

fn write_segment(tree: &Tree, id: NodeId, out: &mut String) {
    match tree.get(id).map(|s| s.kind()) {
        Some(SegmentKind::Text(text)) => out.push_str(&text.modify()),
        Some(SegmentKind::Tag(tag)) => write_tag(tree, id, tag, out),
        None => {}
    }
}

fn write_tag(tree: &Tree, id: NodeId, tag: &Tag, out: &mut String) {
    // A nameless root only wraps a fragment that had no tag of its own.
    let named = !tag.name().is_empty();
    if named {
        write_open_tag(tag, out);
        if tag.is_void() {
            return;
        }
    }
    for &child in tree.children(id) {
        write_segment(tree, child, out);
    }
    if named {
        let _ = write!(out, "</{}>", tag.name());
    }
}

fn write_open_tag(tag: &Tag, out: &mut String) {
    out.push('<');
    out.push_str(tag.name());
    for (name, value) in tag.attributes() {
        // Values holding a double quote fall back to single quotes.
        let quote = if value.contains('"') { '\'' } else { '"' };
        let _ = write!(out, " {name}={quote}{value}{quote}");
    }
    out.push('>');
}
