//! Borrowed views pairing a [`Tree`] with a handle.
//!
//! Views are `Copy` and cheap; they are the read side of the document model.
//! Anything that edits the tree goes through `&mut Tree` and plain
//! [`NodeId`]s instead.

use std::borrow::Cow;

use crate::{AttributesMap, ClassSet, Content, NodeId, SegmentKind, Tag, Text, Tree};

/// A tag together with the tree that owns it.
#[derive(Debug, Clone, Copy)]
pub struct TagRef<'t> {
    tree: &'t Tree,
    id: NodeId,
    tag: &'t Tag,
}

/// A text run together with the tree that owns it.
#[derive(Debug, Clone, Copy)]
pub struct TextRef<'t> {
    tree: &'t Tree,
    id: NodeId,
    text: &'t Text,
}

/// Either kind of child segment.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'t> {
    /// A child tag.
    Tag(TagRef<'t>),
    /// A child text run.
    Text(TextRef<'t>),
}

impl Tree {
    /// View a tag, `None` if `id` is unknown or names a text run.
    #[must_use]
    pub fn tag(&self, id: NodeId) -> Option<TagRef<'_>> {
        self.as_tag(id).map(|tag| TagRef {
            tree: self,
            id,
            tag,
        })
    }

    /// View a text run, `None` if `id` is unknown or names a tag.
    #[must_use]
    pub fn text(&self, id: NodeId) -> Option<TextRef<'_>> {
        self.as_text(id).map(|text| TextRef {
            tree: self,
            id,
            text,
        })
    }

    /// View any segment.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        match self.get(id)?.kind() {
            SegmentKind::Tag(tag) => Some(NodeRef::Tag(TagRef {
                tree: self,
                id,
                tag,
            })),
            SegmentKind::Text(text) => Some(NodeRef::Text(TextRef {
                tree: self,
                id,
                text,
            })),
        }
    }

    /// View the root tag.
    ///
    /// # Panics
    ///
    /// Never in practice: the root slot is created as a tag and never replaced.
    #[must_use]
    pub fn root_tag(&self) -> TagRef<'_> {
        match self.tag(NodeId::ROOT) {
            Some(root) => root,
            None => unreachable!("the root segment is always a tag"),
        }
    }

    /// Raw bytes of a verbatim segment.
    pub(crate) fn slice(&self, content: Content) -> Option<&[u8]> {
        content.range().and_then(|range| self.source().get(range))
    }
}

impl<'t> TagRef<'t> {
    /// The handle of this tag.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// The owning tree.
    #[must_use]
    pub const fn tree(&self) -> &'t Tree {
        self.tree
    }

    /// The underlying tag data.
    #[must_use]
    pub const fn tag(&self) -> &'t Tag {
        self.tag
    }

    /// The tag name.
    #[must_use]
    pub fn name(&self) -> &'t str {
        self.tag.name()
    }

    /// All attributes in source order.
    #[must_use]
    pub const fn attributes(&self) -> &'t AttributesMap {
        self.tag.attributes()
    }

    /// The class set.
    #[must_use]
    pub const fn classes(&self) -> &'t ClassSet {
        self.tag.classes()
    }

    /// Whether the tag has a class.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.tag.has_class(class)
    }

    /// Whether the tag is void.
    #[must_use]
    pub const fn is_void(&self) -> bool {
        self.tag.is_void()
    }

    /// Whether this is the tree's root tag.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.id == NodeId::ROOT
    }

    /// Where this tag's bytes come from.
    #[must_use]
    pub fn content(&self) -> Content {
        self.tree.get(self.id).map_or(Content::Synthesized, |s| s.content())
    }

    /// The owning tag.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.tree.parent(self.id).and_then(|p| self.tree.tag(p))
    }

    /// Child segments in document order.
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'t>> + use<'t> {
        let tree = self.tree;
        tree.children(self.id)
            .iter()
            .filter_map(move |&child| tree.node(child))
    }

    /// Child tags in document order, text runs skipped.
    pub fn child_tags(&self) -> impl Iterator<Item = Self> + use<'t> {
        let tree = self.tree;
        tree.children(self.id)
            .iter()
            .filter_map(move |&child| tree.tag(child))
    }

    /// The bytes this tag occupies: open marker through close marker.
    ///
    /// The root spans the whole source buffer. A synthesized tag is rendered
    /// with [`TagRef::modify`] instead.
    #[must_use]
    pub fn bytes(&self) -> Cow<'t, [u8]> {
        match self.tree.slice(self.content()) {
            Some(raw) => Cow::Borrowed(raw),
            None => Cow::Owned(self.modify().into_bytes()),
        }
    }

    /// [`TagRef::bytes`] decoded as UTF-8 (lossily).
    #[must_use]
    pub fn string(&self) -> Cow<'t, str> {
        match self.bytes() {
            Cow::Borrowed(raw) => String::from_utf8_lossy(raw),
            Cow::Owned(rendered) => Cow::Owned(String::from_utf8_lossy(&rendered).into_owned()),
        }
    }

    /// The bytes between this tag's own markers.
    #[must_use]
    pub fn unwrap(&self) -> Vec<u8> {
        let children = self.tree.children(self.id);
        let (Some(&first), Some(&last)) = (children.first(), children.last()) else {
            return Vec::new();
        };
        if self.is_void() {
            return Vec::new();
        }

        if self.content().is_verbatim() {
            let start = self.tree.get(first).and_then(|s| s.content().range());
            let end = self.tree.get(last).and_then(|s| s.content().range());
            if let (Some(start), Some(end)) = (start, end)
                && let Some(raw) = self.tree.source().get(start.start..end.end)
            {
                return raw.to_vec();
            }
        }

        let mut inner = Vec::new();
        for child in self.children() {
            inner.extend_from_slice(&child.bytes());
        }
        inner
    }

    /// The text below this tag with all markup removed.
    ///
    /// Every text run is prefixed with one space so runs from different
    /// places do not glue together.
    #[must_use]
    pub fn extract(&self) -> Vec<u8> {
        let mut text = Vec::new();
        if !self.is_void() {
            extract_into(self.tree, self.id, &mut text);
        }
        text
    }

    /// Attribute lookup with two pseudo-attributes: `tagName` and `content`.
    ///
    /// Missing attributes read as the empty string.
    #[must_use]
    pub fn get_attribute(&self, name: &str) -> Cow<'t, str> {
        match name {
            "tagName" => Cow::Borrowed(self.name()),
            "content" => Cow::Owned(String::from_utf8_lossy(&self.extract()).into_owned()),
            _ => Cow::Borrowed(self.tag.attribute(name).unwrap_or("")),
        }
    }

    /// The nearest preceding sibling tag.
    #[must_use]
    pub fn prev(&self) -> Option<Self> {
        self.tree
            .preceding_siblings(self.id)
            .find_map(|id| self.tree.tag(id))
    }

    /// The nearest following sibling tag.
    #[must_use]
    pub fn next(&self) -> Option<Self> {
        self.tree
            .following_siblings(self.id)
            .find_map(|id| self.tree.tag(id))
    }

    /// Position among the parent's children, text runs included.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        index_in_parent(self.tree, self.id)
    }
}

impl std::fmt::Display for TagRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.string())
    }
}

impl<'t> TextRef<'t> {
    /// The handle of this text run.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// The tree that owns this text run.
    #[must_use]
    pub const fn tree(&self) -> &'t Tree {
        self.tree
    }

    /// The run's own bytes.
    #[must_use]
    pub fn data(&self) -> &'t [u8] {
        self.text.data()
    }

    /// The source slice for verbatim runs, the run's own bytes otherwise.
    #[must_use]
    pub fn bytes(&self) -> Cow<'t, [u8]> {
        let content = self
            .tree
            .get(self.id)
            .map_or(Content::Synthesized, |s| s.content());
        Cow::Borrowed(self.tree.slice(content).unwrap_or_else(|| self.text.data()))
    }

    /// [`TextRef::bytes`] decoded as UTF-8 (lossily).
    #[must_use]
    pub fn string(&self) -> Cow<'t, str> {
        match self.bytes() {
            Cow::Borrowed(raw) => String::from_utf8_lossy(raw),
            Cow::Owned(raw) => Cow::Owned(String::from_utf8_lossy(&raw).into_owned()),
        }
    }

    /// The owning tag.
    #[must_use]
    pub fn parent(&self) -> Option<TagRef<'t>> {
        self.tree.parent(self.id).and_then(|p| self.tree.tag(p))
    }

    /// Position among the parent's children.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        index_in_parent(self.tree, self.id)
    }
}

impl std::fmt::Display for TextRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.string())
    }
}

impl<'t> NodeRef<'t> {
    /// The handle of the segment.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        match self {
            Self::Tag(tag) => tag.id,
            Self::Text(text) => text.id,
        }
    }

    /// The tag view, if this is a tag.
    #[must_use]
    pub const fn as_tag(&self) -> Option<TagRef<'t>> {
        match self {
            Self::Tag(tag) => Some(*tag),
            Self::Text(_) => None,
        }
    }

    /// The text view, if this is a text run.
    #[must_use]
    pub const fn as_text(&self) -> Option<TextRef<'t>> {
        match self {
            Self::Text(text) => Some(*text),
            Self::Tag(_) => None,
        }
    }

    /// Raw or rendered bytes, whichever the segment's content allows.
    #[must_use]
    pub fn bytes(&self) -> Cow<'t, [u8]> {
        match self {
            Self::Tag(tag) => tag.bytes(),
            Self::Text(text) => text.bytes(),
        }
    }
}

fn index_in_parent(tree: &Tree, id: NodeId) -> Option<usize> {
    let parent = tree.parent(id)?;
    tree.children(parent).iter().position(|&c| c == id)
}

fn extract_into(tree: &Tree, id: NodeId, out: &mut Vec<u8>) {
    for &child in tree.children(id) {
        match tree.get(child).map(|s| s.kind()) {
            Some(SegmentKind::Text(text)) => {
                out.push(b' ');
                out.extend_from_slice(text.data());
            }
            Some(SegmentKind::Tag(tag)) if !tag.is_void() => extract_into(tree, child, out),
            _ => {}
        }
    }
}
