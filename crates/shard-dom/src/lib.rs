//! Offset-addressed document tree for the shard parser.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all
//! relationships, providing O(1) access and traversal without borrow checker
//! issues. Every arena entry is a [`Segment`]: the positional envelope that
//! gives a tag or text run its parent link, its siblings, and its place in the
//! source buffer.
//!
//! Freshly parsed segments address the source buffer directly
//! ([`Content::Verbatim`]). Once a subtree is edited, the affected segments
//! switch to [`Content::Synthesized`] and are read back through the
//! serializer instead of by slicing the buffer.
//!
//! Arena slots are never reused. A handle to a deleted node keeps resolving,
//! it is simply no longer reachable from the root.

mod mutation;
mod serialize;
mod view;
mod void;

use std::ops::Range;

use indexmap::{IndexMap, IndexSet};
use shard_common::{Error, Result};

pub use view::{NodeRef, TagRef, TextRef};
pub use void::{VOID_ELEMENTS, is_single_tag};

/// Map of attribute names to values for a tag, in source order.
pub type AttributesMap = IndexMap<String, String>;

/// Set of class names for a tag, in source order.
pub type ClassSet = IndexSet<String>;

/// A type-safe index into the segment arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where the bytes of a segment come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Content {
    /// Half-open byte range `[offset, limit)` into the tree's source buffer.
    Verbatim {
        /// First byte of the segment.
        offset: usize,
        /// One past the last byte of the segment.
        limit: usize,
    },
    /// Created or edited by a mutation; rebuilt by the serializer.
    Synthesized,
}

impl Content {
    /// The source range, if the segment still addresses the buffer.
    #[must_use]
    pub const fn range(&self) -> Option<Range<usize>> {
        match *self {
            Self::Verbatim { offset, limit } => Some(offset..limit),
            Self::Synthesized => None,
        }
    }

    /// Whether the segment still addresses the buffer.
    #[must_use]
    pub const fn is_verbatim(&self) -> bool {
        matches!(self, Self::Verbatim { .. })
    }
}

/// An element: name, attributes, class set and the void flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    name: String,
    attrs: AttributesMap,
    classes: ClassSet,
    void: bool,
}

impl Tag {
    /// Create a tag with no attributes. The void flag follows [`is_single_tag`].
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let void = is_single_tag(&name);
        Self {
            name,
            attrs: AttributesMap::new(),
            classes: ClassSet::new(),
            void,
        }
    }

    /// Override the void flag (used when the caller extends the void set).
    #[must_use]
    pub const fn with_void(mut self, void: bool) -> Self {
        self.void = void;
        self
    }

    /// The tag name as written in the source.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the tag has no closing tag and no children.
    #[must_use]
    pub const fn is_void(&self) -> bool {
        self.void
    }

    /// All attributes, in the order they were first set.
    #[must_use]
    pub const fn attributes(&self) -> &AttributesMap {
        &self.attrs
    }

    /// The class set derived from the `class` attribute.
    #[must_use]
    pub const fn classes(&self) -> &ClassSet {
        &self.classes
    }

    /// Look up a real attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// The `id` attribute, if present.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attribute("id")
    }

    /// Whether `class` is one of the tag's classes.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    /// Set an attribute, returning the previous value.
    ///
    /// Setting `class` re-derives the class set from the new value.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = value.into();
        if name == "class" {
            self.classes = split_classes(&value);
        }
        self.attrs.insert(name, value)
    }

    /// Remove an attribute, returning its value.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        if name == "class" {
            self.classes.clear();
        }
        self.attrs.shift_remove(name)
    }
}

/// Split a `class` value on spaces into trimmed, non-empty class names.
fn split_classes(value: &str) -> ClassSet {
    value
        .split(' ')
        .map(str::trim)
        .filter(|class| !class.is_empty())
        .map(str::to_string)
        .collect()
}

/// An opaque content run. Comments and unrecognised markup end up here too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    data: Vec<u8>,
}

impl Text {
    /// Create a text run from owned or copied bytes.
    #[must_use]
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }

    /// The raw bytes of the run.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The run with surrounding ASCII whitespace removed.
    #[must_use]
    pub fn trimmed(&self) -> &[u8] {
        self.data.trim_ascii()
    }
}

/// What a segment holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentKind {
    /// An element.
    Tag(Tag),
    /// A content run.
    Text(Text),
}

/// The positional envelope of a tag or text run.
///
/// Stores indices for parent/child/sibling relationships, enabling O(1)
/// traversal in any direction, plus the segment's [`Content`].
#[derive(Debug, Clone)]
pub struct Segment {
    kind: SegmentKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    next_sibling: Option<NodeId>,
    prev_sibling: Option<NodeId>,
    content: Content,
}

impl Segment {
    /// What this segment holds.
    #[must_use]
    pub const fn kind(&self) -> &SegmentKind {
        &self.kind
    }

    /// The owning tag, `None` for the root and for detached segments.
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child segments in document order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Where the segment's bytes come from.
    #[must_use]
    pub const fn content(&self) -> Content {
        self.content
    }

    /// The tag, if this segment holds one.
    #[must_use]
    pub const fn as_tag(&self) -> Option<&Tag> {
        match &self.kind {
            SegmentKind::Tag(tag) => Some(tag),
            SegmentKind::Text(_) => None,
        }
    }

    /// The text run, if this segment holds one.
    #[must_use]
    pub const fn as_text(&self) -> Option<&Text> {
        match &self.kind {
            SegmentKind::Text(text) => Some(text),
            SegmentKind::Tag(_) => None,
        }
    }
}

/// A parsed document: the immutable source buffer and the segment arena.
///
/// The root tag is always allocated first, so [`NodeId::ROOT`] is its handle.
#[derive(Debug, Clone)]
pub struct Tree {
    source: Box<[u8]>,
    segments: Vec<Segment>,
}

impl NodeId {
    /// The root tag is always at index 0.
    pub const ROOT: Self = Self(0);
}

impl Tree {
    /// Create a tree whose root tag spans the whole source buffer.
    #[must_use]
    pub fn new(source: impl Into<Box<[u8]>>, root: Tag) -> Self {
        let source = source.into();
        let root = Segment {
            kind: SegmentKind::Tag(root),
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
            content: Content::Verbatim {
                offset: 0,
                limit: source.len(),
            },
        };
        Self {
            source,
            segments: vec![root],
        }
    }

    /// The bytes the tree was parsed from.
    #[must_use]
    pub fn source(&self) -> &[u8] {
        &self.source
    }

    /// Get the root tag ID.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a segment by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Segment> {
        self.segments.get(id.0)
    }

    /// Get a segment by its ID, or [`Error::UnknownNode`].
    ///
    /// # Errors
    ///
    /// Fails when `id` was not allocated by this tree.
    pub fn segment(&self, id: NodeId) -> Result<&Segment> {
        self.get(id).ok_or(Error::UnknownNode { node: id.0 })
    }

    /// Number of allocated segments, detached ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false: a tree holds at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Allocate a new segment and return its ID.
    /// The segment is not yet attached to the tree.
    pub fn alloc(&mut self, kind: SegmentKind, content: Content) -> NodeId {
        let id = NodeId(self.segments.len());
        self.segments.push(Segment {
            kind,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
            content,
        });
        id
    }

    /// Appends `child` as the last child of `parent`, updating all relationships.
    ///
    /// # Panics
    ///
    /// Panics if either ID was not allocated by this tree.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let index = self.segments[parent.0].children.len();
        self.insert_child(parent, index, child);
    }

    /// Inserts `child` at `index` in `parent`'s children (clamped to the end).
    ///
    /// # Panics
    ///
    /// Panics if either ID was not allocated by this tree.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        let children = &mut self.segments[parent.0].children;
        let index = index.min(children.len());
        children.insert(index, child);
        self.segments[child.0].parent = Some(parent);
        self.relink(parent, index.saturating_sub(1), index + 2);
    }

    /// Detaches `child` from `parent`. Returns false if it was not a child.
    ///
    /// # Panics
    ///
    /// Panics if `parent` was not allocated by this tree.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let Some(index) = self.position_in_parent(parent, child) else {
            return false;
        };
        let _ = self.segments[parent.0].children.remove(index);
        let removed = &mut self.segments[child.0];
        removed.parent = None;
        removed.prev_sibling = None;
        removed.next_sibling = None;
        self.relink(parent, index.saturating_sub(1), index + 1);
        true
    }

    /// Replaces `child` in `parent` with `child`'s own children, in order.
    /// The promoted children are re-parented to `parent`.
    ///
    /// # Panics
    ///
    /// Panics if either ID was not allocated by this tree.
    pub fn replace_with_children(&mut self, parent: NodeId, child: NodeId) -> bool {
        let Some(index) = self.position_in_parent(parent, child) else {
            return false;
        };
        let promoted = std::mem::take(&mut self.segments[child.0].children);
        for &grandchild in &promoted {
            self.segments[grandchild.0].parent = Some(parent);
        }
        let count = promoted.len();
        let _ = self.segments[parent.0]
            .children
            .splice(index..=index, promoted);

        let removed = &mut self.segments[child.0];
        removed.parent = None;
        removed.prev_sibling = None;
        removed.next_sibling = None;
        self.relink(parent, index.saturating_sub(1), index + count + 1);
        true
    }

    /// Set the end of a verbatim segment. Synthesized segments are left alone.
    pub fn set_limit(&mut self, id: NodeId, limit: usize) {
        if let Some(segment) = self.segments.get_mut(id.0)
            && let Content::Verbatim { limit: end, .. } = &mut segment.content
        {
            *end = limit;
        }
    }

    /// Recompute sibling links for `parent`'s children in `[from, to)`.
    fn relink(&mut self, parent: NodeId, from: usize, to: usize) {
        let to = to.min(self.segments[parent.0].children.len());
        for i in from..to {
            let children = &self.segments[parent.0].children;
            let id = children[i];
            let prev = i.checked_sub(1).map(|p| children[p]);
            let next = children.get(i + 1).copied();
            let segment = &mut self.segments[id.0];
            segment.prev_sibling = prev;
            segment.next_sibling = next;
        }
    }

    fn position_in_parent(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.children(parent).iter().position(|&c| c == child)
    }

    /// Get the parent of a segment.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|s| s.parent)
    }

    /// Get all children of a segment.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |s| s.children.as_slice())
    }

    /// Get the next sibling of a segment.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|s| s.next_sibling)
    }

    /// Get the previous sibling of a segment.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|s| s.prev_sibling)
    }

    /// Whether the segment is the root or still hangs below it.
    #[must_use]
    pub fn is_attached(&self, id: NodeId) -> bool {
        id == NodeId::ROOT || self.ancestors(id).any(|a| a == NodeId::ROOT)
    }

    /// Iterate over all ancestors of a segment, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Iterate over following siblings (from immediately after to last child).
    #[must_use]
    pub fn following_siblings(&self, id: NodeId) -> SiblingIterator<'_> {
        SiblingIterator {
            tree: self,
            current: self.next_sibling(id),
            forward: true,
        }
    }

    /// Iterate over preceding siblings (from immediately before to first child).
    #[must_use]
    pub fn preceding_siblings(&self, id: NodeId) -> SiblingIterator<'_> {
        SiblingIterator {
            tree: self,
            current: self.prev_sibling(id),
            forward: false,
        }
    }

    /// Pre-order iteration over `id` and everything below it.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> DescendantIterator<'_> {
        DescendantIterator {
            tree: self,
            stack: vec![id],
        }
    }

    /// Get tag data if this segment is a tag.
    #[must_use]
    pub fn as_tag(&self, id: NodeId) -> Option<&Tag> {
        self.get(id).and_then(Segment::as_tag)
    }

    /// Get the text run if this segment is text.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&Text> {
        self.get(id).and_then(Segment::as_text)
    }

    pub(crate) fn as_tag_mut(&mut self, id: NodeId) -> Option<&mut Tag> {
        match self.segments.get_mut(id.0).map(|s| &mut s.kind) {
            Some(SegmentKind::Tag(tag)) => Some(tag),
            _ => None,
        }
    }

    pub(crate) fn set_content(&mut self, id: NodeId, content: Content) {
        if let Some(segment) = self.segments.get_mut(id.0) {
            segment.content = content;
        }
    }
}

/// Iterator over ancestors of a segment.
pub struct AncestorIterator<'a> {
    tree: &'a Tree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Iterator over the siblings on one side of a segment.
pub struct SiblingIterator<'a> {
    tree: &'a Tree,
    current: Option<NodeId>,
    forward: bool,
}

impl Iterator for SiblingIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = if self.forward {
            self.tree.next_sibling(id)
        } else {
            self.tree.prev_sibling(id)
        };
        Some(id)
    }
}

/// Pre-order iterator over a subtree, the starting segment first.
pub struct DescendantIterator<'a> {
    tree: &'a Tree,
    stack: Vec<NodeId>,
}

impl Iterator for DescendantIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
