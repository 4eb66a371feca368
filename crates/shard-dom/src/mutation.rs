//! Position-based structural edits.
//!
//! Every edit switches the edited tag and all of its ancestors to
//! [`Content::Synthesized`]: their source ranges no longer describe what they
//! contain. Siblings and untouched subtrees keep their verbatim ranges.
//!
//! A failing call leaves the tree exactly as it was.

use shard_common::{Error, Result};

use crate::{Content, NodeId, SegmentKind, Tag, Text, Tree};

impl Tree {
    /// Insert a text run into `parent` at `position`.
    ///
    /// `position` is clamped into `[0, children.len()]`: `children.len()`
    /// appends, anything larger lands at the last index.
    ///
    /// # Errors
    ///
    /// [`Error::NoSpaceToWrite`] if `parent` is void, [`Error::NotATag`] if it
    /// is a text run, [`Error::UnknownNode`] if it does not exist.
    pub fn write_text(
        &mut self,
        parent: NodeId,
        position: usize,
        data: impl Into<Vec<u8>>,
    ) -> Result<NodeId> {
        self.writable(parent)?;
        let text = self.alloc(SegmentKind::Text(Text::new(data)), Content::Synthesized);
        self.splice(parent, position, text);
        Ok(text)
    }

    /// Insert an empty tag named `name` into `parent` at `position`.
    ///
    /// The new tag is void when `name` is a void element.
    ///
    /// # Errors
    ///
    /// Same as [`Tree::write_text`].
    pub fn write_tag(&mut self, parent: NodeId, position: usize, name: &str) -> Result<NodeId> {
        self.writable(parent)?;
        let tag = self.alloc(SegmentKind::Tag(Tag::new(name)), Content::Synthesized);
        self.splice(parent, position, tag);
        Ok(tag)
    }

    /// Remove `node` from its parent.
    ///
    /// With `promote_children` the node's children take its place in the
    /// parent, in order. Otherwise the whole subtree is dropped. Text runs have
    /// no children, so the flag makes no difference for them.
    ///
    /// # Errors
    ///
    /// [`Error::RootUndeletable`] for the root, [`Error::Detached`] for a node
    /// that was already removed or sits in a removed subtree,
    /// [`Error::UnknownNode`] for a foreign handle.
    pub fn delete(&mut self, node: NodeId, promote_children: bool) -> Result<()> {
        let segment = self.segment(node)?;
        if node == NodeId::ROOT {
            return Err(Error::RootUndeletable {
                tag: self.root_tag().name().to_string(),
            });
        }
        let Some(parent) = segment.parent().filter(|_| self.is_attached(node)) else {
            return Err(Error::Detached { node: node.0 });
        };

        let removed = if promote_children {
            self.replace_with_children(parent, node)
        } else {
            self.remove_child(parent, node)
        };
        if removed {
            log::debug!(target: "shard", "deleted {node} from {parent} (promote: {promote_children})");
            self.mark_synthesized(parent);
        }
        Ok(())
    }

    /// Set an attribute on a tag, returning the previous value.
    ///
    /// # Errors
    ///
    /// [`Error::NotATag`] / [`Error::UnknownNode`] when `tag` is not a tag.
    pub fn set_attribute(
        &mut self,
        tag: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Option<String>> {
        let _ = self.expect_tag(tag)?;
        let previous = self
            .as_tag_mut(tag)
            .and_then(|data| data.set_attribute(name, value));
        self.mark_synthesized(tag);
        Ok(previous)
    }

    /// Remove an attribute from a tag, returning its value.
    ///
    /// # Errors
    ///
    /// [`Error::NotATag`] / [`Error::UnknownNode`] when `tag` is not a tag.
    pub fn remove_attribute(&mut self, tag: NodeId, name: &str) -> Result<Option<String>> {
        let _ = self.expect_tag(tag)?;
        let previous = self
            .as_tag_mut(tag)
            .and_then(|data| data.remove_attribute(name));
        if previous.is_some() {
            self.mark_synthesized(tag);
        }
        Ok(previous)
    }

    fn expect_tag(&self, id: NodeId) -> Result<&Tag> {
        match self.segment(id)?.kind() {
            SegmentKind::Tag(tag) => Ok(tag),
            SegmentKind::Text(text) => Err(Error::NotATag {
                markup: String::from_utf8_lossy(text.data()).into_owned(),
            }),
        }
    }

    fn writable(&self, parent: NodeId) -> Result<()> {
        let tag = self.expect_tag(parent)?;
        if tag.is_void() {
            return Err(Error::NoSpaceToWrite {
                tag: tag.name().to_string(),
            });
        }
        Ok(())
    }

    fn splice(&mut self, parent: NodeId, position: usize, child: NodeId) {
        let len = self.children(parent).len();
        let position = if position > len {
            len.saturating_sub(1)
        } else {
            position
        };
        self.insert_child(parent, position, child);
        log::debug!(target: "shard", "wrote {child} into {parent} at {position}");
        self.mark_synthesized(parent);
    }

    /// Switch `from` and every ancestor to synthesized content.
    fn mark_synthesized(&mut self, from: NodeId) {
        let chain: Vec<NodeId> = std::iter::once(from).chain(self.ancestors(from)).collect();
        for id in chain {
            self.set_content(id, Content::Synthesized);
        }
    }
}
