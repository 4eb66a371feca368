use std::fmt;

use indexmap::IndexMap;
use shard_common::Result;
use shard_dom::{NodeId, TagRef, Tree};

use crate::matcher::Matcher;
use crate::selector::Selector;

/// An ordered view of tags produced by a query.
///
/// A set borrows its tree and owns nothing but handles. It may contain the
/// same tag more than once when searches over nested tags overlap.
#[derive(Debug, Clone)]
pub struct TagSet<'t> {
    tree: &'t Tree,
    tags: Vec<NodeId>,
}

impl<'t> TagSet<'t> {
    /// A set of `tags` from `tree`. Handles that do not name a tag are dropped.
    #[must_use]
    pub fn new(tree: &'t Tree, tags: impl IntoIterator<Item = NodeId>) -> Self {
        let tags = tags
            .into_iter()
            .filter(|&id| tree.as_tag(id).is_some())
            .collect();
        Self { tree, tags }
    }

    /// The tree the tags belong to.
    #[must_use]
    pub const fn tree(&self) -> &'t Tree {
        self.tree
    }

    /// Search every tag's subtree, the tag itself included, for tags that
    /// satisfy every condition of `filter`.
    ///
    /// See [`Matcher::condition`] for what a condition checks.
    #[must_use]
    pub fn find<I, K, V>(&self, filter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let matcher = Matcher::filter(filter);
        self.find_with(|tag| matcher.matches(tag))
    }

    /// Pre-order search of every tag's subtree, the tag itself included.
    ///
    /// Results are concatenated per starting tag, in document order. A tag
    /// that fails `keep` is still searched below.
    #[must_use]
    pub fn find_with<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(TagRef<'t>) -> bool,
    {
        let tree = self.tree;
        let found = self
            .tags
            .iter()
            .flat_map(|&start| tree.descendants(start))
            .filter(|&id| tree.tag(id).is_some_and(&mut keep))
            .collect();
        self.with_tags(found)
    }

    /// Search for tags named `name`.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Self {
        self.find([("tagName", name)])
    }

    /// Search for tags carrying `class`.
    #[must_use]
    pub fn find_by_class(&self, class: &str) -> Self {
        self.find_with(|tag| tag.has_class(class))
    }

    /// Apply `selector` to this set; malformed selectors give an empty set.
    ///
    /// The syntax error is logged at debug level. Use
    /// [`TagSet::try_find_by_css_selector`] to get it back instead.
    #[must_use]
    pub fn find_by_css_selector(&self, selector: &str) -> Self {
        self.try_find_by_css_selector(selector).unwrap_or_else(|err| {
            log::debug!(target: "shard", "ignoring selector: {err}");
            self.with_tags(Vec::new())
        })
    }

    /// Apply `selector` to this set.
    ///
    /// # Errors
    ///
    /// [`shard_common::Error::Syntax`] when the selector does not compile.
    pub fn try_find_by_css_selector(&self, selector: &str) -> Result<Self> {
        let selector = Selector::parse(selector)?;
        Ok(self.select(selector.matcher()))
    }

    /// Apply a matcher to this set.
    #[must_use]
    pub fn select(&self, matcher: &Matcher) -> Self {
        self.with_tags(matcher.apply(self.tree, &self.tags))
    }

    /// Turn every tag into another one; `None` results are dropped.
    #[must_use]
    pub fn map<F>(&self, f: F) -> Self
    where
        F: FnMut(TagRef<'t>) -> Option<TagRef<'t>>,
    {
        let tags = self.iter().filter_map(f).map(|tag| tag.id()).collect();
        self.with_tags(tags)
    }

    /// All tags, in order.
    #[must_use]
    pub fn all(&self) -> Vec<TagRef<'t>> {
        self.iter().collect()
    }

    /// The raw handles, in order.
    #[must_use]
    pub fn ids(&self) -> &[NodeId] {
        &self.tags
    }

    /// The first tag.
    #[must_use]
    pub fn first(&self) -> Option<TagRef<'t>> {
        self.iter().next()
    }

    /// Number of tags, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Whether the set holds no tag.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Iterate over the tags.
    pub fn iter(&self) -> impl Iterator<Item = TagRef<'t>> + use<'_, 't> {
        let tree = self.tree;
        self.tags.iter().filter_map(move |&id| tree.tag(id))
    }

    /// Whether `tag` is in the set.
    #[must_use]
    pub fn has_tag(&self, tag: NodeId) -> bool {
        self.tags.contains(&tag)
    }

    /// Look up `names` on every tag, with the pseudo-attributes `tagName`
    /// and `content` available. Missing attributes read as `""`.
    #[must_use]
    pub fn get_attributes(&self, names: &[&str]) -> Vec<IndexMap<String, String>> {
        self.iter()
            .map(|tag| {
                names
                    .iter()
                    .map(|&name| (name.to_string(), tag.get_attribute(name).into_owned()))
                    .collect()
            })
            .collect()
    }

    fn with_tags(&self, tags: Vec<NodeId>) -> Self {
        Self {
            tree: self.tree,
            tags,
        }
    }
}

/// The concatenated verbatim strings of every tag.
impl fmt::Display for TagSet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for tag in self.iter() {
            f.write_str(&tag.string())?;
        }
        Ok(())
    }
}

impl<'t> IntoIterator for &TagSet<'t> {
    type Item = TagRef<'t>;
    type IntoIter = std::vec::IntoIter<TagRef<'t>>;

    fn into_iter(self) -> Self::IntoIter {
        self.all().into_iter()
    }
}
