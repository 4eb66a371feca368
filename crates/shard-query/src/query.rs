use shard_common::Result;
use shard_dom::{TagRef, Tree};

use crate::tag_set::TagSet;

/// Query entry points for anything that can act as a starting set.
///
/// A [`Tree`] starts from its root, a [`TagRef`] from the tag itself. Every
/// method is a shorthand for the same method on [`Query::to_tag_set`].
pub trait Query<'t>: Copy {
    /// The starting set.
    fn to_tag_set(self) -> TagSet<'t>;

    /// See [`TagSet::find`].
    fn find<I, K, V>(self, filter: I) -> TagSet<'t>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.to_tag_set().find(filter)
    }

    /// See [`TagSet::find_with`].
    fn find_with<F>(self, keep: F) -> TagSet<'t>
    where
        F: FnMut(TagRef<'t>) -> bool,
    {
        self.to_tag_set().find_with(keep)
    }

    /// See [`TagSet::find_by_name`].
    fn find_by_name(self, name: &str) -> TagSet<'t> {
        self.to_tag_set().find_by_name(name)
    }

    /// See [`TagSet::find_by_class`].
    fn find_by_class(self, class: &str) -> TagSet<'t> {
        self.to_tag_set().find_by_class(class)
    }

    /// See [`TagSet::find_by_css_selector`].
    fn find_by_css_selector(self, selector: &str) -> TagSet<'t> {
        self.to_tag_set().find_by_css_selector(selector)
    }

    /// See [`TagSet::try_find_by_css_selector`].
    ///
    /// # Errors
    ///
    /// [`shard_common::Error::Syntax`] when the selector does not compile.
    fn try_find_by_css_selector(self, selector: &str) -> Result<TagSet<'t>> {
        self.to_tag_set().try_find_by_css_selector(selector)
    }
}

impl<'t> Query<'t> for &'t Tree {
    fn to_tag_set(self) -> TagSet<'t> {
        TagSet::new(self, [self.root()])
    }
}

impl<'t> Query<'t> for TagRef<'t> {
    fn to_tag_set(self) -> TagSet<'t> {
        TagSet::new(self.tree(), [self.id()])
    }
}
