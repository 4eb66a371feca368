use std::fmt;
use std::sync::Arc;

use indexmap::IndexSet;
use shard_dom::{NodeId, TagRef, Tree};

/// A caller-supplied test on a single tag.
#[derive(Clone)]
pub struct Predicate(Arc<dyn Fn(TagRef<'_>) -> bool + Send + Sync>);

impl Predicate {
    /// Wrap a closure.
    #[must_use]
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(TagRef<'_>) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Run the test.
    #[must_use]
    pub fn test(&self, tag: TagRef<'_>) -> bool {
        (self.0)(tag)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

/// Two predicates are equal only when they share the same closure.
impl PartialEq for Predicate {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Predicate {}

/// A step that turns one set of tags into another.
///
/// Filter variants keep the tags that satisfy them, in input order.
/// Structural variants replace every tag by related tags, de-duplicated in
/// first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    /// Keep tags with this exact name.
    ByName(String),
    /// Keep tags carrying this class.
    ByClass(String),
    /// Keep tags whose `id` equals this value.
    ById(String),
    /// Keep tags that have the attribute, and, when `value` is set, whose
    /// attribute equals it exactly.
    Attribute {
        /// Attribute name.
        name: String,
        /// Required value; `None` only checks presence.
        value: Option<String>,
    },
    /// Keep tags accepted by a closure.
    Predicate(Predicate),
    /// Replace with every tag below, at any depth.
    Descendant,
    /// Replace with the direct child tags.
    Child,
    /// Replace with every later sibling tag.
    FollowingSibling,
    /// Run the steps in order, each on the previous step's output.
    And(Vec<Self>),
    /// Union of the alternatives, each applied to the same input.
    Or(Vec<Self>),
}

impl Matcher {
    /// Compile a single `attr` / `value` condition.
    ///
    /// - `tagName` compares the tag name;
    /// - `class` checks class membership, with `value` trimmed;
    /// - anything else looks up the attribute, an empty `value` meaning
    ///   "present with any value".
    #[must_use]
    pub fn condition(attr: &str, value: &str) -> Self {
        match attr {
            "tagName" => Self::ByName(value.to_string()),
            "class" => Self::ByClass(value.trim().to_string()),
            _ => Self::Attribute {
                name: attr.to_string(),
                value: (!value.is_empty()).then(|| value.to_string()),
            },
        }
    }

    /// Compile a filter: every condition must hold.
    #[must_use]
    pub fn filter<I, K, V>(conditions: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        Self::And(
            conditions
                .into_iter()
                .map(|(attr, value)| Self::condition(attr.as_ref(), value.as_ref()))
                .collect(),
        )
    }

    /// Wrap a closure as a filter step.
    #[must_use]
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(TagRef<'_>) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Predicate::new(f))
    }

    /// Whether the matcher only filters and never replaces the set.
    #[must_use]
    pub fn is_filter(&self) -> bool {
        match self {
            Self::Descendant | Self::Child | Self::FollowingSibling => false,
            Self::And(steps) | Self::Or(steps) => steps.iter().all(Self::is_filter),
            _ => true,
        }
    }

    /// Whether applying the matcher to `tag` alone keeps `tag`.
    #[must_use]
    pub fn matches(&self, tag: TagRef<'_>) -> bool {
        let data = tag.tag();
        match self {
            Self::ByName(name) => data.name() == name,
            Self::ByClass(class) => data.has_class(class),
            Self::ById(id) => data.id() == Some(id.as_str()),
            Self::Attribute { name, value } => data
                .attribute(name)
                .is_some_and(|stored| value.as_deref().is_none_or(|wanted| wanted == stored)),
            Self::Predicate(predicate) => predicate.test(tag),
            Self::Descendant | Self::Child | Self::FollowingSibling => false,
            Self::And(steps) if self.is_filter() => steps.iter().all(|step| step.matches(tag)),
            Self::Or(alternatives) if self.is_filter() => {
                alternatives.iter().any(|alt| alt.matches(tag))
            }
            Self::And(_) | Self::Or(_) => self.apply(tag.tree(), &[tag.id()]).contains(&tag.id()),
        }
    }

    /// Apply the matcher to a set of tags.
    ///
    /// Handles that do not name a tag in `tree` are dropped.
    #[must_use]
    pub fn apply(&self, tree: &Tree, input: &[NodeId]) -> Vec<NodeId> {
        match self {
            Self::Descendant => collect_unique(
                input.iter().flat_map(|&id| tree.descendants(id).skip(1)),
                tree,
            ),
            Self::Child => collect_unique(
                input.iter().flat_map(|&id| tree.children(id).iter().copied()),
                tree,
            ),
            Self::FollowingSibling => collect_unique(
                input.iter().flat_map(|&id| tree.following_siblings(id)),
                tree,
            ),
            Self::And(steps) => steps
                .iter()
                .fold(input.to_vec(), |current, step| step.apply(tree, &current)),
            Self::Or(alternatives) => {
                let mut union = IndexSet::new();
                for alternative in alternatives {
                    union.extend(alternative.apply(tree, input));
                }
                union.into_iter().collect()
            }
            _ => input
                .iter()
                .copied()
                .filter(|&id| tree.tag(id).is_some_and(|tag| self.matches(tag)))
                .collect(),
        }
    }
}

/// Keep tags only, first occurrence wins.
fn collect_unique(ids: impl Iterator<Item = NodeId>, tree: &Tree) -> Vec<NodeId> {
    let unique: IndexSet<NodeId> = ids.filter(|&id| tree.as_tag(id).is_some()).collect();
    unique.into_iter().collect()
}

/// Check a single condition against a tag; see [`Matcher::condition`].
#[must_use]
pub fn check_by_condition(tag: TagRef<'_>, attr: &str, value: &str) -> bool {
    Matcher::condition(attr, value).matches(tag)
}
