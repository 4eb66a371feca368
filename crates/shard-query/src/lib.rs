//! Querying shard document trees.
//!
//! Two ways in, one evaluator:
//! - condition filters (`tagName`, `class`, any attribute) searched over a
//!   subtree, see [`Query::find`];
//! - selector strings such as `div#main > p.note, a[href]`, applied to a set
//!   of tags, see [`Query::find_by_css_selector`].
//!
//! Both compile to a [`Matcher`].

mod matcher;
mod query;
mod selector;
mod tag_set;

pub use matcher::{Matcher, Predicate, check_by_condition};
pub use query::Query;
pub use selector::{Combinator, Selector};
pub use tag_set::TagSet;
