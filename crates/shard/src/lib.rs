//! Parse, query and rewrite HTML-like fragments.
//!
//! # Scope
//!
//! This crate ties the shard components together:
//! - **Parsing** - forgiving lexer and tree builder, see [`parse`] and [`html`]
//! - **Document Model** - offset-addressed tree with verbatim reads, see [`dom`]
//! - **Querying** - condition filters and selectors, see [`Query`]
//! - **Mutation** - insert, delete and re-attribute nodes, then [`Tree::modify`]
//!
//! ```
//! use shard::Query;
//!
//! let mut tree = shard::parse(r#"<div id="x"><p class="a">A</p><p>B</p></div>"#)?;
//! let notes = tree.find_by_css_selector("#x > p.a");
//! assert_eq!(notes.to_string(), r#"<p class="a">A</p>"#);
//!
//! let ids = notes.ids().to_vec();
//! for id in ids {
//!     tree.delete(id, true)?;
//! }
//! assert_eq!(tree.modify(), r#"<div id="x">A<p>B</p></div>"#);
//! # Ok::<(), shard::Error>(())
//! ```
//!
//! # Not Implemented
//!
//! - Entity decoding and raw-text elements (`<script>`, `<style>`)
//! - Implied tags beyond closing whatever a close tag skips over
//! - Reading from files or the network; input is one decoded buffer

pub use shard_common as common;
pub use shard_dom as dom;
pub use shard_html as html;
pub use shard_query as query;

pub use shard_common::{Error, Result};
pub use shard_dom::{Content, NodeId, NodeRef, Tag, TagRef, Text, TextRef, Tree};
pub use shard_html::{HTMLParser, IssueKind, ParseIssue, parse};
pub use shard_query::{Matcher, Query, Selector, TagSet};
