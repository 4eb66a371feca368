//! Tree construction from lexer segments.

/// Parsing of the attribute part of an opening tag.
pub mod attributes;
/// The tree builder.
pub mod builder;

pub use attributes::parse_tag;
pub use builder::{HTMLParser, IssueKind, ParseIssue, parse};
