//! Lexer and tree builder for HTML-like markup.
//!
//! # Scope
//!
//! This crate implements:
//! - **Lexer** ([`tokenizer`])
//!   - Quote-aware segmentation of a byte buffer into tags and text runs
//!   - Classification helpers (`is_open_tag`, `is_close_tag`, `read_tag_name`, ...)
//!
//! - **Tree Builder** ([`parser`])
//!   - Stack of open tags with mismatch recovery
//!   - Attribute and class parsing
//!   - Recovery issues collected alongside the tree
//!
//! # Not Implemented
//!
//! - Entity decoding
//! - Raw-text modes for `script` / `style`
//! - Implied tags (`<html>`, `<body>`, `<tbody>` ...)
//! - DOCTYPE and comment handling beyond keeping them as opaque text

/// Stack-based tree builder.
pub mod parser;
/// Quote-aware lexer producing tag and text segments.
pub mod tokenizer;

pub use parser::{HTMLParser, IssueKind, ParseIssue, parse};
pub use tokenizer::{Token, TokenKind, Tokenizer, read_segment};
