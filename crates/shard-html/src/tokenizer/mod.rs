//! Lexer module.
//!
//! The lexer does not know about nesting: it only cuts the buffer into tag
//! markup and text runs, keeping quoted attribute values intact.

/// Classification helpers for raw segments.
pub mod helpers;
/// `read_segment` and the [`Tokenizer`] iterator.
pub mod lexer;
/// Token types produced by the tokenizer.
pub mod token;

pub use helpers::{is_close_tag, is_open_tag, is_tag, read_tag_name, read_word, wrapped_by};
pub use lexer::{Tokenizer, read_segment};
pub use shard_dom::is_single_tag;
pub use token::{Token, TokenKind};
