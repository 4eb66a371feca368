//! Errors shared by the lexer, tree builder, query engine and mutation API.
//!
//! Malformed markup never surfaces here: the tree builder recovers from it.
//! The variants below are reserved for caller mistakes (empty input, bad
//! handles, writes into void tags) and for selector text that does not
//! compile.

/// Errors that can occur while parsing, querying or editing a document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The input buffer was empty.
    #[error("the document to be parsed must not be empty")]
    EmptyInput,

    /// Bracketed content that does not start with a readable tag name.
    #[error("`{markup}` is not a tag")]
    NotATag {
        /// The offending markup, lossily decoded.
        markup: String,
    },

    /// The lexer was asked to read at or past the last byte of the buffer.
    #[error("offset {offset} is out of range for a buffer of {len} bytes")]
    OutOfRange {
        /// Requested cursor position.
        offset: usize,
        /// Length of the buffer being scanned.
        len: usize,
    },

    /// A node was written into a void tag.
    #[error("<{tag}> is a void tag and has no space to write in")]
    NoSpaceToWrite {
        /// Name of the void tag.
        tag: String,
    },

    /// The root tag of a tree cannot be deleted.
    #[error("can't delete the root tag <{tag}>")]
    RootUndeletable {
        /// Name of the root tag.
        tag: String,
    },

    /// The node was already removed from its tree.
    #[error("node {node} is detached from the tree")]
    Detached {
        /// Arena index of the detached node.
        node: usize,
    },

    /// The handle was not allocated by this tree, or names the wrong kind of node.
    #[error("node {node} does not exist in this tree")]
    UnknownNode {
        /// Arena index that failed to resolve.
        node: usize,
    },

    /// The css style selector could not be compiled.
    #[error("selector syntax error at byte {position} in `{selector}`: {reason}")]
    Syntax {
        /// The full selector text.
        selector: String,
        /// Byte offset of the problem inside `selector`.
        position: usize,
        /// What was expected.
        reason: &'static str,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;
