use strum_macros::Display;

use shard_common::warning::warn_once;
use shard_common::{Error, Result};
use shard_dom::{Content, NodeId, SegmentKind, Tag, Text, Tree, is_single_tag};

use super::attributes::parse_tag;
use crate::tokenizer::{Token, TokenKind, Tokenizer, read_tag_name};

/// What kind of recovery the builder had to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum IssueKind {
    /// A close tag matched nothing on the stack and was kept as text.
    StrayCloseTag,
    /// A tag was closed by the close tag of one of its ancestors.
    ImplicitlyClosed,
    /// A tag was still open at the end of the buffer.
    Unterminated,
    /// Markup without a tag name (`<!DOCTYPE ...>`, `<!-- ... -->`) kept as text.
    NotATag,
    /// Content that could not be attached anywhere.
    DroppedText,
}

/// A recoverable oddity found while building the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// Human-readable description.
    pub message: String,
    /// Byte offset of the segment that triggered the issue.
    pub offset: usize,
    /// The kind of recovery performed.
    pub kind: IssueKind,
}

/// Builds a [`Tree`] from a byte buffer.
///
/// The first opening tag becomes the root and always spans the whole buffer,
/// so serializing an untouched root reproduces the input byte for byte.
/// Everything after it is attached to the tag on top of the stack of open
/// tags.
pub struct HTMLParser<'a> {
    buffer: &'a [u8],

    /// Names treated as void on top of the default set.
    void_elements: Vec<String>,

    /// Report recovery issues at `warn` level instead of `debug`.
    strict_mode: bool,

    /// `None` until the first opening tag has been seen.
    tree: Option<Tree>,

    /// Open, non-void tags; the innermost one is last.
    stack_of_open_tags: Vec<NodeId>,

    issues: Vec<ParseIssue>,
}

/// Parse `buffer` with the default configuration.
///
/// # Errors
///
/// [`Error::EmptyInput`] when `buffer` is empty. Malformed markup never fails.
pub fn parse(buffer: impl AsRef<[u8]>) -> Result<Tree> {
    HTMLParser::new(buffer.as_ref()).run()
}

impl<'a> HTMLParser<'a> {
    /// Create a parser over `buffer`.
    #[must_use]
    pub const fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            void_elements: Vec::new(),
            strict_mode: false,
            tree: None,
            stack_of_open_tags: Vec::new(),
            issues: Vec::new(),
        }
    }

    /// Treat these tag names as void as well (ASCII case-insensitive).
    #[must_use]
    pub fn with_void_elements<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.void_elements.extend(names.into_iter().map(Into::into));
        self
    }

    /// Enable strict mode - recovery issues are logged as warnings.
    #[must_use]
    pub const fn with_strict_mode(mut self) -> Self {
        self.strict_mode = true;
        self
    }

    /// Run the parser and return the tree.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyInput`] when the buffer is empty.
    pub fn run(self) -> Result<Tree> {
        self.run_with_issues().map(|(tree, _)| tree)
    }

    /// Run the parser and return both the tree and every recovery issue.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyInput`] when the buffer is empty.
    pub fn run_with_issues(mut self) -> Result<(Tree, Vec<ParseIssue>)> {
        if self.buffer.is_empty() {
            return Err(Error::EmptyInput);
        }

        let mut tokenizer = Tokenizer::new(self.buffer);
        for token in tokenizer.by_ref() {
            match token.kind {
                TokenKind::Open => self.process_open_tag(&token),
                TokenKind::Close => self.process_close_tag(&token),
                TokenKind::Text => self.process_text(&token),
            }
        }

        let rest = tokenizer.remainder();
        if !rest.trim_ascii().is_empty() {
            self.issue(
                IssueKind::DroppedText,
                tokenizer.offset(),
                format!("{} trailing bytes were not tokenized", rest.len()),
            );
        }
        self.close_remaining();

        let tree = self.tree.take().unwrap_or_else(|| {
            // No tag at all: a nameless root still spans the buffer.
            Tree::new(self.buffer, Tag::new(""))
        });
        log::debug!(target: "shard", "built tree with {} segments", tree.len());
        Ok((tree, self.issues))
    }

    fn is_void(&self, name: &str) -> bool {
        is_single_tag(name)
            || self
                .void_elements
                .iter()
                .any(|void| void.eq_ignore_ascii_case(name))
    }

    /// The innermost open tag, or the root once the root has been closed.
    /// A void root takes no children at all.
    fn current_tag(&self) -> Option<NodeId> {
        let tree = self.tree.as_ref()?;
        match self.stack_of_open_tags.last() {
            Some(&id) => Some(id),
            None if tree.root_tag().is_void() => None,
            None => Some(tree.root()),
        }
    }

    fn process_open_tag(&mut self, token: &Token<'_>) {
        let tag = match parse_tag(token.bytes) {
            Ok(tag) => tag,
            Err(err) => {
                self.issue(IssueKind::NotATag, token.offset, err.to_string());
                return self.process_text(token);
            }
        };
        let void = self.is_void(tag.name());
        let tag = tag.with_void(void);

        if self.tree.is_none() {
            // The first tag becomes the root.
            self.tree = Some(Tree::new(self.buffer, tag));
            if !void {
                self.stack_of_open_tags.push(NodeId::ROOT);
            }
            return;
        }
        let Some(parent) = self.current_tag() else {
            let name = tag.name().to_string();
            return self.issue(
                IssueKind::DroppedText,
                token.offset,
                format!("<{name}> follows a void root and was dropped"),
            );
        };
        let Some(tree) = self.tree.as_mut() else {
            return;
        };
        let id = tree.alloc(
            SegmentKind::Tag(tag),
            Content::Verbatim {
                offset: token.offset,
                limit: token.end(),
            },
        );
        tree.append_child(parent, id);
        if !void {
            self.stack_of_open_tags.push(id);
        }
    }

    fn process_close_tag(&mut self, token: &Token<'_>) {
        let Some(tree) = self.tree.as_ref() else {
            return self.process_text(token);
        };
        let name = read_tag_name(token.bytes).unwrap_or_default();
        let matched = self
            .stack_of_open_tags
            .iter()
            .rposition(|&id| tree.as_tag(id).is_some_and(|tag| tag.name() == name));

        let Some(depth) = matched else {
            self.issue(
                IssueKind::StrayCloseTag,
                token.offset,
                format!("</{name}> does not close any open tag"),
            );
            return self.process_text(token);
        };

        // Everything above the match ends where the close marker starts.
        let implicit = self.stack_of_open_tags.split_off(depth + 1);
        for id in implicit {
            let closed = self.tag_name(id);
            self.issue(
                IssueKind::ImplicitlyClosed,
                token.offset,
                format!("<{closed}> implicitly closed by </{name}>"),
            );
            self.set_limit(id, token.offset);
        }
        if let Some(id) = self.stack_of_open_tags.pop() {
            self.set_limit(id, token.end());
        }
    }

    /// Attach a text run to the innermost open tag.
    fn process_text(&mut self, token: &Token<'_>) {
        let parent = if self.stack_of_open_tags.is_empty() {
            None
        } else {
            self.current_tag()
        };
        let (Some(parent), Some(tree)) = (parent, self.tree.as_mut()) else {
            if !token.bytes.trim_ascii().is_empty() {
                self.issue(
                    IssueKind::DroppedText,
                    token.offset,
                    format!("dropped {} bytes outside of any open tag", token.len()),
                );
            }
            return;
        };
        let id = tree.alloc(
            SegmentKind::Text(Text::new(token.bytes)),
            Content::Verbatim {
                offset: token.offset,
                limit: token.end(),
            },
        );
        tree.append_child(parent, id);
    }

    /// Tags still open at the end of input extend to the end of the buffer.
    fn close_remaining(&mut self) {
        let remaining = std::mem::take(&mut self.stack_of_open_tags);
        for id in remaining.into_iter().rev() {
            let name = self.tag_name(id);
            self.issue(
                IssueKind::Unterminated,
                self.buffer.len(),
                format!("<{name}> is never closed"),
            );
            self.set_limit(id, self.buffer.len());
        }
    }

    /// The root keeps spanning the whole buffer.
    fn set_limit(&mut self, id: NodeId, limit: usize) {
        if id == NodeId::ROOT {
            return;
        }
        if let Some(tree) = self.tree.as_mut() {
            tree.set_limit(id, limit);
        }
    }

    fn tag_name(&self, id: NodeId) -> String {
        self.tree
            .as_ref()
            .and_then(|tree| tree.as_tag(id))
            .map(|tag| tag.name().to_string())
            .unwrap_or_default()
    }

    /// Record a recovery issue for later retrieval.
    ///
    /// Strict mode routes it through shard-common's warning system, otherwise
    /// it is only logged at debug level.
    fn issue(&mut self, kind: IssueKind, offset: usize, message: String) {
        if self.strict_mode {
            let _ = warn_once("Tree Builder", &format!("{kind} at byte {offset}: {message}"));
        } else {
            log::debug!(target: "shard", "{kind} at byte {offset}: {message}");
        }
        self.issues.push(ParseIssue {
            message,
            offset,
            kind,
        });
    }
}
