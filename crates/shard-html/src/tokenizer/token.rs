use strum_macros::Display;

/// What a segment looks like from the outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenKind {
    /// `<name ...>`
    Open,
    /// `</name ...>`
    Close,
    /// Anything else: character data, comments, DOCTYPEs, broken markup.
    Text,
}

/// A classified segment of the source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// How the segment was classified.
    pub kind: TokenKind,
    /// Byte offset of the segment's first byte.
    pub offset: usize,
    /// The raw bytes of the segment.
    pub bytes: &'a [u8],
}

impl Token<'_> {
    /// One past the segment's last byte.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.offset + self.bytes.len()
    }

    /// Number of bytes in the segment.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false: the lexer never yields empty segments.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
