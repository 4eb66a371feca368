use shard_common::{Error, Result};

use super::helpers::{is_close_tag, is_open_tag};
use super::token::{Token, TokenKind};

/// Read the segment starting at `offset`.
///
/// Returns how many bytes were consumed together with the segment itself:
/// - a text run up to, not including, the next `<`;
/// - a piece of markup from `offset` through the next `>` that is not inside
///   a quoted span.
///
/// Quotes only matter when the segment starts with `<`. There a `'` or `"`
/// not preceded by `\` opens a span that only the same character closes, and
/// `<`/`>` inside the span are ordinary bytes. The other quote character is
/// an ordinary byte too, so `'` and `"` do not toggle independently: in
/// `title="it's"` the apostrophe does not open a second span. Markup that
/// runs into an unquoted `<` is cut there and handed back as a text-like
/// segment.
///
/// `Ok(None)` means the rest of the buffer is an unterminated tag or quote.
///
/// # Errors
///
/// [`Error::OutOfRange`] unless `offset < buffer.len() - 1`.
pub fn read_segment(buffer: &[u8], offset: usize) -> Result<Option<(usize, &[u8])>> {
    let len = buffer.len();
    if offset >= len.saturating_sub(1) {
        return Err(Error::OutOfRange { offset, len });
    }

    let markup = buffer[offset] == b'<';
    let mut quote: Option<u8> = None;
    for (i, &byte) in buffer.iter().enumerate().skip(offset + 1) {
        if markup {
            let escaped = buffer[i - 1] == b'\\';
            match quote {
                Some(open) => {
                    if byte == open && !escaped {
                        quote = None;
                    }
                    continue;
                }
                None if matches!(byte, b'"' | b'\'') && !escaped => {
                    quote = Some(byte);
                    continue;
                }
                None => {}
            }
        }

        match byte {
            b'<' => return Ok(Some((i - offset, &buffer[offset..i]))),
            b'>' if markup => return Ok(Some((i + 1 - offset, &buffer[offset..=i]))),
            _ => {}
        }
    }

    if markup {
        return Ok(None);
    }
    Ok(Some((len - offset, &buffer[offset..])))
}

/// Drives [`read_segment`] over a whole buffer.
///
/// Iteration stops at the first unterminated tag, or when fewer than two
/// bytes are left. [`Tokenizer::offset`] then tells where the untokenized
/// rest begins.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    buffer: &'a [u8],
    offset: usize,
    done: bool,
}

impl<'a> Tokenizer<'a> {
    /// Create a tokenizer positioned at the start of `buffer`.
    #[must_use]
    pub const fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            offset: 0,
            done: false,
        }
    }

    /// Byte offset of the next segment.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// The bytes that were not turned into tokens.
    #[must_use]
    pub fn remainder(&self) -> &'a [u8] {
        self.buffer.get(self.offset..).unwrap_or_default()
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let Ok(Some((consumed, bytes))) = read_segment(self.buffer, self.offset) else {
            self.done = true;
            return None;
        };

        let kind = if is_close_tag(bytes) {
            TokenKind::Close
        } else if is_open_tag(bytes) {
            TokenKind::Open
        } else {
            TokenKind::Text
        };
        let token = Token {
            kind,
            offset: self.offset,
            bytes,
        };
        log::trace!(target: "shard", "{kind} segment at {}..{}", token.offset, token.end());
        self.offset += consumed;
        Some(token)
    }
}
