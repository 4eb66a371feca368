//! Helper functions for classifying raw segments.
//!
//! All helpers work on bytes; none of them allocate.

use shard_common::{Error, Result};

/// Whether `markup` is wrapped in `<` and `>`.
#[must_use]
pub fn is_tag(markup: &[u8]) -> bool {
    markup.len() >= 2 && markup.first() == Some(&b'<') && markup.last() == Some(&b'>')
}

/// Whether `markup` looks like an opening tag: `<...>` not starting with `</`.
#[must_use]
pub fn is_open_tag(markup: &[u8]) -> bool {
    is_tag(markup) && markup[1] != b'/'
}

/// Whether `markup` looks like a closing tag: `</...>`.
#[must_use]
pub fn is_close_tag(markup: &[u8]) -> bool {
    markup.len() >= 3 && markup.starts_with(b"</") && markup.last() == Some(&b'>')
}

/// The longest prefix of ASCII letters and digits.
#[must_use]
pub fn read_word(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .position(|b| !b.is_ascii_alphanumeric())
        .unwrap_or(bytes.len());
    &bytes[..end]
}

/// Whether `value` starts and ends with `wrap` and is at least two bytes long.
#[must_use]
pub fn wrapped_by(value: &str, wrap: char) -> bool {
    value.len() >= 2 * wrap.len_utf8() && value.starts_with(wrap) && value.ends_with(wrap)
}

/// Bytes allowed after the first character of a tag name.
const fn is_name_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b':' | b'.')
}

/// The name of an opening or closing tag.
///
/// A name must start with an ASCII letter or digit and continues over
/// letters, digits, `-`, `_`, `:` and `.`. This leaves `<!DOCTYPE html>`,
/// `<!-- ... -->` and `< p>` without a name.
///
/// # Errors
///
/// [`Error::NotATag`] when `markup` is not wrapped in `<`/`>` or has no name.
pub fn read_tag_name(markup: &[u8]) -> Result<&str> {
    let not_a_tag = || Error::NotATag {
        markup: String::from_utf8_lossy(markup).into_owned(),
    };
    if !is_tag(markup) {
        return Err(not_a_tag());
    }
    let body = markup
        .strip_prefix(b"</")
        .or_else(|| markup.strip_prefix(b"<"))
        .unwrap_or(markup);
    if read_word(body).is_empty() {
        return Err(not_a_tag());
    }
    let end = body
        .iter()
        .position(|&b| !is_name_byte(b))
        .unwrap_or(body.len());
    // Name bytes are ASCII, so this cannot fail.
    std::str::from_utf8(&body[..end]).map_err(|_| not_a_tag())
}
