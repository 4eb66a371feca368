use shard_common::{Error, Result};
use shard_dom::Tag;

use crate::tokenizer::{is_open_tag, read_tag_name, wrapped_by};

/// Build a [`Tag`] from opening-tag markup such as `<a href="x y" download>`.
///
/// After the name, the markup is split on ASCII whitespace outside quotes.
/// Each token is either `key` (an attribute with an empty value) or
/// `key=value`, split on the first `=`; one layer of matching quotes is
/// stripped from the value. A lone `/` is skipped, so `<br/>` and `<br />`
/// carry no attributes. Later duplicates overwrite earlier values.
///
/// The void flag follows the default void set; the builder widens it when
/// configured to.
///
/// # Errors
///
/// [`Error::NotATag`] when `markup` is not an opening tag with a name.
pub fn parse_tag(markup: &[u8]) -> Result<Tag> {
    if !is_open_tag(markup) {
        return Err(Error::NotATag {
            markup: String::from_utf8_lossy(markup).into_owned(),
        });
    }
    let name = read_tag_name(markup)?;
    let mut tag = Tag::new(name);

    let rest = &markup[1 + name.len()..markup.len() - 1];
    let rest = String::from_utf8_lossy(rest);
    for token in split_outside_quotes(&rest) {
        if token == "/" {
            continue;
        }
        let (key, value) = token.split_once('=').unwrap_or((token, ""));
        if key.is_empty() {
            continue;
        }
        let _ = tag.set_attribute(key, unquote(value));
    }
    Ok(tag)
}

/// Strip one layer of matching `'` or `"`.
fn unquote(value: &str) -> &str {
    if wrapped_by(value, '"') || wrapped_by(value, '\'') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// Split on ASCII whitespace that is not inside a quoted span.
fn split_outside_quotes(input: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut quote: Option<char> = None;
    let mut start: Option<usize> = None;

    for (i, c) in input.char_indices() {
        match quote {
            Some(open) if c == open => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                let _ = start.get_or_insert(i);
            }
            None if c.is_ascii_whitespace() => {
                if let Some(begin) = start.take() {
                    tokens.push(&input[begin..i]);
                }
            }
            None => {
                let _ = start.get_or_insert(i);
            }
        }
    }
    if let Some(begin) = start {
        tokens.push(&input[begin..]);
    }
    tokens
}
