//! Tags that never have a closing tag.

/// Element names treated as void: no closing tag, never any children.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Whether `tag_name` is a void element (ASCII case-insensitive).
#[must_use]
pub fn is_single_tag(tag_name: &str) -> bool {
    VOID_ELEMENTS
        .iter()
        .any(|void| void.eq_ignore_ascii_case(tag_name))
}

#[cfg(test)]
mod tests {
    use super::is_single_tag;

    #[test]
    fn test_is_single_tag() {
        assert!(is_single_tag("br"));
        assert!(is_single_tag("IMG"));
        assert!(is_single_tag("meta"));
        assert!(!is_single_tag("div"));
        assert!(!is_single_tag(""));
    }
}
