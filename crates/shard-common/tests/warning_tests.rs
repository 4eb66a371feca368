//! Tests for the deduplicating warning helper and the error display strings.

use shard_common::Error;
use shard_common::warning::{clear_warnings, warn_once};

#[test]
fn test_warn_once_deduplicates_and_resets() {
    clear_warnings();
    assert!(warn_once("Test", "duplicate-message-a"));
    assert!(!warn_once("Test", "duplicate-message-a"));
    // Same message, different component, is a distinct warning
    assert!(warn_once("Other", "duplicate-message-a"));

    clear_warnings();
    assert!(warn_once("Test", "duplicate-message-a"));
}

#[test]
fn test_error_messages_carry_context() {
    let err = Error::NoSpaceToWrite {
        tag: "br".to_string(),
    };
    assert_eq!(err.to_string(), "<br> is a void tag and has no space to write in");

    let err = Error::OutOfRange { offset: 9, len: 4 };
    assert_eq!(
        err.to_string(),
        "offset 9 is out of range for a buffer of 4 bytes"
    );

    let err = Error::Syntax {
        selector: "div >".to_string(),
        position: 4,
        reason: "expected a selector after combinator",
    };
    assert!(err.to_string().contains("byte 4"));
}
