//! Unit tests for error handling.
//!
//! This module contains tests for error types and error reporting.

use crate::errors::errors::{Error, ErrorImpl, ErrorTip};
use crate::Position;
use std::rc::Rc;

fn at(offset: u32) -> Position {
    Position(offset, Rc::new("test.custom".to_string()))
}

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        at(10),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
}

#[test]
fn test_error_position() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "identifier".to_string(),
        },
        at(42),
    );

    assert_eq!(error.get_position().0, 42);
    assert_eq!(*error.get_position().1, "test.custom");
}

#[test]
fn test_type_mismatch_error() {
    let error = Error::new(
        ErrorImpl::TypeMismatch {
            expected: "int".to_string(),
            received: "string".to_string(),
        },
        at(0),
    );

    assert_eq!(error.get_error_name(), "TypeMismatch");
    assert_eq!(
        error.to_string(),
        "types do not match: expected int, received string"
    );
}

#[test]
fn test_semantic_error_names() {
    let cases = vec![
        (
            ErrorImpl::DuplicateDeclaration {
                identifier: "x".to_string(),
            },
            "DuplicateDeclaration",
        ),
        (
            ErrorImpl::UndeclaredIdentifier {
                identifier: "y".to_string(),
            },
            "UndeclaredIdentifier",
        ),
        (
            ErrorImpl::ArityMismatch {
                expected: 2,
                received: 3,
            },
            "ArityMismatch",
        ),
        (ErrorImpl::IllegalBreak, "IllegalBreak"),
        (
            ErrorImpl::IllegalReturn {
                message: "Return can only appear in a function".to_string(),
            },
            "IllegalReturn",
        ),
        (
            ErrorImpl::DuplicateElement {
                element: "\"brie\"".to_string(),
            },
            "DuplicateElement",
        ),
        (
            ErrorImpl::NotCallable {
                received: "int".to_string(),
            },
            "NotCallable",
        ),
        (
            ErrorImpl::NotIndexable {
                received: "bool".to_string(),
            },
            "NotIndexable",
        ),
        (
            ErrorImpl::IndexTypeMismatch {
                expected: "int".to_string(),
                received: "string".to_string(),
            },
            "IndexTypeMismatch",
        ),
        (
            ErrorImpl::ReadOnlyAssignment {
                identifier: "print".to_string(),
            },
            "ReadOnlyAssignment",
        ),
    ];

    for (error_impl, name) in cases {
        assert_eq!(Error::new(error_impl, at(0)).get_error_name(), name);
    }
}

#[test]
fn test_arity_message_names_both_counts() {
    let error = Error::new(
        ErrorImpl::ArityMismatch {
            expected: 1,
            received: 0,
        },
        at(0),
    );

    assert_eq!(error.to_string(), "1 argument(s) required but 0 passed");
}

#[test]
fn test_error_tip_none() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        at(0),
    );

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_suggestion() {
    let error = Error::new(
        ErrorImpl::IndexTypeMismatch {
            expected: "int".to_string(),
            received: "string".to_string(),
        },
        at(0),
    );

    match error.get_tip() {
        ErrorTip::Suggestion(tip) => {
            assert_eq!(tip, "Expected index type `int`, received `string`")
        }
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}
