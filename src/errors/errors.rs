use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Error, Debug, Clone)]
#[error("{internal_error}")]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn kind(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::DuplicateDeclaration { .. } => "DuplicateDeclaration",
            ErrorImpl::UndeclaredIdentifier { .. } => "UndeclaredIdentifier",
            ErrorImpl::TypeMismatch { .. } => "TypeMismatch",
            ErrorImpl::ArityMismatch { .. } => "ArityMismatch",
            ErrorImpl::IllegalBreak => "IllegalBreak",
            ErrorImpl::IllegalReturn { .. } => "IllegalReturn",
            ErrorImpl::DuplicateElement { .. } => "DuplicateElement",
            ErrorImpl::NotCallable { .. } => "NotCallable",
            ErrorImpl::NotIndexable { .. } => "NotIndexable",
            ErrorImpl::IndexTypeMismatch { .. } => "IndexTypeMismatch",
            ErrorImpl::ReadOnlyAssignment { .. } => "ReadOnlyAssignment",
            ErrorImpl::UnknownProperty { .. } => "UnknownProperty",
            ErrorImpl::VoidVariable { .. } => "VoidVariable",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a bracket or an operator?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::DuplicateDeclaration { identifier } => ErrorTip::Suggestion(format!(
                "Identifier `{}` is already visible here, shadowing is not allowed",
                identifier
            )),
            ErrorImpl::UndeclaredIdentifier { identifier } => ErrorTip::Suggestion(format!(
                "Identifier `{}` must be declared before it is used",
                identifier
            )),
            ErrorImpl::TypeMismatch { expected, received } => ErrorTip::Suggestion(format!(
                "Expected type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::ArityMismatch { expected, received } => ErrorTip::Suggestion(format!(
                "Expected {} arguments, received {}",
                expected, received
            )),
            ErrorImpl::IllegalBreak => {
                ErrorTip::Suggestion(String::from("Break can only appear in a loop"))
            }
            ErrorImpl::IllegalReturn { message } => ErrorTip::Suggestion(message.clone()),
            ErrorImpl::DuplicateElement { element } => ErrorTip::Suggestion(format!(
                "Element `{}` appears more than once",
                element
            )),
            ErrorImpl::NotCallable { received } => ErrorTip::Suggestion(format!(
                "Only functions can be called, received `{}`",
                received
            )),
            ErrorImpl::NotIndexable { received } => ErrorTip::Suggestion(format!(
                "Only arrays, sets and dictionaries can be indexed, received `{}`",
                received
            )),
            ErrorImpl::IndexTypeMismatch { expected, received } => ErrorTip::Suggestion(format!(
                "Expected index type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::ReadOnlyAssignment { identifier } => {
                ErrorTip::Suggestion(format!("Cannot assign to read-only `{}`", identifier))
            }
            ErrorImpl::UnknownProperty { property, received } => ErrorTip::Suggestion(format!(
                "Type `{}` has no property `{}`",
                received, property
            )),
            ErrorImpl::VoidVariable { identifier } => ErrorTip::Suggestion(format!(
                "`{}` cannot hold a value of type `void`",
                identifier
            )),
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("identifier {identifier:?} already declared")]
    DuplicateDeclaration { identifier: String },
    #[error("identifier {identifier:?} not declared")]
    UndeclaredIdentifier { identifier: String },
    #[error("types do not match: expected {expected}, received {received}")]
    TypeMismatch { expected: String, received: String },
    #[error("{expected} argument(s) required but {received} passed")]
    ArityMismatch { expected: usize, received: usize },
    #[error("break can only appear in a loop")]
    IllegalBreak,
    #[error("illegal return: {message}")]
    IllegalReturn { message: String },
    #[error("duplicate element {element}")]
    DuplicateElement { element: String },
    #[error("call of non-function: received {received}")]
    NotCallable { received: String },
    #[error("cannot index a value of type {received}")]
    NotIndexable { received: String },
    #[error("index types do not match: expected {expected}, received {received}")]
    IndexTypeMismatch { expected: String, received: String },
    #[error("cannot assign to read-only {identifier:?}")]
    ReadOnlyAssignment { identifier: String },
    #[error("type {received} has no property {property:?}")]
    UnknownProperty { property: String, received: String },
    #[error("{identifier:?} cannot be declared void")]
    VoidVariable { identifier: String },
}
