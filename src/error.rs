//! Error types
//!
//! Every fallible operation in the crate returns [`JsResult`]. The variants
//! mirror the JavaScript error constructors a caller of an installed
//! capability would observe.

use thiserror::Error;

/// Result alias used throughout the crate
pub type JsResult<T> = Result<T, JsError>;

/// A JavaScript-level failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JsError {
    /// `TypeError`: nullish receivers, non-callable callees, rejected
    /// property definitions
    #[error("TypeError: {0}")]
    Type(String),
    /// `RangeError`: invalid lengths
    #[error("RangeError: {0}")]
    Range(String),
    /// A defect in the shim itself (e.g. a payload registered under the
    /// wrong name). Never caught by the installer.
    #[error("Internal assertion failure: {0}")]
    Internal(String),
}

/// Kind of error object, used when materializing a [`JsError`] as a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Error,
    TypeError,
    RangeError,
    InternalError,
}

impl ErrorKind {
    /// Constructor name as seen from script
    pub const fn name(self) -> &'static str {
        match self {
            ErrorKind::Error => "Error",
            ErrorKind::TypeError => "TypeError",
            ErrorKind::RangeError => "RangeError",
            ErrorKind::InternalError => "InternalError",
        }
    }
}

impl JsError {
    pub fn type_error(msg: impl Into<String>) -> Self {
        JsError::Type(msg.into())
    }

    pub fn range_error(msg: impl Into<String>) -> Self {
        JsError::Range(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        JsError::Internal(msg.into())
    }

    /// The error kind this failure surfaces as
    pub fn kind(&self) -> ErrorKind {
        match self {
            JsError::Type(_) => ErrorKind::TypeError,
            JsError::Range(_) => ErrorKind::RangeError,
            JsError::Internal(_) => ErrorKind::InternalError,
        }
    }

    /// The message without the kind prefix
    pub fn message(&self) -> &str {
        match self {
            JsError::Type(m) | JsError::Range(m) | JsError::Internal(m) => m,
        }
    }
}
