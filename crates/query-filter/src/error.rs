//! Error types for the query-filter crate.

use thiserror::Error;

/// Errors that can occur when building predicates or evaluating them.
///
/// A missing value along a path is not an error: predicates turn it into
/// `false`. See [`NotFound`](crate::NotFound).
#[derive(Debug, Error)]
pub enum QueryError {
    /// Invalid regular expression pattern.
    #[error("invalid regex pattern: {0}")]
    InvalidRegex(#[from] regex::Error),

    /// A keyword key whose path is empty or has an empty segment.
    #[error(
        "malformed key '{key}': no part of the key path may be empty \
         (e.g. '__bar__eq', 'foo__bar__' and '' are not allowed)"
    )]
    MalformedKey { key: String },

    /// A query was invoked in a way that names no terminal method.
    #[error("invalid query usage: {reason}")]
    InvalidUsage { reason: String },

    /// An operator or test name that is not recognised.
    #[error("unknown operator '{0}'")]
    UnknownOperator(String),

    /// Ordering comparison between values of different kinds.
    #[error("'{op}' not supported between {left} and {right} values")]
    Incomparable {
        op: &'static str,
        left: &'static str,
        right: &'static str,
    },

    /// Membership test against a value that holds no members.
    #[error("'{op}' needs a container, got a {kind} value")]
    NotAContainer { op: &'static str, kind: &'static str },

    /// Operand kind not valid for the operator.
    #[error("'{op}' expects {expected}, got {actual}")]
    TypeMismatch {
        op: &'static str,
        expected: &'static str,
        actual: &'static str,
    },
}

impl QueryError {
    pub(crate) fn invalid_usage(reason: impl Into<String>) -> Self {
        QueryError::InvalidUsage {
            reason: reason.into(),
        }
    }
}

/// Result type for query-filter operations.
pub type Result<T> = std::result::Result<T, QueryError>;
