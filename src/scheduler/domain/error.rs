//! Error types for scheduler domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing scheduler domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task name is empty after trimming.
    #[error("task name must not be empty")]
    EmptyTaskName,

    /// The task kind (concrete type name) is empty after trimming.
    #[error("task kind must not be empty")]
    EmptyTaskKind,
}

/// Error returned while parsing a status code from its textual form.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown status code: {0}")]
pub struct ParseStatusCodeError(pub String);
