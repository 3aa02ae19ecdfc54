//! Domain errors.

use thiserror::Error;

/// Value object validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Connection registry errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("connection '{0}' is not registered")]
    ConnectionNotFound(String),
}

/// Errors raised while pushing a frame to one connection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("connection '{0}' has no outbound channel")]
    ClientNotFound(String),

    #[error("push failed: {0}")]
    PushFailed(String),

    #[error("failed to encode envelope: {0}")]
    EncodeFailed(String),
}
