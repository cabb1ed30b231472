//! Search index error types.
//!
//! This module defines the error types that can occur during search index operations.

use thiserror::Error;

/// Errors that can occur during search index operations.
///
/// `ConnectionError`, `ResponseError` and `ValidationError` together form the
/// transport family: the engine was unreachable, or it answered with an
/// error. See [`SearchIndexError::is_transport`].
#[derive(Debug, Clone, Error)]
pub enum SearchIndexError {
    /// The engine rejected the request as malformed (e.g. an invalid mapping).
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// A caller-supplied argument was rejected before any request was sent.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Failed to reach the search engine.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The engine answered with an error status.
    #[error("Request failed with status {status}: {body}")]
    ResponseError { status: u16, body: String },

    /// Failed to parse a response from the search engine.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Invalid client configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl SearchIndexError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create an invalid-argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create an error-status response error.
    pub fn response(status: u16, body: impl Into<String>) -> Self {
        Self::ResponseError {
            status,
            body: body.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Whether the error came from talking to the engine.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::ConnectionError(_) | Self::ResponseError { .. } | Self::ValidationError(_)
        )
    }
}
