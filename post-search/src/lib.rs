//! # Post Search
//!
//! Startup wiring for post search.
//!
//! This crate builds the shared search client and the document synchronizer
//! from the environment, and waits for the search engine to accept requests.

pub mod config;
pub mod readiness;

pub use config::Dependencies;
pub use readiness::{wait_until_ready, ReadinessConfig, ReadinessError};

use post_search_repository::SearchIndexError;
use thiserror::Error;

/// Errors that can occur during startup.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Search engine error.
    #[error("Search error: {0}")]
    SearchError(#[from] SearchIndexError),

    /// The engine did not come up in time.
    #[error(transparent)]
    ReadinessError(#[from] ReadinessError),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
