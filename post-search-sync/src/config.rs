//! Synchronizer configuration.

use std::env;
use std::time::Duration;

const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Configuration for the document synchronizer.
#[derive(Debug, Clone, Copy)]
pub struct SyncConfig {
    /// Upper bound for each engine call made on behalf of a commit.
    pub request_timeout: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
        }
    }
}

impl SyncConfig {
    /// Read `SEARCH_REQUEST_TIMEOUT_MS`, falling back to the default when it
    /// is unset or not a number.
    pub fn from_env() -> Self {
        let request_timeout = env::var("SEARCH_REQUEST_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS));

        Self { request_timeout }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
