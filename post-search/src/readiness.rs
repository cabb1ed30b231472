//! Waiting for the search engine to accept requests.
//!
//! Used at startup and by test setup: the engine container often starts
//! alongside the application and needs a few seconds before it answers.

use std::env;
use std::time::Duration;

use thiserror::Error;
use tokio::time::{sleep, timeout as deadline, Instant};
use tracing::{debug, info, warn};

use crate::AppError;
use post_search_repository::{SearchIndexClient, SearchIndexError};

const DEFAULT_READY_TIMEOUT_SECS: u64 = 30;
const DEFAULT_READY_POLL_MS: u64 = 500;

/// The engine never answered within the allowed time.
#[derive(Debug, Error)]
pub enum ReadinessError {
    #[error("Search engine not ready after {elapsed:?}: {source}")]
    TimedOut {
        elapsed: Duration,
        /// Error from the last probe.
        source: SearchIndexError,
    },
}

/// How long to wait for the engine and how often to probe it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessConfig {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_READY_TIMEOUT_SECS),
            poll_interval: Duration::from_millis(DEFAULT_READY_POLL_MS),
        }
    }
}

impl ReadinessConfig {
    /// Read `SEARCH_READY_TIMEOUT_SECS` and `SEARCH_READY_POLL_MS`.
    pub fn from_env() -> Result<Self, AppError> {
        let mut config = Self::default();

        if let Some(secs) = read_u64("SEARCH_READY_TIMEOUT_SECS")? {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = read_u64("SEARCH_READY_POLL_MS")? {
            if ms == 0 {
                return Err(AppError::config("SEARCH_READY_POLL_MS must be positive"));
            }
            config.poll_interval = Duration::from_millis(ms);
        }

        Ok(config)
    }
}

fn read_u64(key: &str) -> Result<Option<u64>, AppError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| AppError::config(format!("{} must be a whole number, got {:?}", key, value))),
        _ => Ok(None),
    }
}

/// Probe the engine until it answers or `timeout` has passed.
///
/// Probes run one after another with `poll_interval` between them. A probe
/// may take no longer than the remaining budget plus one `poll_interval`,
/// so the wait ends at most one interval past `timeout` even when the engine
/// accepts connections but never answers.
///
/// # Returns
///
/// * `Ok(Duration)` - Time spent waiting
/// * `Err(ReadinessError::TimedOut)` - The engine never answered; carries the last probe error
pub async fn wait_until_ready(
    client: &SearchIndexClient,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<Duration, ReadinessError> {
    let started = Instant::now();
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        let budget = timeout.saturating_sub(started.elapsed()) + poll_interval;
        let probe = deadline(budget, client.ping())
            .await
            .unwrap_or_else(|_| {
                Err(SearchIndexError::connection(format!(
                    "Probe timed out after {:?}",
                    budget
                )))
            });

        match probe {
            Ok(()) => {
                let elapsed = started.elapsed();
                info!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    attempts,
                    "Search engine is ready"
                );
                return Ok(elapsed);
            }
            Err(e) => {
                let elapsed = started.elapsed();
                if elapsed > timeout {
                    warn!(
                        elapsed_ms = elapsed.as_millis() as u64,
                        attempts,
                        error = %e,
                        "Gave up waiting for the search engine"
                    );
                    return Err(ReadinessError::TimedOut { elapsed, source: e });
                }
                debug!(attempts, error = %e, "Search engine not ready yet");
                sleep(poll_interval).await;
            }
        }
    }
}
