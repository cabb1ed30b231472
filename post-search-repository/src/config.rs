//! Connection configuration for the search engine client.
//!
//! The engine URL is chosen from the environment: production deployments read
//! `BONSAI_URL`, every other environment reads `ELASTICSEARCH_URL`, and both
//! fall back to a local engine.

use std::env;
use std::time::Duration;

use url::Url;

use crate::errors::SearchIndexError;

/// Default search engine URL.
pub const DEFAULT_URL: &str = "http://localhost:9200";

/// Statuses that are retried by default.
pub const DEFAULT_RETRY_STATUSES: [u16; 3] = [502, 503, 504];

const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_RETRY_BACKOFF_MS: u64 = 100;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Deployment environment, selected by `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Ci,
    Production,
}

impl Environment {
    /// Parse an environment name. Unknown names are treated as development.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "test" => Self::Test,
            "ci" => Self::Ci,
            _ => Self::Development,
        }
    }

    /// Read `APP_ENV`, defaulting to development.
    pub fn from_env() -> Self {
        env::var("APP_ENV")
            .map(|name| Self::parse(&name))
            .unwrap_or(Self::Development)
    }

    /// The variable holding the engine URL in this environment.
    pub fn url_variable(&self) -> &'static str {
        match self {
            Self::Production => "BONSAI_URL",
            Self::Development | Self::Test | Self::Ci => "ELASTICSEARCH_URL",
        }
    }
}

/// Resolve the engine URL for an environment using `lookup` to read variables.
///
/// Unset and empty variables fall back to [`DEFAULT_URL`].
pub fn resolve_url<F>(environment: Environment, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(environment.url_variable())
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| DEFAULT_URL.to_string())
}

/// Parse an engine URL, accepting bare `host:port` by assuming `http`.
pub fn normalize_url(raw: &str) -> Result<Url, SearchIndexError> {
    let raw = raw.trim();
    let with_scheme = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("http://{}", raw)
    };

    let url = Url::parse(&with_scheme)
        .map_err(|e| SearchIndexError::config(format!("Invalid search engine URL {raw}: {e}")))?;

    if url.host_str().is_none() {
        return Err(SearchIndexError::config(format!(
            "Search engine URL has no host: {raw}"
        )));
    }

    Ok(url)
}

/// Transport-level retry policy.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retry when the engine cannot be reached at all.
    pub retry_on_failure: bool,
    /// Response statuses that trigger a retry.
    pub retry_on_status: Vec<u16>,
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry; grows linearly per attempt.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retry_on_failure: true,
            retry_on_status: DEFAULT_RETRY_STATUSES.to_vec(),
            max_retries: DEFAULT_MAX_RETRIES,
            backoff: Duration::from_millis(DEFAULT_RETRY_BACKOFF_MS),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn disabled() -> Self {
        Self {
            retry_on_failure: false,
            retry_on_status: Vec::new(),
            max_retries: 0,
            backoff: Duration::ZERO,
        }
    }

    /// Delay before retrying a request that got `status` on attempt `attempt`
    /// (1-based), or `None` if the response should be returned as is.
    pub fn delay_for_status(&self, status: u16, attempt: u32) -> Option<Duration> {
        if self.retry_on_status.contains(&status) {
            self.delay_for_attempt(attempt)
        } else {
            None
        }
    }

    /// Delay before retrying a request that failed to reach the engine on
    /// attempt `attempt` (1-based), or `None` to give up.
    pub fn delay_for_failure(&self, attempt: u32) -> Option<Duration> {
        if self.retry_on_failure {
            self.delay_for_attempt(attempt)
        } else {
            None
        }
    }

    fn delay_for_attempt(&self, attempt: u32) -> Option<Duration> {
        (attempt <= self.max_retries).then(|| self.backoff * attempt)
    }
}

/// Configuration for connecting to the search engine.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    urls: Vec<Url>,
    /// Transport retry policy.
    pub retry: RetryPolicy,
    /// Upper bound for a single request.
    pub request_timeout: Duration,
    /// Request engine info right after connecting and log the outcome.
    pub probe_on_connect: bool,
    /// Log every request at debug level.
    pub log_requests: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            urls: vec![Url::parse(DEFAULT_URL).expect("default URL is valid")],
            retry: RetryPolicy::default(),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            probe_on_connect: true,
            log_requests: false,
        }
    }
}

impl ConnectionConfig {
    /// Create a config for a single engine URL with default settings.
    pub fn new(url: &str) -> Result<Self, SearchIndexError> {
        Self::with_urls(&[url])
    }

    /// Create a config for several engine URLs.
    ///
    /// The client currently talks to the first URL only.
    pub fn with_urls(urls: &[&str]) -> Result<Self, SearchIndexError> {
        if urls.is_empty() {
            return Err(SearchIndexError::config("At least one search engine URL is required"));
        }

        let urls = urls
            .iter()
            .map(|url| normalize_url(url))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            urls,
            ..Self::default()
        })
    }

    /// Build the config from process environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `APP_ENV`: environment name (default: development)
    /// - `BONSAI_URL`: engine URL in production
    /// - `ELASTICSEARCH_URL`: engine URL in other environments
    /// - `SEARCH_REQUEST_TIMEOUT_MS`: request timeout (default: 10000)
    /// - `SEARCH_MAX_RETRIES`: transport retries (default: 3)
    pub fn from_env() -> Result<Self, SearchIndexError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SearchIndexError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("APP_ENV")
            .map(|name| Environment::parse(&name))
            .unwrap_or(Environment::Development);
        let url = resolve_url(environment, &lookup);

        let mut config = Self::new(&url)?;
        config.log_requests = environment == Environment::Development;

        if let Some(timeout_ms) = parse_var::<u64>(&lookup, "SEARCH_REQUEST_TIMEOUT_MS")? {
            config.request_timeout = Duration::from_millis(timeout_ms);
        }
        if let Some(max_retries) = parse_var::<u32>(&lookup, "SEARCH_MAX_RETRIES")? {
            config.retry.max_retries = max_retries;
        }

        Ok(config)
    }

    /// The URL the client connects to.
    pub fn primary_url(&self) -> &Url {
        &self.urls[0]
    }

    /// All configured URLs.
    pub fn urls(&self) -> &[Url] {
        &self.urls
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Skip the connection probe in [`SearchIndexClient::connect`](crate::SearchIndexClient::connect).
    pub fn without_probe(mut self) -> Self {
        self.probe_on_connect = false;
        self
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, SearchIndexError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| SearchIndexError::config(format!("Invalid {key}: {e}"))),
        _ => Ok(None),
    }
}
