//! Dependency initialization and wiring for post search.

use tracing::info;

use crate::readiness::ReadinessConfig;
use crate::AppError;
use post_search_repository::{ConnectionConfig, IndexDescriptor, SearchIndexClient};
use post_search_sync::{DocumentSynchronizer, SyncConfig};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// Process-wide search client. Clone it into each component.
    pub client: SearchIndexClient,
    /// Keeps the posts index in step with committed posts.
    pub synchronizer: DocumentSynchronizer,
    /// How long to wait for the engine at startup.
    pub readiness: ReadinessConfig,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `APP_ENV`: environment name (default: development)
    /// - `BONSAI_URL` / `ELASTICSEARCH_URL`: engine URL (default: http://localhost:9200)
    /// - `SEARCH_REQUEST_TIMEOUT_MS`, `SEARCH_MAX_RETRIES`: transport tuning
    /// - `SEARCH_READY_TIMEOUT_SECS`, `SEARCH_READY_POLL_MS`: readiness waiting
    ///
    /// An engine that is down at this point is logged and tolerated.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(AppError)` - If the configuration is invalid
    pub async fn new() -> Result<Self, AppError> {
        let connection = ConnectionConfig::from_env()
            .map_err(|e| AppError::config(format!("Invalid search connection settings: {}", e)))?;
        let readiness = ReadinessConfig::from_env()?;

        let url = connection.primary_url();
        info!(
            host = url.host_str().unwrap_or_default(),
            port = url.port_or_known_default(),
            max_retries = connection.retry.max_retries,
            request_timeout_ms = connection.request_timeout.as_millis() as u64,
            "Initializing dependencies"
        );

        let client = SearchIndexClient::connect(&connection).await?;

        let synchronizer = DocumentSynchronizer::with_config(
            client.clone(),
            IndexDescriptor::posts(),
            SyncConfig::from_env(),
        );

        Ok(Self {
            client,
            synchronizer,
            readiness,
        })
    }
}
