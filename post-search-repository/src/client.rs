//! Search index client implementation.
//!
//! This module provides the main client for interacting with the search index.
//! Application code uses this to manage indices, write and delete documents,
//! and run searches.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::config::ConnectionConfig;
use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::opensearch::OpenSearchClient;
use crate::types::{IndexDescriptor, IndexSettingsOverrides};
use post_search_shared::{ClusterHealth, EngineInfo, SearchRequest, SearchResponse};

/// The main client for interacting with the search index.
///
/// Cloning is cheap: clones share one provider, and with it one connection
/// configuration. Build it once at startup and hand clones to each component.
#[derive(Clone)]
pub struct SearchIndexClient {
    provider: Arc<dyn SearchIndexProvider>,
}

impl SearchIndexClient {
    /// Create a new SearchIndexClient on top of a provider.
    pub fn new(provider: Arc<dyn SearchIndexProvider>) -> Self {
        Self { provider }
    }

    /// Connect to the engine described by `config`.
    ///
    /// When `config.probe_on_connect` is set, the engine is asked for its
    /// version and the outcome is logged. An unreachable engine is only a
    /// warning: the client is returned anyway and starts working once the
    /// engine comes up.
    ///
    /// # Returns
    ///
    /// * `Ok(SearchIndexClient)` - A client, possibly pointing at an engine that is down
    /// * `Err(SearchIndexError::ConfigError)` - If the transport cannot be built
    pub async fn connect(config: &ConnectionConfig) -> Result<Self, SearchIndexError> {
        let provider = OpenSearchClient::new(config)?;
        let client = Self::new(Arc::new(provider));

        if config.probe_on_connect {
            client.probe().await;
        }

        Ok(client)
    }

    /// Ask the engine for its version and log the outcome. Never fails.
    ///
    /// Returns whether the engine answered.
    pub async fn probe(&self) -> bool {
        match self.provider.info().await {
            Ok(engine) => {
                info!(
                    version = %engine.version,
                    cluster = %engine.cluster_name,
                    "Search engine connected"
                );
                true
            }
            Err(e) => {
                warn!(error = %e, "Search engine connection failed");
                warn!("Search will be unavailable until the engine starts");
                false
            }
        }
    }

    /// Liveness probe.
    pub async fn ping(&self) -> Result<(), SearchIndexError> {
        self.provider.ping().await
    }

    /// Name and version of the engine.
    pub async fn info(&self) -> Result<EngineInfo, SearchIndexError> {
        self.provider.info().await
    }

    /// Check whether an index exists. Transport errors are propagated.
    pub async fn index_exists(&self, name: &str) -> Result<bool, SearchIndexError> {
        require("index name", name)?;
        self.provider.index_exists(name).await
    }

    /// Create an index unless it already exists.
    ///
    /// `overrides` are merged over the descriptor's settings. Calling this
    /// again for an existing index does nothing.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The index exists afterwards
    /// * `Err(SearchIndexError::InvalidArgument)` - The descriptor is malformed; nothing was sent
    /// * `Err(SearchIndexError::ValidationError)` - The engine rejected the settings/mappings
    /// * `Err(SearchIndexError)` - Any transport failure
    #[instrument(skip(self, descriptor, overrides), fields(index = %descriptor.name))]
    pub async fn create_index(
        &self,
        descriptor: &IndexDescriptor,
        overrides: &IndexSettingsOverrides,
    ) -> Result<(), SearchIndexError> {
        descriptor.validate()?;

        if self.provider.index_exists(&descriptor.name).await? {
            debug!("Index already exists, skipping creation");
            return Ok(());
        }

        let settings = descriptor.settings.merge(overrides);
        self.provider.create_index(descriptor, &settings).await
    }

    /// Delete an index if it exists.
    #[instrument(skip(self))]
    pub async fn delete_index(&self, name: &str) -> Result<(), SearchIndexError> {
        require("index name", name)?;

        if !self.provider.index_exists(name).await? {
            debug!("Index absent, nothing to delete");
            return Ok(());
        }

        self.provider.delete_index(name).await
    }

    /// Make recent writes to an index visible to search.
    pub async fn refresh_index(&self, name: &str) -> Result<(), SearchIndexError> {
        require("index name", name)?;
        self.provider.refresh_index(name).await
    }

    /// Cluster health as reported by the engine.
    pub async fn cluster_health(&self) -> Result<ClusterHealth, SearchIndexError> {
        self.provider.cluster_health().await
    }

    /// Store a document under `id`, replacing any previous version.
    pub async fn index_document(
        &self,
        index: &str,
        id: &str,
        document: &Value,
    ) -> Result<(), SearchIndexError> {
        require("index name", index)?;
        require("document id", id)?;
        self.provider.index_document(index, id, document).await
    }

    /// Fetch a stored document, `None` if absent.
    pub async fn get_document(&self, index: &str, id: &str) -> Result<Option<Value>, SearchIndexError> {
        require("index name", index)?;
        require("document id", id)?;
        self.provider.get_document(index, id).await
    }

    /// Delete a document. Deleting an absent document succeeds.
    pub async fn delete_document(&self, index: &str, id: &str) -> Result<(), SearchIndexError> {
        require("index name", index)?;
        require("document id", id)?;
        self.provider.delete_document(index, id).await
    }

    /// Execute a search request. Errors are returned to the caller.
    pub async fn search(
        &self,
        index: &str,
        request: &SearchRequest,
    ) -> Result<SearchResponse, SearchIndexError> {
        require("index name", index)?;
        self.provider.search(index, request).await
    }
}

fn require(what: &str, value: &str) -> Result<(), SearchIndexError> {
    if value.trim().is_empty() {
        return Err(SearchIndexError::invalid_argument(format!("{} is required", what)));
    }
    Ok(())
}
