//! Search index provider trait definition.
//!
//! This module defines the abstract interface for search engine operations,
//! allowing for different backend implementations (OpenSearch, Elasticsearch, etc.).

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::SearchIndexError;
use crate::types::{IndexDescriptor, IndexSettings};
use post_search_shared::{ClusterHealth, EngineInfo, SearchRequest, SearchResponse};

/// Abstracts the underlying search engine (OpenSearch, Elasticsearch, etc.).
///
/// Implementations are injected into `SearchIndexClient`, which layers the
/// idempotency rules on top. Each method maps onto one engine request.
///
/// All implementations must be `Send + Sync` so a single provider can be
/// shared across tasks.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Liveness probe.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The engine answered
    /// * `Err(SearchIndexError)` - The engine is unreachable or answered with an error
    async fn ping(&self) -> Result<(), SearchIndexError>;

    /// Name and version of the engine.
    async fn info(&self) -> Result<EngineInfo, SearchIndexError>;

    /// Check whether an index exists.
    async fn index_exists(&self, index: &str) -> Result<bool, SearchIndexError>;

    /// Create an index with the given settings and the descriptor's mappings.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The index was created (or already existed)
    /// * `Err(SearchIndexError::ValidationError)` - The engine rejected the settings or mappings
    /// * `Err(SearchIndexError)` - Any other failure
    async fn create_index(
        &self,
        descriptor: &IndexDescriptor,
        settings: &IndexSettings,
    ) -> Result<(), SearchIndexError>;

    /// Delete an index. A missing index is not an error.
    async fn delete_index(&self, index: &str) -> Result<(), SearchIndexError>;

    /// Make recent writes to an index visible to search.
    async fn refresh_index(&self, index: &str) -> Result<(), SearchIndexError>;

    /// Cluster health as reported by the engine.
    async fn cluster_health(&self) -> Result<ClusterHealth, SearchIndexError>;

    /// Store a document under `id`, replacing any previous document with that id.
    async fn index_document(
        &self,
        index: &str,
        id: &str,
        document: &Value,
    ) -> Result<(), SearchIndexError>;

    /// Fetch the stored source of a document, `None` if it does not exist.
    async fn get_document(&self, index: &str, id: &str) -> Result<Option<Value>, SearchIndexError>;

    /// Delete a document. A missing document is not an error.
    async fn delete_document(&self, index: &str, id: &str) -> Result<(), SearchIndexError>;

    /// Execute a search request against an index.
    async fn search(
        &self,
        index: &str,
        request: &SearchRequest,
    ) -> Result<SearchResponse, SearchIndexError>;
}
