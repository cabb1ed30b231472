//! Document synchronizer.
//!
//! Projects committed records into search documents and writes them to the
//! index by record id.

use std::future::Future;

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use crate::config::SyncConfig;
use crate::listener::RecordCommitListener;
use post_search_repository::{
    BatchOperationSummary, IndexDescriptor, IndexSettingsOverrides, SearchIndexClient,
    SearchIndexError,
};
use post_search_shared::{Indexable, RecordOperation};

/// Writes record changes to one search index.
///
/// Holds a clone of the process-wide [`SearchIndexClient`] and the descriptor
/// of the index it maintains.
#[derive(Clone)]
pub struct DocumentSynchronizer {
    client: SearchIndexClient,
    index: IndexDescriptor,
    config: SyncConfig,
}

impl DocumentSynchronizer {
    /// Create a synchronizer with the default configuration.
    pub fn new(client: SearchIndexClient, index: IndexDescriptor) -> Self {
        Self::with_config(client, index, SyncConfig::default())
    }

    pub fn with_config(client: SearchIndexClient, index: IndexDescriptor, config: SyncConfig) -> Self {
        Self {
            client,
            index,
            config,
        }
    }

    /// Name of the maintained index.
    pub fn index_name(&self) -> &str {
        &self.index.name
    }

    /// Create the maintained index if it does not exist yet.
    ///
    /// Unlike commit handling, errors are returned: this runs at startup and
    /// in tooling, where the caller decides what a failure means.
    pub async fn ensure_index(&self, overrides: &IndexSettingsOverrides) -> Result<(), SearchIndexError> {
        self.client.create_index(&self.index, overrides).await
    }

    /// Apply one record change to the index.
    ///
    /// Create and update write the projected document under the record id,
    /// replacing any earlier version. Delete removes it; a document that is
    /// already gone counts as deleted.
    pub async fn apply<R>(&self, record: &R, operation: RecordOperation) -> Result<(), SearchIndexError>
    where
        R: Indexable + Sync,
    {
        let id = record.document_id();

        match operation {
            RecordOperation::Create | RecordOperation::Update => {
                let document = serde_json::to_value(record.to_document()).map_err(|e| {
                    SearchIndexError::parse(format!("Failed to serialize document: {}", e))
                })?;
                self.bounded(self.client.index_document(&self.index.name, &id, &document))
                    .await
            }
            RecordOperation::Delete => {
                self.bounded(self.client.delete_document(&self.index.name, &id))
                    .await
            }
        }
    }

    /// Re-sync existing records.
    ///
    /// Every record is indexed on its own; failures are collected in the
    /// summary instead of aborting the run. The index is refreshed at the end
    /// so the imported documents are searchable on return.
    #[instrument(skip(self, records), fields(index = %self.index.name))]
    pub async fn import<'a, R, I>(&self, records: I) -> BatchOperationSummary
    where
        R: Indexable + Sync + 'a,
        I: IntoIterator<Item = &'a R>,
    {
        let mut summary = BatchOperationSummary::default();

        for record in records {
            let id = record.document_id();
            let outcome = self.apply(record, RecordOperation::Create).await;
            if let Err(e) = &outcome {
                warn!(document_id = %id, error = %e, "Failed to import document");
            }
            summary.record(id, outcome);
        }

        if let Err(e) = self.bounded(self.client.refresh_index(&self.index.name)).await {
            warn!(error = %e, "Failed to refresh index after import");
        }

        info!(
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Import completed"
        );

        summary
    }

    /// Run an engine call under the configured timeout.
    async fn bounded<F>(&self, call: F) -> Result<(), SearchIndexError>
    where
        F: Future<Output = Result<(), SearchIndexError>>,
    {
        tokio::time::timeout(self.config.request_timeout, call)
            .await
            .map_err(|_| {
                SearchIndexError::connection(format!(
                    "Request timed out after {:?}",
                    self.config.request_timeout
                ))
            })?
    }
}

#[async_trait]
impl<R> RecordCommitListener<R> for DocumentSynchronizer
where
    R: Indexable + Send + Sync,
{
    async fn on_record_committed(&self, record: &R, operation: RecordOperation) {
        let id = record.document_id();

        match self.apply(record, operation).await {
            Ok(()) => {
                debug!(
                    index = %self.index.name,
                    document_id = %id,
                    operation = operation.as_str(),
                    "Synchronized document"
                );
            }
            Err(e) => {
                warn!(
                    index = %self.index.name,
                    document_id = %id,
                    operation = operation.as_str(),
                    error = %e,
                    "Failed to synchronize document"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use post_search_repository::{IndexSettings, SearchIndexProvider};
    use post_search_shared::{
        Author, ClusterHealth, EngineInfo, PostRecord, SearchRequest, SearchResponse,
    };
    use serde_json::Value;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Mutex;
    use uuid::Uuid;

    /// Mock search provider for testing.
    #[derive(Default)]
    struct MockProvider {
        indices: Mutex<HashSet<String>>,
        documents: Mutex<HashMap<String, Value>>,
        create_calls: AtomicUsize,
        refresh_calls: AtomicUsize,
        failing_ids: HashSet<String>,
        unreachable: AtomicBool,
        hang: AtomicBool,
    }

    impl MockProvider {
        async fn check(&self) -> Result<(), SearchIndexError> {
            if self.hang.load(Ordering::SeqCst) {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
            if self.unreachable.load(Ordering::SeqCst) {
                return Err(SearchIndexError::connection("connection refused"));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl SearchIndexProvider for MockProvider {
        async fn ping(&self) -> Result<(), SearchIndexError> {
            self.check().await
        }

        async fn info(&self) -> Result<EngineInfo, SearchIndexError> {
            self.check().await?;
            Ok(EngineInfo::default())
        }

        async fn index_exists(&self, index: &str) -> Result<bool, SearchIndexError> {
            self.check().await?;
            Ok(self.indices.lock().await.contains(index))
        }

        async fn create_index(
            &self,
            descriptor: &IndexDescriptor,
            _settings: &IndexSettings,
        ) -> Result<(), SearchIndexError> {
            self.check().await?;
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            self.indices.lock().await.insert(descriptor.name.clone());
            Ok(())
        }

        async fn delete_index(&self, index: &str) -> Result<(), SearchIndexError> {
            self.check().await?;
            self.indices.lock().await.remove(index);
            Ok(())
        }

        async fn refresh_index(&self, _index: &str) -> Result<(), SearchIndexError> {
            self.check().await?;
            self.refresh_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn cluster_health(&self) -> Result<ClusterHealth, SearchIndexError> {
            self.check().await?;
            Ok(ClusterHealth::default())
        }

        async fn index_document(
            &self,
            _index: &str,
            id: &str,
            document: &Value,
        ) -> Result<(), SearchIndexError> {
            self.check().await?;
            if self.failing_ids.contains(id) {
                return Err(SearchIndexError::response(500, "internal error"));
            }
            self.documents
                .lock()
                .await
                .insert(id.to_string(), document.clone());
            Ok(())
        }

        async fn get_document(
            &self,
            _index: &str,
            id: &str,
        ) -> Result<Option<Value>, SearchIndexError> {
            self.check().await?;
            Ok(self.documents.lock().await.get(id).cloned())
        }

        async fn delete_document(&self, _index: &str, id: &str) -> Result<(), SearchIndexError> {
            self.check().await?;
            self.documents.lock().await.remove(id);
            Ok(())
        }

        async fn search(
            &self,
            _index: &str,
            _request: &SearchRequest,
        ) -> Result<SearchResponse, SearchIndexError> {
            self.check().await?;
            Ok(SearchResponse::empty())
        }
    }

    fn synchronizer_with(provider: MockProvider) -> (DocumentSynchronizer, SearchIndexClient, Arc<MockProvider>) {
        let provider = Arc::new(provider);
        let client = SearchIndexClient::new(provider.clone());
        let synchronizer = DocumentSynchronizer::new(client.clone(), IndexDescriptor::posts());
        (synchronizer, client, provider)
    }

    fn post_by(name: &str) -> PostRecord {
        PostRecord::new("Hello", "First post", "published", Uuid::new_v4()).with_author(Author {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
        })
    }

    #[tokio::test]
    async fn test_create_indexes_projection_by_record_id() {
        let (synchronizer, client, _) = synchronizer_with(MockProvider::default());
        let post = post_by("Alice");

        synchronizer
            .on_record_committed(&post, RecordOperation::Create)
            .await;

        let stored = client
            .get_document("posts", &post.id.to_string())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored["title"], "Hello");
        assert_eq!(stored["author_name"], "Alice");
        assert!(stored.get("author_id").is_none());
        assert!(stored.get("email").is_none());
        assert!(stored.get("comments_count").is_none());
    }

    #[tokio::test]
    async fn test_update_overwrites_document() {
        let (synchronizer, _, provider) = synchronizer_with(MockProvider::default());
        let mut post = post_by("Alice");

        synchronizer
            .on_record_committed(&post, RecordOperation::Create)
            .await;
        post.title = "Edited".to_string();
        synchronizer
            .on_record_committed(&post, RecordOperation::Update)
            .await;

        let documents = provider.documents.lock().await;
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[&post.id.to_string()]["title"], "Edited");
    }

    #[tokio::test]
    async fn test_delete_then_resync() {
        let (synchronizer, client, _) = synchronizer_with(MockProvider::default());
        let post = post_by("Alice");
        let id = post.id.to_string();

        synchronizer
            .on_record_committed(&post, RecordOperation::Create)
            .await;
        synchronizer
            .on_record_committed(&post, RecordOperation::Delete)
            .await;
        assert!(client.get_document("posts", &id).await.unwrap().is_none());

        // Deleting again is harmless.
        synchronizer
            .on_record_committed(&post, RecordOperation::Delete)
            .await;

        synchronizer
            .on_record_committed(&post, RecordOperation::Create)
            .await;
        assert!(client.get_document("posts", &id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_failures_are_not_propagated() {
        let provider = MockProvider::default();
        provider.unreachable.store(true, Ordering::SeqCst);
        let (synchronizer, _, provider) = synchronizer_with(provider);
        let post = post_by("Alice");

        let listener: &dyn RecordCommitListener<PostRecord> = &synchronizer;
        listener.on_record_committed(&post, RecordOperation::Create).await;
        listener.on_record_committed(&post, RecordOperation::Delete).await;

        assert!(provider.documents.lock().await.is_empty());
        assert!(synchronizer
            .apply(&post, RecordOperation::Create)
            .await
            .unwrap_err()
            .is_transport());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_engine_is_bounded_by_timeout() {
        let provider = MockProvider::default();
        provider.hang.store(true, Ordering::SeqCst);
        let provider = Arc::new(provider);
        let synchronizer = DocumentSynchronizer::with_config(
            SearchIndexClient::new(provider.clone()),
            IndexDescriptor::posts(),
            SyncConfig::default().with_request_timeout(Duration::from_secs(2)),
        );
        let post = post_by("Alice");

        let started = tokio::time::Instant::now();
        synchronizer
            .on_record_committed(&post, RecordOperation::Create)
            .await;

        assert!(started.elapsed() >= Duration::from_secs(2));
        assert!(started.elapsed() < Duration::from_secs(3));

        let err = synchronizer
            .apply(&post, RecordOperation::Create)
            .await
            .unwrap_err();
        assert!(matches!(err, SearchIndexError::ConnectionError(_)));
    }

    #[tokio::test]
    async fn test_import_summarizes_failures() {
        let posts = vec![post_by("Alice"), post_by("Bob"), post_by("Carol")];
        let failing = posts[1].id.to_string();
        let (synchronizer, _, provider) = synchronizer_with(MockProvider {
            failing_ids: HashSet::from([failing.clone()]),
            ..MockProvider::default()
        });

        let summary = synchronizer.import(&posts).await;

        assert_eq!(summary.total, 3);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        let failed: Vec<_> = summary.results.iter().filter(|r| !r.success).collect();
        assert_eq!(failed[0].document_id, failing);
        assert!(failed[0].error.is_some());
        assert_eq!(provider.documents.lock().await.len(), 2);
        assert_eq!(provider.refresh_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_import_empty() {
        let (synchronizer, _, _) = synchronizer_with(MockProvider::default());

        let summary = synchronizer.import(&Vec::<PostRecord>::new()).await;

        assert_eq!(summary.total, 0);
        assert!(summary.results.is_empty());
    }

    #[tokio::test]
    async fn test_ensure_index_creates_once() {
        let (synchronizer, client, provider) = synchronizer_with(MockProvider::default());

        synchronizer
            .ensure_index(&IndexSettingsOverrides::none())
            .await
            .unwrap();
        synchronizer
            .ensure_index(&IndexSettingsOverrides::none())
            .await
            .unwrap();

        assert_eq!(provider.create_calls.load(Ordering::SeqCst), 1);
        assert!(client.index_exists(synchronizer.index_name()).await.unwrap());
    }

    #[tokio::test]
    async fn test_ensure_index_propagates_errors() {
        let provider = MockProvider::default();
        provider.unreachable.store(true, Ordering::SeqCst);
        let (synchronizer, _, _) = synchronizer_with(provider);

        let result = synchronizer.ensure_index(&IndexSettingsOverrides::none()).await;

        assert!(matches!(result, Err(SearchIndexError::ConnectionError(_))));
    }
}
