//! Index descriptors and batch operation results.

use crate::errors::SearchIndexError;

/// Default number of primary shards for a new index.
pub const DEFAULT_SHARDS: u32 = 1;

/// Default number of replicas for a new index.
pub const DEFAULT_REPLICAS: u32 = 0;

/// Name of the posts index.
pub const POSTS_INDEX: &str = "posts";

/// Shard and replica settings of an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSettings {
    pub number_of_shards: u32,
    pub number_of_replicas: u32,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            number_of_shards: DEFAULT_SHARDS,
            number_of_replicas: DEFAULT_REPLICAS,
        }
    }
}

impl IndexSettings {
    /// Shallow merge: every override that is set replaces the current value.
    pub fn merge(&self, overrides: &IndexSettingsOverrides) -> Self {
        Self {
            number_of_shards: overrides.number_of_shards.unwrap_or(self.number_of_shards),
            number_of_replicas: overrides
                .number_of_replicas
                .unwrap_or(self.number_of_replicas),
        }
    }
}

/// Caller-supplied overrides applied on top of an index's settings at creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexSettingsOverrides {
    pub number_of_shards: Option<u32>,
    pub number_of_replicas: Option<u32>,
}

impl IndexSettingsOverrides {
    /// No overrides.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_shards(mut self, shards: u32) -> Self {
        self.number_of_shards = Some(shards);
        self
    }

    pub fn with_replicas(mut self, replicas: u32) -> Self {
        self.number_of_replicas = Some(replicas);
        self
    }
}

/// Type of a mapped field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Analyzed full text.
    Text,
    /// Exact value, used for filtering.
    Keyword,
    Date,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Keyword => "keyword",
            Self::Date => "date",
        }
    }
}

/// A single field of an index mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    pub name: String,
    pub field_type: FieldType,
    pub analyzer: Option<String>,
}

impl FieldMapping {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            analyzer: None,
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Text)
    }

    pub fn keyword(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Keyword)
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Date)
    }

    pub fn with_analyzer(mut self, analyzer: impl Into<String>) -> Self {
        self.analyzer = Some(analyzer.into());
        self
    }
}

/// Name, settings and field mappings of an index.
///
/// Fixed once the index exists in the engine; changing mappings needs a new
/// index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDescriptor {
    pub name: String,
    pub settings: IndexSettings,
    pub mappings: Vec<FieldMapping>,
}

impl IndexDescriptor {
    /// Create a descriptor with default settings and no mapped fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            settings: IndexSettings::default(),
            mappings: Vec::new(),
        }
    }

    pub fn with_settings(mut self, settings: IndexSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_field(mut self, field: FieldMapping) -> Self {
        self.mappings.push(field);
        self
    }

    /// The descriptor of the posts index.
    pub fn posts() -> Self {
        Self::new(POSTS_INDEX)
            .with_field(FieldMapping::text("title").with_analyzer("standard"))
            .with_field(FieldMapping::text("body").with_analyzer("standard"))
            .with_field(FieldMapping::keyword("author_name"))
            .with_field(FieldMapping::date("created_at"))
            .with_field(FieldMapping::date("updated_at"))
            .with_field(FieldMapping::keyword("status"))
    }

    /// Check the descriptor before sending it to the engine.
    pub fn validate(&self) -> Result<(), SearchIndexError> {
        if self.name.trim().is_empty() {
            return Err(SearchIndexError::invalid_argument("index name is required"));
        }
        if self.name.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(SearchIndexError::invalid_argument(format!(
                "index name must be lowercase: {}",
                self.name
            )));
        }
        for (i, field) in self.mappings.iter().enumerate() {
            if field.name.trim().is_empty() {
                return Err(SearchIndexError::invalid_argument("mapped field name is required"));
            }
            if self.mappings[..i].iter().any(|other| other.name == field.name) {
                return Err(SearchIndexError::invalid_argument(format!(
                    "field {} is mapped twice",
                    field.name
                )));
            }
        }
        Ok(())
    }
}

/// Result of a batch operation for a single item.
#[derive(Debug, Clone)]
pub struct BatchOperationResult {
    /// The document id the operation targeted.
    pub document_id: String,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Error if the operation failed.
    pub error: Option<SearchIndexError>,
}

/// Summary of a batch operation containing aggregate statistics and individual results.
///
/// Lets callers handle partial failures without aborting the whole batch.
#[derive(Debug, Clone, Default)]
pub struct BatchOperationSummary {
    /// Total number of items in the batch.
    pub total: usize,
    /// Number of successful operations.
    pub succeeded: usize,
    /// Number of failed operations.
    pub failed: usize,
    /// Individual results for each item.
    pub results: Vec<BatchOperationResult>,
}

impl BatchOperationSummary {
    /// Record the outcome of one item.
    pub fn record(&mut self, document_id: impl Into<String>, outcome: Result<(), SearchIndexError>) {
        self.total += 1;
        let result = match outcome {
            Ok(()) => {
                self.succeeded += 1;
                BatchOperationResult {
                    document_id: document_id.into(),
                    success: true,
                    error: None,
                }
            }
            Err(e) => {
                self.failed += 1;
                BatchOperationResult {
                    document_id: document_id.into(),
                    success: false,
                    error: Some(e),
                }
            }
        };
        self.results.push(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = IndexSettings::default();
        assert_eq!(settings.number_of_shards, 1);
        assert_eq!(settings.number_of_replicas, 0);
    }

    #[test]
    fn test_merge_overrides() {
        let settings = IndexSettings::default();

        let merged = settings.merge(&IndexSettingsOverrides::none().with_replicas(2));
        assert_eq!(merged.number_of_shards, 1);
        assert_eq!(merged.number_of_replicas, 2);

        let merged = settings.merge(&IndexSettingsOverrides::none());
        assert_eq!(merged, settings);

        let merged = settings.merge(&IndexSettingsOverrides::none().with_shards(3).with_replicas(1));
        assert_eq!(merged.number_of_shards, 3);
        assert_eq!(merged.number_of_replicas, 1);
    }

    #[test]
    fn test_posts_descriptor() {
        let descriptor = IndexDescriptor::posts();

        assert_eq!(descriptor.name, "posts");
        assert_eq!(descriptor.settings, IndexSettings::default());
        let names: Vec<&str> = descriptor.mappings.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["title", "body", "author_name", "created_at", "updated_at", "status"]
        );
        assert_eq!(descriptor.mappings[0].analyzer.as_deref(), Some("standard"));
        assert_eq!(descriptor.mappings[5].field_type, FieldType::Keyword);
        assert!(descriptor.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_descriptors() {
        assert!(IndexDescriptor::new("").validate().is_err());
        assert!(IndexDescriptor::new("Posts").validate().is_err());

        let duplicated = IndexDescriptor::new("posts")
            .with_field(FieldMapping::keyword("status"))
            .with_field(FieldMapping::text("status"));
        let err = duplicated.validate().unwrap_err();
        assert!(matches!(err, SearchIndexError::InvalidArgument(_)));
        assert!(!err.is_transport());
    }

    #[test]
    fn test_batch_summary_record() {
        let mut summary = BatchOperationSummary::default();
        summary.record("a", Ok(()));
        summary.record("b", Err(SearchIndexError::connection("refused")));

        assert_eq!(summary.total, 2);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 1);
        assert!(summary.results[0].success);
        assert_eq!(summary.results[1].document_id, "b");
        assert!(summary.results[1].error.is_some());
    }
}
