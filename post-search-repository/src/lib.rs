//! # Post Search Repository
//!
//! This crate provides the client for the search engine backing post search.
//! It includes connection configuration, error definitions, the provider
//! interface with its OpenSearch implementation, index descriptors, and the
//! post query builder.

pub mod client;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod query_builder;
pub mod types;

pub use client::SearchIndexClient;
pub use config::{ConnectionConfig, Environment, RetryPolicy};
pub use errors::SearchIndexError;
pub use interfaces::SearchIndexProvider;
pub use opensearch::OpenSearchClient;
pub use query_builder::{build_search, build_suggestions};
pub use types::{
    BatchOperationResult, BatchOperationSummary, FieldMapping, FieldType, IndexDescriptor,
    IndexSettings, IndexSettingsOverrides, POSTS_INDEX,
};
