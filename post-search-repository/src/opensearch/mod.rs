//! OpenSearch implementation of the search index provider.
//!
//! This module provides a concrete implementation of `SearchIndexProvider`
//! using OpenSearch as the backend.

mod client;
pub mod index_config;
pub mod queries;

pub use client::OpenSearchClient;
