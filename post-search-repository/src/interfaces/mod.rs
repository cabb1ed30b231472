//! Interface definitions for the search engine backend.
//!
//! The `SearchIndexProvider` trait allows swapping the engine implementation
//! and injecting mocks in tests.

mod search_index_provider;

pub use search_index_provider::SearchIndexProvider;
