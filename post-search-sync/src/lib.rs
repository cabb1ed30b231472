//! # Post Search Sync
//!
//! Keeps the search index in step with the record store.
//!
//! The persistence layer calls a [`RecordCommitListener`] after each record
//! transaction commits. [`DocumentSynchronizer`] implements it by projecting
//! the record into its search document and writing it by record id, or
//! deleting the document when the record was deleted.
//!
//! Index writes never fail the commit that triggered them: errors and
//! timeouts are logged and dropped. Use [`DocumentSynchronizer::import`] to
//! re-sync existing records in bulk.

pub mod config;
pub mod listener;
pub mod synchronizer;

pub use config::SyncConfig;
pub use listener::RecordCommitListener;
pub use synchronizer::DocumentSynchronizer;
