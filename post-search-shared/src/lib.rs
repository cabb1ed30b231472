//! # Post Search Shared
//!
//! Plain data types shared by the post search crates: source records and
//! their indexable projections, typed search requests and responses, and
//! cluster health reports.

pub mod document;
pub mod health;
pub mod search;

pub use document::{Author, Indexable, PostDocument, PostRecord, RecordOperation};
pub use health::{ClusterHealth, EngineInfo, HealthStatus};
pub use search::{
    FieldBoost, QueryClause, SearchHit, SearchOptions, SearchRequest, SearchResponse,
};
