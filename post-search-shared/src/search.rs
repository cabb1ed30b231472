//! Typed search requests and responses.
//!
//! These types describe a search without committing to the engine's query
//! DSL. The repository crate renders them into request bodies.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// A field taking part in a multi-field match, with its relative weight.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldBoost {
    pub field: String,
    pub boost: f64,
}

impl FieldBoost {
    /// A field with the neutral weight of 1.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            boost: 1.0,
        }
    }

    pub fn boosted(field: impl Into<String>, boost: f64) -> Self {
        Self {
            field: field.into(),
            boost,
        }
    }
}

/// A query clause.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryClause {
    /// Full-text match of `query` across several weighted fields.
    MultiMatch {
        query: String,
        fields: Vec<FieldBoost>,
    },
    /// Phrase match where the last term is treated as a prefix.
    MatchPhrasePrefix { field: String, query: String },
    /// Exact value match on a keyword field.
    Term { field: String, value: String },
    /// Scored `must` clauses combined with unscored `filter` clauses.
    Bool {
        must: Vec<QueryClause>,
        filter: Vec<QueryClause>,
    },
}

/// A fully assembled search request.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: QueryClause,
    /// Offset of the first hit; `None` leaves it to the engine.
    pub from: Option<u64>,
    pub size: u64,
}

/// Caller-facing search parameters.
///
/// Page numbers start at 1. Values below 1 fall back to the defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOptions {
    pub status: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only match documents with this exact status.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_page(mut self, page: i64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_per_page(mut self, per_page: i64) -> Self {
        self.per_page = Some(per_page);
        self
    }
}

/// A single search hit.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub id: String,
    pub score: Option<f64>,
    pub source: Value,
}

impl SearchHit {
    /// Deserialize the stored document.
    pub fn source_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.source.clone())
    }
}

/// Results of an executed search, ordered by relevance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResponse {
    /// Total number of matching documents, across all pages.
    pub total: u64,
    pub hits: Vec<SearchHit>,
}

impl SearchResponse {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}
