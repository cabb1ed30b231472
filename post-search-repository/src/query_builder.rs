//! Post query builder.
//!
//! Turns user-facing search parameters into typed [`SearchRequest`]s. Nothing
//! here talks to the engine; execute the result with
//! [`SearchIndexClient::search`](crate::SearchIndexClient::search).

use post_search_shared::{FieldBoost, QueryClause, SearchOptions, SearchRequest};

/// Page size used when the caller gives none (or a non-positive one).
pub const DEFAULT_PER_PAGE: u64 = 20;

/// Number of autocomplete suggestions returned.
pub const SUGGESTION_SIZE: u64 = 10;

/// Fields searched by [`build_search`], title weighted double.
pub fn search_fields() -> Vec<FieldBoost> {
    vec![
        FieldBoost::boosted("title", 2.0),
        FieldBoost::new("body"),
        FieldBoost::new("author_name"),
    ]
}

/// Build the full-text post search.
///
/// The query string is passed through untouched, empty included. A `status`
/// option wraps the match in a bool query with an exact `status` filter.
pub fn build_search(query: &str, options: &SearchOptions) -> SearchRequest {
    let base = QueryClause::MultiMatch {
        query: query.to_string(),
        fields: search_fields(),
    };

    let clause = match options.status.as_deref() {
        Some(status) if !status.is_empty() => QueryClause::Bool {
            must: vec![base],
            filter: vec![QueryClause::Term {
                field: "status".to_string(),
                value: status.to_string(),
            }],
        },
        _ => base,
    };

    let per_page = positive_or(options.per_page, DEFAULT_PER_PAGE);
    let page = positive_or(options.page, 1);

    SearchRequest {
        query: clause,
        from: Some((page - 1).saturating_mul(per_page)),
        size: per_page,
    }
}

/// Build the title autocomplete request for a typed prefix.
pub fn build_suggestions(prefix: &str) -> SearchRequest {
    SearchRequest {
        query: QueryClause::MatchPhrasePrefix {
            field: "title".to_string(),
            query: prefix.to_string(),
        },
        from: None,
        size: SUGGESTION_SIZE,
    }
}

fn positive_or(value: Option<i64>, default: u64) -> u64 {
    match value {
        Some(v) if v >= 1 => v as u64,
        _ => default,
    }
}
