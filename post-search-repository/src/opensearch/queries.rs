//! OpenSearch query rendering.
//!
//! This module renders typed search requests into the engine's query DSL and
//! parses search responses back.

use serde_json::{json, Map, Value};

use crate::errors::SearchIndexError;
use post_search_shared::{FieldBoost, QueryClause, SearchHit, SearchRequest, SearchResponse};

/// Render a search request into a request body.
pub fn render_request(request: &SearchRequest) -> Value {
    let mut body = json!({
        "query": render_clause(&request.query),
        "size": request.size,
    });

    if let Some(from) = request.from {
        body["from"] = json!(from);
    }

    body
}

/// Render a single query clause.
pub fn render_clause(clause: &QueryClause) -> Value {
    match clause {
        QueryClause::MultiMatch { query, fields } => {
            let fields: Vec<String> = fields.iter().map(render_field).collect();
            json!({
                "multi_match": {
                    "query": query,
                    "fields": fields
                }
            })
        }
        QueryClause::MatchPhrasePrefix { field, query } => {
            let mut inner = Map::new();
            inner.insert(field.clone(), json!(query));
            json!({ "match_phrase_prefix": inner })
        }
        QueryClause::Term { field, value } => {
            let mut inner = Map::new();
            inner.insert(field.clone(), json!(value));
            json!({ "term": inner })
        }
        QueryClause::Bool { must, filter } => {
            let mut inner = Map::new();
            if !must.is_empty() {
                inner.insert(
                    "must".to_string(),
                    Value::Array(must.iter().map(render_clause).collect()),
                );
            }
            if !filter.is_empty() {
                inner.insert(
                    "filter".to_string(),
                    Value::Array(filter.iter().map(render_clause).collect()),
                );
            }
            json!({ "bool": inner })
        }
    }
}

/// Render `field^boost`, leaving neutral weights implicit.
fn render_field(field: &FieldBoost) -> String {
    if field.boost == 1.0 {
        field.field.clone()
    } else {
        format!("{}^{}", field.field, field.boost)
    }
}

/// Parse a search response body.
pub fn parse_search_response(body: &Value) -> Result<SearchResponse, SearchIndexError> {
    let hits = body
        .get("hits")
        .ok_or_else(|| SearchIndexError::parse("Search response has no hits"))?;

    // `hits.total` is an object on recent engines and a bare number on old ones.
    let total = match hits.get("total") {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(total) => total.get("value").and_then(Value::as_u64).unwrap_or(0),
        None => 0,
    };

    let hits = hits
        .get("hits")
        .and_then(Value::as_array)
        .map(|hits| hits.iter().filter_map(parse_hit).collect())
        .unwrap_or_default();

    Ok(SearchResponse { total, hits })
}

/// Parse a single hit, skipping hits without an id.
fn parse_hit(hit: &Value) -> Option<SearchHit> {
    let id = hit.get("_id")?.as_str()?.to_string();
    Some(SearchHit {
        id,
        score: hit.get("_score").and_then(Value::as_f64),
        source: hit.get("_source").cloned().unwrap_or(Value::Null),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_builder::{build_search, build_suggestions};
    use post_search_shared::SearchOptions;

    #[test]
    fn test_render_search_without_filter() {
        let body = render_request(&build_search("ruby on rails", &SearchOptions::new()));

        assert_eq!(body["query"]["multi_match"]["query"], "ruby on rails");
        assert_eq!(
            body["query"]["multi_match"]["fields"],
            json!(["title^2", "body", "author_name"])
        );
        assert!(body["query"].get("bool").is_none());
        assert_eq!(body["from"], 0);
        assert_eq!(body["size"], 20);
    }

    #[test]
    fn test_render_search_with_status_filter() {
        let options = SearchOptions::new()
            .with_status("published")
            .with_page(3)
            .with_per_page(10);
        let body = render_request(&build_search("elasticsearch", &options));

        let bool_query = &body["query"]["bool"];
        assert_eq!(bool_query["must"][0]["multi_match"]["query"], "elasticsearch");
        assert_eq!(bool_query["filter"][0]["term"]["status"], "published");
        assert_eq!(body["from"], 20);
        assert_eq!(body["size"], 10);
    }

    #[test]
    fn test_render_suggestions() {
        let body = render_request(&build_suggestions("ela"));

        assert_eq!(body["query"]["match_phrase_prefix"]["title"], "ela");
        assert_eq!(body["size"], 10);
        assert!(body.get("from").is_none());
    }

    #[test]
    fn test_render_fractional_boost() {
        let clause = QueryClause::MultiMatch {
            query: "q".to_string(),
            fields: vec![FieldBoost::boosted("name", 1.5)],
        };
        assert_eq!(render_clause(&clause)["multi_match"]["fields"][0], "name^1.5");
    }

    #[test]
    fn test_parse_search_response() {
        let body = json!({
            "took": 3,
            "hits": {
                "total": { "value": 42, "relation": "eq" },
                "max_score": 1.5,
                "hits": [
                    {
                        "_index": "posts",
                        "_id": "550e8400-e29b-41d4-a716-446655440000",
                        "_score": 1.5,
                        "_source": { "title": "Test Post" }
                    },
                    {
                        "_index": "posts",
                        "_score": 1.0,
                        "_source": { "title": "Missing id" }
                    }
                ]
            }
        });

        let response = parse_search_response(&body).unwrap();

        assert_eq!(response.total, 42);
        assert_eq!(response.hits.len(), 1);
        assert_eq!(response.hits[0].score, Some(1.5));
        assert_eq!(response.hits[0].source["title"], "Test Post");
    }

    #[test]
    fn test_parse_legacy_total() {
        let body = json!({ "hits": { "total": 7, "hits": [] } });

        let response = parse_search_response(&body).unwrap();

        assert_eq!(response.total, 7);
        assert!(response.is_empty());
    }

    #[test]
    fn test_parse_invalid_response() {
        let result = parse_search_response(&json!({ "error": "boom" }));
        assert!(matches!(result, Err(SearchIndexError::ParseError(_))));
    }
}
