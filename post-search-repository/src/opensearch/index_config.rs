//! OpenSearch index settings and mappings.
//!
//! Renders an [`IndexDescriptor`] into the body of an index creation request.

use serde_json::{json, Map, Value};

use crate::types::{IndexDescriptor, IndexSettings};

/// Build the index creation body from a descriptor and the effective settings.
///
/// The descriptor's own settings are ignored here; callers pass the settings
/// after overrides were merged in.
pub fn create_index_body(descriptor: &IndexDescriptor, settings: &IndexSettings) -> Value {
    let mut properties = Map::new();
    for field in &descriptor.mappings {
        let mut mapping = Map::new();
        mapping.insert("type".to_string(), json!(field.field_type.as_str()));
        if let Some(analyzer) = &field.analyzer {
            mapping.insert("analyzer".to_string(), json!(analyzer));
        }
        properties.insert(field.name.clone(), Value::Object(mapping));
    }

    json!({
        "settings": {
            "number_of_shards": settings.number_of_shards,
            "number_of_replicas": settings.number_of_replicas
        },
        "mappings": {
            "properties": properties
        }
    })
}
