//! Query DSL helpers for search requests.

use common::search_query::QuerySpec;
use serde_json::{Value, json};

/// The full-text plus filter clause shared by the data and count requests.
pub fn build_query_clause(spec: &QuerySpec) -> Value {
    let query_string = spec.full_text_query.trim();

    let must = if query_string.is_empty() {
        json!({ "match_all": {} })
    } else {
        json!({
            "simple_query_string": {
                "query": query_string,
                "fields": spec.field_projection,
                "default_operator": "and",
            }
        })
    };

    let filter = spec
        .filter_clauses
        .iter()
        .filter(|(_, values)| !values.is_empty())
        .map(|(field_name, values)| {
            let mut terms = serde_json::Map::new();
            terms.insert(field_name.clone(), json!(values));
            json!({ "terms": terms })
        })
        .collect::<Vec<_>>();

    json!({
        "bool": {
            "must": [must],
            "filter": filter,
        }
    })
}

/// Serializes a spec into an Elasticsearch `_search` request body.
pub fn build_request_body(spec: &QuerySpec) -> Value {
    let mut body = json!({
        "query": build_query_clause(spec),
        "from": spec.page_offset,
        "size": spec.page_size,
    });

    if !spec.excluded_fields.is_empty() {
        body["_source"] = json!({ "excludes": spec.excluded_fields });
    }

    if !spec.aggregation_requests.is_empty() {
        let aggs = spec
            .aggregation_requests
            .iter()
            .map(|(name, agg)| {
                (name.clone(), json!({ "terms": { "field": agg.field, "size": agg.size } }))
            })
            .collect::<serde_json::Map<_, _>>();
        body["aggs"] = Value::Object(aggs);
    }

    body
}
