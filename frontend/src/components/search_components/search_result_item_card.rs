//! Result card view models.

use common::{
    search_result::SearchHit,
    view_models::{ResultDetailView, ResultItemView},
};
use serde_json::Value;

use crate::components::search_components::search_facets::snake_to_title_case;

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(display_value).collect::<Vec<_>>().join(","),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn string_field(hit: &SearchHit, name: &str) -> Option<String> {
    hit.source.get(name).map(display_value)
}

/// The first display field is the title; every other display field present in
/// the document becomes a `Title Case: value` line.
pub fn build_result_item(hit: &SearchHit, display_fields: &[String]) -> ResultItemView {
    let title = display_fields
        .first()
        .and_then(|field| string_field(hit, field))
        .or_else(|| hit.document_id.clone())
        .unwrap_or_default();

    let details = display_fields
        .iter()
        .skip(1)
        .filter_map(|field| {
            hit.source
                .get(field)
                .map(|value| ResultDetailView { label: snake_to_title_case(field), value: display_value(value) })
        })
        .collect();

    ResultItemView {
        url: string_field(hit, "url"),
        thumbnail_url: string_field(hit, "thumbnailContentUrl"),
        title,
        details,
    }
}

pub fn build_result_items(hits: &[SearchHit], display_fields: &[String]) -> Vec<ResultItemView> {
    hits.iter().map(|hit| build_result_item(hit, display_fields)).collect()
}
