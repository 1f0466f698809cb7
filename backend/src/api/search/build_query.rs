//! Compiles a decoded search state into the data and count query specs.

use common::{
    collection_directory::CollectionDirectory,
    search_const::{ALL_FIELDS, BULK_CONTENT_FIELD, COLLECTION_FACET, COLLECTION_ID_FIELD, FACET_BUCKET_LIMIT},
    search_query::{AggregationRequest, CollectionMode, QuerySpec},
    search_state::{SearchState, exact_match_field},
};
use indexmap::IndexMap;

use crate::error::{SearchError, SearchResult};

/// Resolves the collection titles a state targets into backend ids.
fn resolve_target_collection_ids(
    state: &SearchState,
    directory: &CollectionDirectory,
    mode: &CollectionMode,
) -> SearchResult<Vec<String>> {
    let titles: Vec<&str> = match mode {
        CollectionMode::Single { site_collection_title } => vec![site_collection_title.as_str()],
        CollectionMode::Multi => match &state.selected_collection_titles {
            Some(titles) => titles.iter().map(String::as_str).collect(),
            None => return Ok(directory.all_ids()),
        },
    };

    titles
        .into_iter()
        .map(|title| {
            directory
                .id_for_title(title)
                .map(str::to_string)
                .ok_or_else(|| SearchError::UnknownCollection(title.to_string()))
        })
        .collect()
}

pub fn build_data_query(
    state: &SearchState,
    directory: &CollectionDirectory,
    faceted_fields: &[String],
    mode: &CollectionMode,
) -> SearchResult<QuerySpec> {
    let target_collection_ids = resolve_target_collection_ids(state, directory, mode)?;

    let filter_clauses = state
        .filters
        .iter()
        .filter(|(_, filter)| !filter.values.is_empty())
        .map(|(name, filter)| (exact_match_field(name), filter.values.iter().cloned().collect::<Vec<_>>()))
        .collect::<IndexMap<_, _>>();

    let aggregation_requests = faceted_fields
        .iter()
        .map(|name| {
            (name.clone(), AggregationRequest { field: exact_match_field(name), size: FACET_BUCKET_LIMIT })
        })
        .collect::<IndexMap<_, _>>();

    let field_projection = if state.fields.is_empty() {
        vec![ALL_FIELDS.to_string()]
    } else {
        state.fields.clone()
    };

    Ok(QuerySpec {
        target_collection_ids,
        full_text_query: state.query_text.clone(),
        filter_clauses,
        aggregation_requests,
        page_offset: state.start,
        page_size: state.size,
        field_projection,
        excluded_fields: vec![BULK_CONTENT_FIELD.to_string()],
    })
}

/// Count variant of `data_spec`: no documents, one bucket per collection,
/// issued against every known collection.
pub fn build_count_query(data_spec: &QuerySpec, all_collection_ids: &[String]) -> QuerySpec {
    let mut aggregation_requests = IndexMap::new();
    aggregation_requests.insert(
        COLLECTION_FACET.to_string(),
        AggregationRequest { field: COLLECTION_ID_FIELD.to_string(), size: all_collection_ids.len() as u64 },
    );

    QuerySpec {
        target_collection_ids: all_collection_ids.to_vec(),
        full_text_query: data_spec.full_text_query.clone(),
        filter_clauses: data_spec.filter_clauses.clone(),
        aggregation_requests,
        page_offset: 0,
        page_size: 0,
        field_projection: data_spec.field_projection.clone(),
        excluded_fields: vec![],
    }
}
