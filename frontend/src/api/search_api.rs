//! Frontend entry point into the backend search calls.

use backend::{
    api::search::{build_count_query, build_data_query, execute_search},
    db_utils::elasticsearch_utils::SearchBackend,
    error::SearchResult,
};
use common::{collection_directory::CollectionDirectory, search_result::SearchResponse, search_state::SearchState};

use crate::config::SearchPageConfig;

/// Builds the data and count specs for `state` and runs them together.
pub async fn search<B: SearchBackend>(
    backend: &B,
    directory: &CollectionDirectory,
    config: &SearchPageConfig,
    state: &SearchState,
) -> SearchResult<SearchResponse> {
    let data_spec = build_data_query(state, directory, &config.faceted_fields, &config.collection_mode)?;
    let count_spec = build_count_query(&data_spec, &directory.all_ids());
    execute_search(backend, directory, &data_spec, &count_spec).await
}
