//! Runs the data and count queries together and merges their responses.

use std::collections::HashSet;

use common::{
    collection_directory::CollectionDirectory,
    search_const::COLLECTION_FACET,
    search_query::QuerySpec,
    search_result::{FacetBucket, SearchHit, SearchResponse},
};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::{
    api::search::query_dsl::build_request_body,
    db_utils::elasticsearch_utils::{RawSearchResultAggregation, RawSearchResultAggregationBucket, SearchBackend},
    error::{SearchError, SearchResult},
};

fn bucket_key_to_string(value: &Value) -> SearchResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(SearchError::MalformedResponse(format!("Invalid aggregation bucket key: {:#?}", value))),
    }
}

fn convert_buckets(buckets: Vec<RawSearchResultAggregationBucket>) -> SearchResult<Vec<FacetBucket>> {
    buckets
        .into_iter()
        .map(|bucket| -> SearchResult<FacetBucket> {
            Ok(FacetBucket { key: bucket_key_to_string(&bucket.key)?, doc_count: bucket.doc_count })
        })
        .collect()
}

/// Adds a zero bucket for every known collection the count response left out,
/// then swaps collection ids for their titles.
pub fn reconcile_collection_buckets(
    mut buckets: Vec<FacetBucket>,
    directory: &CollectionDirectory,
) -> SearchResult<Vec<FacetBucket>> {
    let represented = buckets.iter().map(|b| b.key.clone()).collect::<HashSet<_>>();
    for id in directory.all_ids() {
        if !represented.contains(&id) {
            buckets.push(FacetBucket::new(id, 0));
        }
    }

    buckets
        .into_iter()
        .map(|bucket| match directory.title_for_id(&bucket.key) {
            Some(title) => Ok(FacetBucket::new(title, bucket.doc_count)),
            None => Err(SearchError::Reconciliation(bucket.key)),
        })
        .collect()
}

/// Dispatches both specs concurrently and returns once both have completed.
/// A failure of either request fails the whole search.
pub async fn execute_search<B: SearchBackend>(
    backend: &B,
    directory: &CollectionDirectory,
    data_spec: &QuerySpec,
    count_spec: &QuerySpec,
) -> SearchResult<SearchResponse> {
    let data_body = build_request_body(data_spec);
    let count_body = build_request_body(count_spec);

    let (data_response, count_response) = futures::try_join!(
        backend.search::<Map<String, Value>>(&data_spec.target_collection_ids, &data_body),
        backend.search::<Value>(&count_spec.target_collection_ids, &count_body),
    )?;

    let mut raw_aggregations = data_response.aggregations.unwrap_or_default();
    let mut facet_aggregations = IndexMap::new();
    for name in data_spec.aggregation_requests.keys() {
        let aggregation = raw_aggregations.remove(name).unwrap_or_else(|| {
            debug!("Aggregation {} missing from search response", name);
            RawSearchResultAggregation::default()
        });
        facet_aggregations.insert(name.clone(), convert_buckets(aggregation.buckets)?);
    }

    let collection_aggregation = count_response
        .aggregations
        .and_then(|mut aggs| aggs.remove(COLLECTION_FACET))
        .ok_or_else(|| SearchError::MalformedResponse("count response has no collection aggregation".to_string()))?;
    let collection_aggregation = reconcile_collection_buckets(convert_buckets(collection_aggregation.buckets)?, directory)?;

    let hits = data_response
        .hits
        .hits
        .into_iter()
        .map(|hit| SearchHit { collection_id: hit._index, document_id: hit._id, source: hit._source })
        .collect::<Vec<_>>();

    let total_hits = data_response.hits.total.value();
    info!("Search returned {} of {} hits", hits.len(), total_hits);

    Ok(SearchResponse { hits, total_hits, facet_aggregations, collection_aggregation })
}
