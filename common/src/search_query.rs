//! Backend-agnostic description of one search request.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationRequest {
    pub field: String,
    pub size: u64,
}

/// Structured query compiled from a [`crate::search_state::SearchState`].
///
/// Two specs are built per search cycle: the data spec returns documents and
/// facet aggregations for the selected collections, the count spec returns no
/// documents and a single per-collection aggregation over every known
/// collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct QuerySpec {
    pub target_collection_ids: Vec<String>,
    pub full_text_query: String,
    /// Backend keyword field to accepted values.
    pub filter_clauses: IndexMap<String, Vec<String>>,
    /// Aggregation name to terms aggregation.
    pub aggregation_requests: IndexMap<String, AggregationRequest>,
    pub page_offset: u64,
    pub page_size: u64,
    /// Fields the full-text query runs against.
    pub field_projection: Vec<String>,
    /// Fields removed from returned documents.
    pub excluded_fields: Vec<String>,
}

/// Which collections a search page may target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionMode {
    /// Only the named collection is searched; `collection[]` is ignored.
    Single { site_collection_title: String },
    /// Any subset selected through `collection[]`, all collections by default.
    Multi,
}

impl CollectionMode {
    pub fn is_multi(&self) -> bool {
        matches!(self, Self::Multi)
    }
}
