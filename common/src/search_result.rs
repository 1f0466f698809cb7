use indexmap::IndexMap;
use serde::{Deserialize, Serialize};


/// One aggregation value with its document count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetBucket {
    pub key: String,
    pub doc_count: u64,
}

impl FacetBucket {
    pub fn new(key: impl Into<String>, doc_count: u64) -> Self {
        Self { key: key.into(), doc_count }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub collection_id: Option<String>,
    pub document_id: Option<String>,
    pub source: serde_json::Map<String, serde_json::Value>,
}

/// Data and count responses merged into one coherent result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SearchResponse {
    pub hits: Vec<SearchHit>,
    pub total_hits: u64,
    pub facet_aggregations: IndexMap<String, Vec<FacetBucket>>,
    /// One bucket per known collection, keyed by collection title.
    pub collection_aggregation: Vec<FacetBucket>,
}

impl SearchResponse {
    /// Buckets for `name`, the collection facet included.
    pub fn buckets(&self, name: &str) -> &[FacetBucket] {
        if name == crate::search_const::COLLECTION_FACET {
            return &self.collection_aggregation;
        }
        self.facet_aggregations.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}
