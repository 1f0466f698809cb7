//! Search intent decoded from the URL query string.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::search_const::{ALL_FIELDS, EXACT_MATCH_SUFFIX, PAGE_SIZE};

/// Values applied to one filter field, in application order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterValues {
    /// Whether the URL key carried the multi-value marker.
    pub multi_valued: bool,
    pub values: IndexSet<String>,
}

impl FilterValues {
    pub fn multi(values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self { multi_valued: true, values: values.into_iter().map(Into::into).collect() }
    }

    pub fn single(value: impl Into<String>) -> Self {
        Self { multi_valued: false, values: IndexSet::from([value.into()]) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchState {
    pub query_text: String,
    /// Filter name (URL key without the marker) to applied values.
    pub filters: IndexMap<String, FilterValues>,
    pub start: u64,
    pub size: u64,
    pub fields: Vec<String>,
    /// `None` searches every known collection.
    pub selected_collection_titles: Option<IndexSet<String>>,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            query_text: String::new(),
            filters: IndexMap::new(),
            start: 0,
            size: PAGE_SIZE,
            fields: vec![ALL_FIELDS.to_string()],
            selected_collection_titles: None,
        }
    }
}

impl SearchState {
    /// Values currently selected for `name`, in application order.
    pub fn selected_values(&self, name: &str) -> Vec<String> {
        self.filters
            .get(name)
            .map(|f| f.values.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Total number of applied filter values, collection selection excluded.
    pub fn applied_filter_count(&self) -> usize {
        self.filters.values().map(|f| f.values.len()).sum()
    }
}

/// Backend keyword field for a facet or filter name.
pub fn exact_match_field(name: &str) -> String {
    format!("{name}{EXACT_MATCH_SUFFIX}")
}
