//! Render-ready models produced at the end of each search cycle.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetValueView {
    pub raw_value: String,
    /// `None` for call-to-action entries that carry no count.
    pub doc_count: Option<u64>,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetViewModel {
    pub name: String,
    pub display_name: String,
    pub collapsed: bool,
    /// Values shown before "show more"; the rest start hidden.
    pub initially_visible: usize,
    pub values: Vec<FacetValueView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationViewModel {
    pub start_index: u64,
    pub end_index: u64,
    pub total_hits: u64,
    pub page_size: u64,
    pub current_page: u64,
}

impl PaginationViewModel {
    pub fn page_count(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total_hits.div_ceil(self.page_size)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultsHeaderView {
    Showing {
        pagination: PaginationViewModel,
        page_size_options: Vec<u64>,
    },
    OutOfRange {
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultDetailView {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultItemView {
    pub url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub title: String,
    pub details: Vec<ResultDetailView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearFiltersView {
    pub num_applied: usize,
}

impl ClearFiltersView {
    pub fn is_visible(&self) -> bool {
        self.num_applied > 0
    }

    pub fn label(&self) -> String {
        format!("Clear {} Filters", self.num_applied)
    }
}

/// Everything a renderer needs for one completed search cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchView {
    /// Monotonically increasing per controller; stale views have lower numbers.
    pub cycle: u64,
    pub query_text: String,
    pub clear_filters: ClearFiltersView,
    pub facets: Vec<FacetViewModel>,
    pub header: ResultsHeaderView,
    pub results: Vec<ResultItemView>,
}
