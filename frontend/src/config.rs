//! Per-page configuration of the search page.

use common::search_query::CollectionMode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPageConfig {
    /// Fields with a facet, in display order.
    pub faceted_fields: Vec<String>,
    /// First entry is the result title, the rest become detail lines.
    pub display_fields: Vec<String>,
    pub collection_mode: CollectionMode,
}

impl SearchPageConfig {
    pub fn new(faceted_fields: &str, display_fields: &str, collection_mode: CollectionMode) -> Self {
        Self {
            faceted_fields: parse_field_list(faceted_fields),
            display_fields: parse_field_list(display_fields),
            collection_mode,
        }
    }
}

/// Comma-separated field names; blanks are skipped.
pub fn parse_field_list(s: &str) -> Vec<String> {
    s.split(',').map(str::trim).filter(|f| !f.is_empty()).map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn field_lists_skip_blank_entries() {
        assert_eq!(parse_field_list("topic, date_created,,"), vec!["topic", "date_created"]);
        assert!(parse_field_list("").is_empty());
    }
}
