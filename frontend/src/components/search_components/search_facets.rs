//! Facet view models built from aggregation buckets.

use common::{
    search_const::{COLLECTION_FACET, INITIAL_VISIBLE_FACET_VALUES},
    search_result::{FacetBucket, SearchResponse},
    search_state::SearchState,
    view_models::{FacetValueView, FacetViewModel},
};
use indexmap::IndexMap;

pub const OTHER_COLLECTIONS_FACET: &str = "other-collections";

/// Facet name to selected values, oldest application first.
pub type FacetSelections = IndexMap<String, Vec<String>>;

pub fn snake_to_title_case(s: &str) -> String {
    s.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Selections for every facet, the collection facet included.
pub fn facet_selections(state: &SearchState) -> FacetSelections {
    let mut selections = state
        .filters
        .iter()
        .map(|(name, filter)| (name.clone(), filter.values.iter().cloned().collect::<Vec<_>>()))
        .collect::<FacetSelections>();
    if let Some(titles) = &state.selected_collection_titles {
        selections.insert(COLLECTION_FACET.to_string(), titles.iter().cloned().collect());
    }
    selections
}

/// Orders buckets so selected values come first, most recently applied first,
/// followed by the unselected values in backend order.
fn order_by_selection(buckets: &[FacetBucket], selected: &[String]) -> Vec<FacetValueView> {
    let mut values = buckets
        .iter()
        .map(|bucket| FacetValueView {
            raw_value: bucket.key.clone(),
            doc_count: Some(bucket.doc_count),
            selected: selected.contains(&bucket.key),
        })
        .collect::<Vec<_>>();

    // A selected value the backend no longer returns still needs to be unselectable.
    for value in selected {
        if !buckets.iter().any(|b| &b.key == value) {
            values.push(FacetValueView { raw_value: value.clone(), doc_count: Some(0), selected: true });
        }
    }

    let rank = |raw_value: &str| selected.iter().rev().position(|v| v == raw_value);
    values.sort_by_key(|v| rank(&v.raw_value).unwrap_or(usize::MAX));
    values
}

pub fn build_facet_views(
    response: &SearchResponse,
    included_names: &[String],
    selections: &FacetSelections,
) -> Vec<FacetViewModel> {
    let mut facets = Vec::new();
    for name in included_names {
        let buckets = response.buckets(name);
        if buckets.is_empty() {
            continue;
        }
        let selected = selections.get(name).map(Vec::as_slice).unwrap_or(&[]);
        let values = order_by_selection(buckets, selected);
        facets.push(FacetViewModel {
            name: name.clone(),
            display_name: snake_to_title_case(name),
            collapsed: false,
            initially_visible: INITIAL_VISIBLE_FACET_VALUES.min(values.len()),
            values,
        });
    }
    facets
}

/// Collapsed call-to-action shown on single-collection pages.
pub fn build_other_collections_facet(num_additional_collections: usize) -> Option<FacetViewModel> {
    if num_additional_collections == 0 {
        return None;
    }
    Some(FacetViewModel {
        name: OTHER_COLLECTIONS_FACET.to_string(),
        display_name: "Other Collections".to_string(),
        collapsed: true,
        initially_visible: 1,
        values: vec![FacetValueView {
            raw_value: format!(
                "Go to the multi-collection search page to access {num_additional_collections} additional collections"
            ),
            doc_count: None,
            selected: false,
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn response(topic: &[(&str, u64)]) -> SearchResponse {
        let mut response = SearchResponse::default();
        response.facet_aggregations.insert(
            "topic".into(),
            topic.iter().map(|(k, c)| FacetBucket::new(*k, *c)).collect(),
        );
        response.facet_aggregations.insert("empty_facet".into(), vec![]);
        response.collection_aggregation = vec![FacetBucket::new("Maps", 3), FacetBucket::new("Letters", 0)];
        response
    }

    fn raw_values(facet: &FacetViewModel) -> Vec<&str> {
        facet.values.iter().map(|v| v.raw_value.as_str()).collect()
    }

    #[test]
    fn most_recently_selected_value_comes_first() {
        let response = response(&[("c", 9), ("b", 5), ("a", 1)]);
        let mut selections = FacetSelections::new();
        selections.insert("topic".into(), vec!["b".into(), "a".into()]);

        let facets = build_facet_views(&response, &["topic".to_string()], &selections);
        assert_eq!(raw_values(&facets[0]), vec!["a", "b", "c"]);
        assert_eq!(
            facets[0].values.iter().map(|v| v.selected).collect::<Vec<_>>(),
            vec![true, true, false]
        );
    }

    #[test]
    fn unselected_values_keep_backend_order() {
        let response = response(&[("z", 9), ("y", 5), ("x", 1)]);
        let facets = build_facet_views(&response, &["topic".to_string()], &FacetSelections::new());
        assert_eq!(raw_values(&facets[0]), vec!["z", "y", "x"]);
        assert_eq!(facets[0].display_name, "Topic");
        assert_eq!(facets[0].initially_visible, 3);
    }

    #[test]
    fn empty_facets_are_omitted_and_caller_order_is_kept() {
        let response = response(&[("a", 1)]);
        let names = vec!["collection".to_string(), "empty_facet".to_string(), "topic".to_string()];
        let facets = build_facet_views(&response, &names, &FacetSelections::new());
        assert_eq!(facets.iter().map(|f| f.name.as_str()).collect::<Vec<_>>(), vec!["collection", "topic"]);
        assert_eq!(facets[0].values[1].doc_count, Some(0));
    }

    #[test]
    fn selected_value_missing_from_buckets_is_synthesized() {
        let response = response(&[("a", 1), ("b", 2)]);
        let mut selections = FacetSelections::new();
        selections.insert("topic".into(), vec!["biology".into()]);

        let facets = build_facet_views(&response, &["topic".to_string()], &selections);
        assert_eq!(raw_values(&facets[0]), vec!["biology", "a", "b"]);
        assert_eq!(facets[0].values[0].doc_count, Some(0));
        assert!(facets[0].values[0].selected);
    }

    #[test]
    fn title_case_display_names() {
        assert_eq!(snake_to_title_case("date_created"), "Date Created");
        assert_eq!(snake_to_title_case("collection"), "Collection");
    }

    #[test]
    fn other_collections_facet_only_when_there_are_others() {
        assert_eq!(build_other_collections_facet(0), None);
        let facet = build_other_collections_facet(4).unwrap();
        assert!(facet.collapsed);
        assert_eq!(facet.values[0].doc_count, None);
        assert!(facet.values[0].raw_value.contains("access 4 additional collections"));
    }
}
