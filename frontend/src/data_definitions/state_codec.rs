//! Bidirectional mapping between the URL query string and [`SearchState`].

use std::fmt::Display;

use common::{
    search_const::{ALL_FIELDS, COLLECTION_FACET, MULTI_VALUE_MARKER, PAGE_SIZE, url_keys},
    search_state::{FilterValues, SearchState},
};
use indexmap::{IndexMap, IndexSet};

/// Ordered key/value pairs of a query string, duplicates preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParams(Vec<(String, String)>);

impl UrlParams {
    pub fn parse(query_string: &str) -> Self {
        let query_string = query_string.strip_prefix('?').unwrap_or(query_string);
        Self(
            url::form_urlencoded::parse(query_string.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
        )
    }

    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.0.iter())
            .finish()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.iter().filter(|(k, _)| *k == key).map(|(_, v)| v).collect()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.iter().any(|(k, _)| k == key)
    }

    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    /// Replaces the first occurrence of `key` and drops the rest, appending if absent.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.0.iter().position(|(k, _)| k == key) {
            Some(first) => {
                self.0[first].1 = value;
                let mut index = 0;
                self.0.retain(|(k, _)| {
                    let keep = index <= first || k != key;
                    index += 1;
                    keep
                });
            }
            None => self.0.push((key.to_string(), value)),
        }
    }

    pub fn delete(&mut self, key: &str) {
        self.0.retain(|(k, _)| k != key);
    }

    pub fn retain_keys(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.0.retain(|(k, _)| keep(k));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Problems found while decoding; the affected slot falls back to its default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeWarning {
    /// A key without the multi-value marker occurred more than once.
    DuplicateKey { key: String, occurrences: usize },
    InvalidNumber { key: String, value: String },
    /// Both `name` and `name[]` are present; the later form is ignored.
    ConflictingFilterKeys { name: String },
}

impl Display for DecodeWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateKey { key, occurrences } => write!(
                f,
                "URL parameter {key:?} occurs {occurrences} times but is not multi-valued; using its default"
            ),
            Self::InvalidNumber { key, value } => {
                write!(f, "URL parameter {key:?} has invalid value {value:?}; using its default")
            }
            Self::ConflictingFilterKeys { name } => {
                write!(f, "filter {name:?} is given both with and without {MULTI_VALUE_MARKER}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedState {
    pub state: SearchState,
    pub warnings: Vec<DecodeWarning>,
}

fn parse_number(key: &str, value: &str, allow_zero: bool, warnings: &mut Vec<DecodeWarning>) -> Option<u64> {
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 || allow_zero => Some(n),
        _ => {
            warnings.push(DecodeWarning::InvalidNumber { key: key.to_string(), value: value.to_string() });
            None
        }
    }
}

pub fn decode(query_string: &str) -> DecodedState {
    decode_params(&UrlParams::parse(query_string))
}

pub fn decode_params(params: &UrlParams) -> DecodedState {
    let mut state = SearchState::default();
    let mut warnings = Vec::new();

    let mut grouped: IndexMap<&str, Vec<&str>> = IndexMap::new();
    for (key, value) in params.iter() {
        grouped.entry(key).or_default().push(value);
    }

    for (key, values) in grouped {
        if key == url_keys::COLLECTION {
            state.selected_collection_titles = Some(values.iter().map(|v| v.to_string()).collect());
            continue;
        }

        if let Some(name) = key.strip_suffix(MULTI_VALUE_MARKER) {
            if state.filters.contains_key(name) {
                warnings.push(DecodeWarning::ConflictingFilterKeys { name: name.to_string() });
                continue;
            }
            state.filters.insert(name.to_string(), FilterValues::multi(values));
            continue;
        }

        if values.len() > 1 {
            warnings.push(DecodeWarning::DuplicateKey { key: key.to_string(), occurrences: values.len() });
            continue;
        }
        let value = values[0];

        match key {
            url_keys::QUERY => state.query_text = value.to_string(),
            url_keys::START => {
                if let Some(start) = parse_number(key, value, true, &mut warnings) {
                    state.start = start;
                }
            }
            url_keys::SIZE => {
                if let Some(size) = parse_number(key, value, false, &mut warnings) {
                    state.size = size;
                }
            }
            url_keys::FIELDS => {
                let fields = value
                    .split(',')
                    .map(str::trim)
                    .filter(|f| !f.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>();
                if !fields.is_empty() {
                    state.fields = fields;
                }
            }
            _ => {
                if state.filters.contains_key(key) {
                    warnings.push(DecodeWarning::ConflictingFilterKeys { name: key.to_string() });
                    continue;
                }
                state.filters.insert(key.to_string(), FilterValues::single(value));
            }
        }
    }

    DecodedState { state, warnings }
}

/// Inverse of [`decode`]; default-valued slots are left out of the URL.
pub fn encode(state: &SearchState) -> String {
    let mut params = UrlParams::default();

    if !state.query_text.is_empty() {
        params.append(url_keys::QUERY, state.query_text.clone());
    }
    if state.start != 0 {
        params.append(url_keys::START, state.start.to_string());
    }
    if state.size != PAGE_SIZE {
        params.append(url_keys::SIZE, state.size.to_string());
    }
    if state.fields != [ALL_FIELDS] {
        params.append(url_keys::FIELDS, state.fields.join(","));
    }
    if let Some(titles) = &state.selected_collection_titles {
        for title in titles {
            params.append(url_keys::COLLECTION, title.clone());
        }
    }
    for (name, filter) in &state.filters {
        if filter.multi_valued {
            let key = multi_value_key(name);
            for value in &filter.values {
                params.append(key.clone(), value.clone());
            }
        } else if let Some(value) = filter.values.first() {
            params.append(name.clone(), value.clone());
        }
    }

    params.to_query_string()
}

pub fn multi_value_key(name: &str) -> String {
    format!("{name}{MULTI_VALUE_MARKER}")
}

// Mutators applied through `UrlStateContainer::apply_and_persist`.

/// Adds `value` to the facet's selection, or removes it when already selected.
/// A plain `name=value` key is folded into the multi-valued form first.
pub fn toggle_filter_value(params: &mut UrlParams, name: &str, value: &str) {
    let key = multi_value_key(name);
    let mut values = params.get_all(&key).into_iter().map(str::to_string).collect::<IndexSet<_>>();
    if name != COLLECTION_FACET {
        if let Some(single) = params.get(name).map(str::to_string) {
            params.delete(name);
            values.shift_insert(0, single);
        }
    }

    if !values.shift_remove(value) {
        values.insert(value.to_string());
    }
    params.delete(&key);
    for v in values {
        params.append(key.clone(), v);
    }
    params.delete(url_keys::START);
}

pub fn set_query_text(params: &mut UrlParams, query_text: &str) {
    params.set(url_keys::QUERY, query_text);
    params.delete(url_keys::START);
}

pub fn set_start(params: &mut UrlParams, start: u64) {
    if start == 0 {
        params.delete(url_keys::START);
    } else {
        params.set(url_keys::START, start.to_string());
    }
}

pub fn set_size(params: &mut UrlParams, size: u64) {
    params.set(url_keys::SIZE, size.to_string());
}

/// Removes every filter key, plain or multi-valued, the collection selection
/// and `start`; only the query text, page size and search fields survive.
pub fn clear_filters(params: &mut UrlParams) {
    params.retain_keys(|k| matches!(k, url_keys::QUERY | url_keys::SIZE | url_keys::FIELDS));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_reserved_keys_and_filters() {
        let decoded = decode("?q=cats&topic[]=biology&topic[]=zoology&format=pdf&start=10&size=25&fields=title,creator");
        let state = decoded.state;
        assert!(decoded.warnings.is_empty());
        assert_eq!(state.query_text, "cats");
        assert_eq!(state.start, 10);
        assert_eq!(state.size, 25);
        assert_eq!(state.fields, vec!["title", "creator"]);
        assert_eq!(state.filters["topic"], FilterValues::multi(["biology", "zoology"]));
        assert_eq!(state.filters["format"], FilterValues::single("pdf"));
        assert_eq!(state.filters.keys().collect::<Vec<_>>(), vec!["topic", "format"]);
        assert_eq!(state.selected_collection_titles, None);
    }

    #[test]
    fn single_marked_value_is_still_a_set() {
        let state = decode("topic%5B%5D=biology").state;
        assert_eq!(state.filters["topic"], FilterValues::multi(["biology"]));
    }

    #[test]
    fn collection_selector_is_not_a_filter() {
        let state = decode("collection[]=Maps&collection[]=Letters").state;
        assert!(state.filters.is_empty());
        assert_eq!(
            state.selected_collection_titles,
            Some(IndexSet::from(["Maps".to_string(), "Letters".to_string()]))
        );
    }

    #[test]
    fn duplicate_plain_key_warns_and_falls_back_to_default() {
        let decoded = decode("start=10&start=20&format=pdf&format=epub");
        assert_eq!(decoded.state.start, 0);
        assert!(!decoded.state.filters.contains_key("format"));
        assert_eq!(
            decoded.warnings,
            vec![
                DecodeWarning::DuplicateKey { key: "start".into(), occurrences: 2 },
                DecodeWarning::DuplicateKey { key: "format".into(), occurrences: 2 },
            ]
        );
    }

    #[test]
    fn unparsable_numbers_warn_and_default() {
        let decoded = decode("start=abc&size=0");
        assert_eq!(decoded.state.start, 0);
        assert_eq!(decoded.state.size, 10);
        assert_eq!(decoded.warnings.len(), 2);
    }

    #[test]
    fn conflicting_filter_forms_keep_the_first() {
        let decoded = decode("topic=a&topic[]=b");
        assert_eq!(decoded.state.filters["topic"], FilterValues::single("a"));
        assert_eq!(decoded.warnings, vec![DecodeWarning::ConflictingFilterKeys { name: "topic".into() }]);
    }

    #[test]
    fn encode_then_decode_round_trips() {
        for qs in [
            "",
            "q=cats&topic[]=biology&start=10&size=10",
            "q=a+b%26c&collection[]=Maps&format=pdf&topic[]=x&topic[]=y&fields=title",
            "size=50&subject[]=&weird%5B%5D%5B%5D=1",
        ] {
            let state = decode(qs).state;
            assert_eq!(decode(&encode(&state)).state, state, "round trip of {qs:?}");
        }
    }

    #[test]
    fn toggling_twice_restores_filters_and_clears_start() {
        let mut params = UrlParams::parse("q=cats&start=30");
        toggle_filter_value(&mut params, "topic", "x");
        assert_eq!(params.get_all("topic[]"), vec!["x"]);
        assert_eq!(params.get("start"), None);

        params.append("start", "20");
        toggle_filter_value(&mut params, "topic", "x");
        let state = decode_params(&params).state;
        assert!(state.filters.is_empty());
        assert_eq!(state.start, 0);
        assert_eq!(state.query_text, "cats");
    }

    #[test]
    fn toggle_appends_in_application_order() {
        let mut params = UrlParams::default();
        toggle_filter_value(&mut params, "topic", "b");
        toggle_filter_value(&mut params, "topic", "a");
        assert_eq!(params.get_all("topic[]"), vec!["b", "a"]);
    }

    #[test]
    fn toggle_folds_plain_key_into_multi_form() {
        let mut params = UrlParams::parse("topic=a");
        toggle_filter_value(&mut params, "topic", "b");
        assert_eq!(params.get("topic"), None);
        assert_eq!(params.get_all("topic[]"), vec!["a", "b"]);
    }

    #[test]
    fn clear_filters_removes_every_filter_form_and_start() {
        let mut params = UrlParams::parse("q=x&topic[]=a&collection[]=Maps&format=pdf&start=10&size=25&fields=title");
        clear_filters(&mut params);
        assert_eq!(params.to_query_string(), "q=x&size=25&fields=title");
    }

    #[test]
    fn plain_key_filter_no_longer_counts_after_clear() {
        let mut params = UrlParams::parse("q=x&format=pdf&topic[]=a");
        assert_eq!(decode_params(&params).state.applied_filter_count(), 2);
        clear_filters(&mut params);
        let state = decode_params(&params).state;
        assert_eq!(state.applied_filter_count(), 0);
        assert!(state.filters.is_empty());
        assert_eq!(state.query_text, "x");
    }

    #[test]
    fn set_replaces_first_and_drops_duplicates() {
        let mut params = UrlParams::parse("q=a&size=10&q=b");
        set_query_text(&mut params, "c");
        assert_eq!(params.to_query_string(), "q=c&size=10");
        set_start(&mut params, 20);
        set_size(&mut params, 25);
        assert_eq!(params.to_query_string(), "q=c&size=25&start=20");
        set_start(&mut params, 0);
        assert_eq!(params.get("start"), None);
    }
}
