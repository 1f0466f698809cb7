use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::error::{SearchError, SearchResult};

pub const ELASTICSEARCH_URL_ENV: &str = "ELASTICSEARCH_URL";
const DEFAULT_ELASTICSEARCH_URL: &str = "http://127.0.0.1:9200";

#[derive(Debug, Serialize, Deserialize)]
pub struct RawSearchResult<T> {
    pub hits: RawSearchResultHits<T>,
    #[serde(default)]
    pub timed_out: bool,
    #[serde(default)]
    pub took: u64,
    pub aggregations: Option<BTreeMap<String, RawSearchResultAggregation>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RawSearchResultHits<T> {
    pub hits: Vec<RawSearchResultHit<T>>,
    pub total: RawSearchResultTotal,
}

/// Older backends report the total as a bare integer.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(untagged)]
pub enum RawSearchResultTotal {
    Count(u64),
    Object { value: u64 },
}

impl RawSearchResultTotal {
    pub fn value(&self) -> u64 {
        match self {
            Self::Count(v) => *v,
            Self::Object { value } => *value,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct RawSearchResultAggregation {
    #[serde(default)]
    pub buckets: Vec<RawSearchResultAggregationBucket>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RawSearchResultAggregationBucket {
    pub key: serde_json::Value,
    pub doc_count: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RawSearchResultHit<T> {
    #[serde(default)]
    pub _index: Option<String>,
    #[serde(default)]
    pub _id: Option<String>,
    pub _source: T,
}

/// A stateless search endpoint accepting Elasticsearch request bodies.
#[allow(async_fn_in_trait)]
pub trait SearchBackend {
    async fn search<T: DeserializeOwned>(
        &self,
        collection_ids: &[String],
        body: &serde_json::Value,
    ) -> SearchResult<RawSearchResult<T>>;
}

#[derive(Debug, Clone)]
pub struct ElasticsearchClient {
    base_url: String,
    client: reqwest::Client,
}

impl ElasticsearchClient {
    /// Validates `base_url` and keeps only its origin, dropping paths and trailing slashes.
    pub fn new(base_url: &str) -> SearchResult<Self> {
        let parsed = url::Url::parse(base_url)
            .map_err(|e| SearchError::Config(format!("{base_url:?} is not a valid URL: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SearchError::Config(format!("{base_url:?} must use http or https")));
        }
        let origin = parsed.origin();
        if !origin.is_tuple() {
            return Err(SearchError::Config(format!("{base_url:?} has no usable origin")));
        }
        Ok(Self { base_url: origin.ascii_serialization(), client: reqwest::Client::new() })
    }

    pub fn from_env() -> SearchResult<Self> {
        let database_url = std::env::var(ELASTICSEARCH_URL_ENV).unwrap_or(DEFAULT_ELASTICSEARCH_URL.to_string());
        Self::new(&database_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl SearchBackend for ElasticsearchClient {
    async fn search<T: DeserializeOwned>(
        &self,
        collection_ids: &[String],
        body: &serde_json::Value,
    ) -> SearchResult<RawSearchResult<T>> {
        if collection_ids.is_empty() {
            return Err(SearchError::Config("search issued without target collections".to_string()));
        }
        let url = format!("{}/{}/_search", self.base_url, collection_ids.join(","));
        debug!("SEARCH REQUEST: {} {}", url, body);
        let t0 = std::time::Instant::now();

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|source| SearchError::Transport { url: url.clone(), source })?;
        let status = response.status();
        let response_txt = response
            .text()
            .await
            .map_err(|source| SearchError::Transport { url: url.clone(), source })?;
        if status.is_client_error() || status.is_server_error() {
            return Err(SearchError::Status { url, status, body: response_txt });
        }
        let dt_ms = t0.elapsed().as_millis();
        info!("SEARCH RESPONSE: {} len = {} ({}ms)", url, response_txt.len(), dt_ms);

        serde_json::from_str(&response_txt).map_err(|e| SearchError::MalformedResponse(format!("{url}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn base_url_is_reduced_to_its_origin() {
        let client = ElasticsearchClient::new("https://search.example.org:9243/some/path/").unwrap();
        assert_eq!(client.base_url(), "https://search.example.org:9243");
    }

    #[test]
    fn invalid_base_urls_are_configuration_errors() {
        assert!(matches!(ElasticsearchClient::new("not a url"), Err(SearchError::Config(_))));
        assert!(matches!(ElasticsearchClient::new("ftp://example.org"), Err(SearchError::Config(_))));
    }

    #[test]
    fn total_accepts_both_shapes() {
        let a: RawSearchResultTotal = serde_json::from_value(json!({"value": 7, "relation": "eq"})).unwrap();
        let b: RawSearchResultTotal = serde_json::from_value(json!(7)).unwrap();
        assert_eq!(a.value(), 7);
        assert_eq!(b.value(), 7);
    }

    #[tokio::test]
    async fn search_posts_body_to_joined_collections() {
        let server = MockServer::start().await;
        let body = json!({"size": 0});
        Mock::given(method("POST"))
            .and(path("/a,b/_search"))
            .and(body_json(&body))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "hits": {"total": {"value": 3}, "hits": []}
            })))
            .mount(&server)
            .await;

        let client = ElasticsearchClient::new(&server.uri()).unwrap();
        let result: RawSearchResult<serde_json::Value> =
            client.search(&["a".to_string(), "b".to_string()], &body).await.unwrap();
        assert_eq!(result.hits.total.value(), 3);
        assert!(result.aggregations.is_none());
    }

    #[tokio::test]
    async fn error_status_is_reported_with_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = ElasticsearchClient::new(&server.uri()).unwrap();
        let err = client
            .search::<serde_json::Value>(&["a".to_string()], &json!({}))
            .await
            .unwrap_err();
        match err {
            SearchError::Status { status, body, .. } => {
                assert_eq!(status.as_u16(), 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unparsable_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"hits\": 1}"))
            .mount(&server)
            .await;

        let client = ElasticsearchClient::new(&server.uri()).unwrap();
        let err = client
            .search::<serde_json::Value>(&["a".to_string()], &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::MalformedResponse(_)));
    }
}
