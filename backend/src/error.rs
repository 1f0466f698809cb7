//! Error categories surfaced by directory loading and search execution.

use common::collection_directory::DirectoryError;

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("invalid backend configuration: {0}")]
    Config(String),

    #[error("failed to load the collection directory: {0}")]
    Directory(String),

    #[error("invalid collection directory: {0}")]
    InvalidDirectory(#[from] DirectoryError),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("backend returned {status} for {url}: {body}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("malformed backend response: {0}")]
    MalformedResponse(String),

    #[error("unknown collection title {0:?}")]
    UnknownCollection(String),

    #[error("count aggregation returned collection id {0:?} which is not in the directory")]
    Reconciliation(String),
}

pub type SearchResult<T> = Result<T, SearchError>;
