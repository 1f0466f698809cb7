//! Collection directory loading.

use common::{
    collection_directory::{CollectionDirectory, CollectionDirectoryEntry},
    search_const::{DIRECTORY_FETCH_LIMIT, DIRECTORY_INDEX},
};
use serde_json::json;
use tracing::{error, info};

use crate::{
    db_utils::elasticsearch_utils::SearchBackend,
    error::{SearchError, SearchResult},
};

/// Fetches the directory index once and builds both lookup tables.
pub async fn load_collection_directory<B: SearchBackend>(backend: &B) -> SearchResult<CollectionDirectory> {
    let body = json!({
        "size": DIRECTORY_FETCH_LIMIT,
        "query": { "match_all": {} },
    });
    let response = backend
        .search::<CollectionDirectoryEntry>(&[DIRECTORY_INDEX.to_string()], &body)
        .await
        .map_err(|e| {
            error!("Loading collection directory failed: {}", e);
            SearchError::Directory(e.to_string())
        })?;

    let entries = response.hits.hits.into_iter().map(|hit| hit._source).collect::<Vec<_>>();
    if entries.is_empty() {
        return Err(SearchError::Directory("directory index contains no collections".to_string()));
    }
    let directory = CollectionDirectory::new(entries)?;
    info!("Loaded collection directory: {} collections", directory.len());
    Ok(directory)
}
