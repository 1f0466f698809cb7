//! Constants shared by the URL contract, the query builder and the views.

/// Default number of results per page.
pub const PAGE_SIZE: u64 = 10;

/// Page sizes offered by the results header.
pub const PAGE_SIZE_OPTIONS: [u64; 4] = [10, 25, 50, 100];

/// Suffix marking a multi-valued URL parameter key.
pub const MULTI_VALUE_MARKER: &str = "[]";

/// Suffix of the keyword sub-field used for exact matching.
pub const EXACT_MATCH_SUFFIX: &str = ".raw";

/// Document field that is never shipped to the client.
pub const BULK_CONTENT_FIELD: &str = "full_text";

/// Backend metadata field identifying the collection of a document.
pub const COLLECTION_ID_FIELD: &str = "_index";

/// Name of the facet listing collections.
pub const COLLECTION_FACET: &str = "collection";

/// Search field wildcard used when no `fields` parameter is present.
pub const ALL_FIELDS: &str = "*";

/// Number of buckets requested for each faceted field.
pub const FACET_BUCKET_LIMIT: u64 = 100;

/// Number of facet values shown before "show more".
pub const INITIAL_VISIBLE_FACET_VALUES: usize = 5;

/// Index holding the collection directory documents.
pub const DIRECTORY_INDEX: &str = "directory";

/// Upper bound on directory documents fetched at startup.
pub const DIRECTORY_FETCH_LIMIT: u64 = 1000;

pub mod url_keys {
    pub const QUERY: &str = "q";
    pub const START: &str = "start";
    pub const SIZE: &str = "size";
    pub const FIELDS: &str = "fields";
    pub const COLLECTION: &str = "collection[]";
}
