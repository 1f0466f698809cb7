//! Search query construction and execution.

pub mod query_dsl;

mod build_query;
pub use build_query::{build_count_query, build_data_query};

mod execute_search;
pub use execute_search::{execute_search, reconcile_collection_buckets};
