pub mod list_collections;
pub mod search;
