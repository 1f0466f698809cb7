//! Common library exports shared between frontend and backend.

extern crate serde;


pub mod search_const;
pub mod search_state;
pub mod search_query;
pub mod search_result;
pub mod collection_directory;
pub mod view_models;
