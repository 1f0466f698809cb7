//! Query construction and execution against the search backend.

pub mod api;
pub mod db_utils;
pub mod error;
