//! Frontend library entry point.

pub mod api;
pub mod components;
pub mod config;
pub mod data_definitions;
pub mod pages;
