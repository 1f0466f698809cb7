pub mod search_components;
pub mod search_renderer;
