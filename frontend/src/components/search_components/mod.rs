pub mod search_facets;
pub mod search_result_item_card;
pub mod search_result_list_controls;
