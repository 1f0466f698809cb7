//! The search page controller: URL state in, view models out.

use std::future::Future;

use backend::{
    api::list_collections::load_collection_directory,
    db_utils::elasticsearch_utils::SearchBackend,
    error::{SearchError, SearchResult},
};
use common::{
    collection_directory::CollectionDirectory,
    search_const::{COLLECTION_FACET, url_keys},
    search_result::SearchResponse,
    search_state::SearchState,
    view_models::{ClearFiltersView, ResultsHeaderView, SearchView},
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::{
    api::search_api::search,
    components::{
        search_components::{
            search_facets::{OTHER_COLLECTIONS_FACET, build_facet_views, build_other_collections_facet, facet_selections},
            search_result_item_card::build_result_items,
            search_result_list_controls::{build_results_header, start_for_page},
        },
        search_renderer::SearchRenderer,
    },
    config::SearchPageConfig,
    data_definitions::{
        state_codec::{clear_filters, set_query_text, set_size, set_start, toggle_filter_value},
        url_state::UrlStateContainer,
        user_event::{UserEvent, UserEventSender},
    },
};

pub const MULTI_COLLECTION_SEARCH_PATH: &str = "/multi-collection-search/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Loading,
    Rendered,
    /// Rendered, but `start` lies past the last hit.
    OutOfRange,
    Error(String),
}

/// Reduces one search response to everything the renderer draws.
pub fn build_search_view(
    config: &SearchPageConfig,
    directory: &CollectionDirectory,
    state: &SearchState,
    response: &SearchResponse,
    cycle: u64,
) -> SearchView {
    let mut included_names = Vec::with_capacity(config.faceted_fields.len() + 1);
    if config.collection_mode.is_multi() {
        included_names.push(COLLECTION_FACET.to_string());
    }
    included_names.extend(config.faceted_fields.iter().cloned());

    let mut facets = build_facet_views(response, &included_names, &facet_selections(state));
    if !config.collection_mode.is_multi() {
        facets.extend(build_other_collections_facet(directory.len().saturating_sub(1)));
    }

    SearchView {
        cycle,
        query_text: state.query_text.clone(),
        clear_filters: ClearFiltersView { num_applied: state.applied_filter_count() },
        facets,
        header: build_results_header(response.total_hits, state.start, state.size),
        results: build_result_items(&response.hits, &config.display_fields),
    }
}

pub struct SearchController<B: SearchBackend, R: SearchRenderer> {
    config: SearchPageConfig,
    backend: B,
    renderer: R,
    url_state: UrlStateContainer,
    directory: Option<CollectionDirectory>,
    state: ControllerState,
    cycle: u64,
    events_tx: mpsc::UnboundedSender<UserEvent>,
    events_rx: mpsc::UnboundedReceiver<UserEvent>,
}

impl<B: SearchBackend, R: SearchRenderer> SearchController<B, R> {
    pub fn new(config: SearchPageConfig, backend: B, renderer: R, initial_query_string: &str) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            config,
            backend,
            renderer,
            url_state: UrlStateContainer::new(initial_query_string),
            directory: None,
            state: ControllerState::Idle,
            cycle: 0,
            events_tx,
            events_rx,
        }
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn url_state(&self) -> &UrlStateContainer {
        &self.url_state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn directory(&self) -> Option<&CollectionDirectory> {
        self.directory.as_ref()
    }

    pub fn event_sender(&self) -> UserEventSender {
        UserEventSender::new(self.events_tx.clone())
    }

    /// Loads the collection directory and runs the first search.
    /// A directory failure is fatal: no search can be built without it.
    pub async fn start(&mut self) -> SearchResult<()> {
        let directory = load_collection_directory(&self.backend).await?;
        info!("Loaded {} collections", directory.len());
        self.directory = Some(directory);
        self.state = ControllerState::Loading;
        self.run_search_cycle().await
    }

    pub async fn run_search_cycle(&mut self) -> SearchResult<()> {
        let Some(directory) = &self.directory else {
            return Err(SearchError::Directory("collection directory is not loaded".to_string()));
        };
        self.cycle += 1;
        self.state = ControllerState::Loading;

        let decoded = self.url_state.decode();
        for warning in &decoded.warnings {
            warn!("{}", warning);
        }
        if !self.config.collection_mode.is_multi() && self.url_state.get().contains_key(url_keys::COLLECTION) {
            debug!("Ignoring collection selection on a single-collection page");
        }

        let response = match search(&self.backend, directory, &self.config, &decoded.state).await {
            Ok(response) => response,
            Err(e) => {
                error!("Search cycle {} failed: {}", self.cycle, e);
                self.state = ControllerState::Error(e.to_string());
                self.renderer.render_error(&e.to_string());
                return Err(e);
            }
        };

        let view = build_search_view(&self.config, directory, &decoded.state, &response, self.cycle);
        self.state = match view.header {
            ResultsHeaderView::Showing { .. } => ControllerState::Rendered,
            ResultsHeaderView::OutOfRange { .. } => ControllerState::OutOfRange,
        };
        let events = UserEventSender::new(self.events_tx.clone());
        self.renderer.render(&view, events);
        Ok(())
    }

    /// Folds one interaction into the URL and searches again.
    pub async fn handle_event(&mut self, event: UserEvent) -> SearchResult<()> {
        debug!("Handling {:?}", event);
        match event {
            UserEvent::FacetValueClicked { facet, .. } if facet == OTHER_COLLECTIONS_FACET => {
                self.renderer.navigate(MULTI_COLLECTION_SEARCH_PATH);
                return Ok(());
            }
            UserEvent::FacetValueClicked { facet, value } => {
                self.url_state.apply_and_persist(|p| toggle_filter_value(p, &facet, &value));
            }
            UserEvent::PageChanged { page } => {
                let size = self.url_state.decode().state.size;
                self.url_state.apply_and_persist(|p| set_start(p, start_for_page(page, size)));
            }
            UserEvent::PageSizeChanged { size } => {
                self.url_state.apply_and_persist(|p| set_size(p, size));
            }
            UserEvent::QuerySubmitted { query_text } => {
                self.url_state.apply_and_persist(|p| set_query_text(p, &query_text));
            }
            UserEvent::ClearFilters => {
                self.url_state.apply_and_persist(clear_filters);
            }
        }
        self.run_search_cycle().await
    }

    /// Handles events one at a time until `shutdown` resolves.
    /// A failed cycle is logged and the loop keeps going.
    pub async fn run(&mut self, shutdown: impl Future<Output = ()>) {
        tokio::pin!(shutdown);
        loop {
            let event = tokio::select! {
                _ = &mut shutdown => break,
                event = self.events_rx.recv() => event,
            };
            let Some(event) = event else { break };
            if let Err(e) = self.handle_event(event).await {
                warn!("Search cycle failed: {}", e);
            }
        }
        info!("Search controller stopped after {} cycles", self.cycle);
    }
}
