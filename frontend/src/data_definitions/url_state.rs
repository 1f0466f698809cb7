//! The address-bar state shared by the search page.

use tokio::sync::watch;
use tracing::debug;

use crate::data_definitions::state_codec::{DecodedState, UrlParams, decode_params};

/// Owns the query-string history; the controller is its only writer.
#[derive(Debug)]
pub struct UrlStateContainer {
    history: Vec<String>,
    notifier: watch::Sender<String>,
}

impl UrlStateContainer {
    pub fn new(initial_query_string: &str) -> Self {
        let initial = UrlParams::parse(initial_query_string).to_query_string();
        let (notifier, _) = watch::channel(initial.clone());
        Self { history: vec![initial], notifier }
    }

    /// Current query string without the leading `?`.
    pub fn query_string(&self) -> &str {
        self.history.last().map(String::as_str).unwrap_or("")
    }

    pub fn get(&self) -> UrlParams {
        UrlParams::parse(self.query_string())
    }

    pub fn decode(&self) -> DecodedState {
        decode_params(&self.get())
    }

    /// Applies `mutator` to the current parameters, pushes the result as a new
    /// history entry and notifies subscribers.
    pub fn apply_and_persist(&mut self, mutator: impl FnOnce(&mut UrlParams)) -> &str {
        let mut params = self.get();
        mutator(&mut params);
        let query_string = params.to_query_string();
        debug!("URL state pushed: ?{}", query_string);
        self.history.push(query_string.clone());
        self.notifier.send_replace(query_string);
        self.query_string()
    }

    /// Receives every persisted query string.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.notifier.subscribe()
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }
}
