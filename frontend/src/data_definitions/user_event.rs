//! Typed interactions sent from rendered widgets back to the controller.

use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserEvent {
    FacetValueClicked { facet: String, value: String },
    /// 1-based page number chosen in the paginator.
    PageChanged { page: u64 },
    PageSizeChanged { size: u64 },
    QuerySubmitted { query_text: String },
    ClearFilters,
}

/// Handle given to the renderer after every render.
#[derive(Debug, Clone)]
pub struct UserEventSender(mpsc::UnboundedSender<UserEvent>);

impl UserEventSender {
    pub(crate) fn new(tx: mpsc::UnboundedSender<UserEvent>) -> Self {
        Self(tx)
    }

    /// Returns `false` once the controller is gone.
    pub fn send(&self, event: UserEvent) -> bool {
        self.0.send(event).is_ok()
    }

    pub fn facet_value_clicked(&self, facet: impl Into<String>, value: impl Into<String>) -> bool {
        self.send(UserEvent::FacetValueClicked { facet: facet.into(), value: value.into() })
    }

    pub fn page_changed(&self, page: u64) -> bool {
        self.send(UserEvent::PageChanged { page })
    }

    pub fn page_size_changed(&self, size: u64) -> bool {
        self.send(UserEvent::PageSizeChanged { size })
    }

    pub fn query_submitted(&self, query_text: impl Into<String>) -> bool {
        self.send(UserEvent::QuerySubmitted { query_text: query_text.into() })
    }

    pub fn clear_filters(&self) -> bool {
        self.send(UserEvent::ClearFilters)
    }
}
