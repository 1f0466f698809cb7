//! The seam between the controller and whatever draws the page.

use std::io::Write;

use common::view_models::{FacetViewModel, ResultsHeaderView, SearchView};

use crate::data_definitions::user_event::UserEventSender;

pub trait SearchRenderer {
    /// Draws a completed cycle. `events` replaces any sender handed out earlier.
    fn render(&mut self, view: &SearchView, events: UserEventSender);

    /// Called when a cycle fails; whatever was rendered before stays visible.
    fn render_error(&mut self, _message: &str) {}

    /// Leave the page for another one, e.g. the multi-collection search.
    fn navigate(&mut self, _path: &str) {}
}

/// Plain-text renderer used by the terminal binary.
pub struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_facet(&mut self, facet: &FacetViewModel) -> std::io::Result<()> {
        let marker = if facet.collapsed { "+" } else { "-" };
        writeln!(self.out, "{} {} [{}]", marker, facet.display_name, facet.name)?;
        if facet.collapsed {
            return Ok(());
        }
        for value in facet.values.iter().take(facet.initially_visible) {
            let check = if value.selected { "x" } else { " " };
            match value.doc_count {
                Some(count) => writeln!(self.out, "    [{}] {} ({})", check, value.raw_value, count)?,
                None => writeln!(self.out, "    [{}] {}", check, value.raw_value)?,
            }
        }
        let hidden = facet.values.len().saturating_sub(facet.initially_visible);
        if hidden > 0 {
            writeln!(self.out, "    ... {} more", hidden)?;
        }
        Ok(())
    }

    fn write_view(&mut self, view: &SearchView) -> std::io::Result<()> {
        writeln!(self.out, "=== search #{}: \"{}\" ===", view.cycle, view.query_text)?;
        if view.clear_filters.is_visible() {
            writeln!(self.out, "({})", view.clear_filters.label())?;
        }
        for facet in &view.facets {
            self.write_facet(facet)?;
        }
        match &view.header {
            ResultsHeaderView::Showing { pagination, page_size_options } => {
                writeln!(
                    self.out,
                    "Showing {} - {} of {} Results (page {}/{}, size {} of {:?})",
                    pagination.start_index,
                    pagination.end_index,
                    pagination.total_hits,
                    pagination.current_page,
                    pagination.page_count(),
                    pagination.page_size,
                    page_size_options,
                )?;
            }
            ResultsHeaderView::OutOfRange { message } => writeln!(self.out, "{}", message)?,
        }
        for item in &view.results {
            writeln!(self.out, "* {}", item.title)?;
            if let Some(url) = &item.url {
                writeln!(self.out, "  {}", url)?;
            }
            for detail in &item.details {
                writeln!(self.out, "  {}: {}", detail.label, detail.value)?;
            }
        }
        self.out.flush()
    }
}

impl<W: Write> SearchRenderer for TextRenderer<W> {
    fn render(&mut self, view: &SearchView, _events: UserEventSender) {
        if let Err(e) = self.write_view(view) {
            tracing::error!("Failed to write search view: {}", e);
        }
    }

    fn render_error(&mut self, message: &str) {
        if let Err(e) = writeln!(self.out, "Search failed: {}", message) {
            tracing::error!("Failed to write search error: {}", e);
        }
    }

    fn navigate(&mut self, path: &str) {
        if let Err(e) = writeln!(self.out, "Go to {}", path) {
            tracing::error!("Failed to write navigation: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::view_models::{ClearFiltersView, FacetValueView, PaginationViewModel};
    use tokio::sync::mpsc;

    #[test]
    fn text_renderer_writes_header_facets_and_results() {
        let view = SearchView {
            cycle: 3,
            query_text: "cats".into(),
            clear_filters: ClearFiltersView { num_applied: 1 },
            facets: vec![FacetViewModel {
                name: "topic".into(),
                display_name: "Topic".into(),
                collapsed: false,
                initially_visible: 1,
                values: vec![
                    FacetValueView { raw_value: "biology".into(), doc_count: Some(4), selected: true },
                    FacetValueView { raw_value: "history".into(), doc_count: Some(2), selected: false },
                ],
            }],
            header: ResultsHeaderView::Showing {
                pagination: PaginationViewModel {
                    start_index: 11,
                    end_index: 20,
                    total_hits: 42,
                    page_size: 10,
                    current_page: 2,
                },
                page_size_options: vec![10, 25, 50, 100],
            },
            results: vec![],
        };
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut renderer = TextRenderer::new(Vec::new());
        renderer.render(&view, UserEventSender::new(tx));

        let text = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(text.contains("(Clear 1 Filters)"));
        assert!(text.contains("[x] biology (4)"));
        assert!(text.contains("... 1 more"));
        assert!(text.contains("Showing 11 - 20 of 42 Results (page 2/5"));
    }
}
