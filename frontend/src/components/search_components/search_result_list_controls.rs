//! Results header: hit range, paginator and page-size selector.

use common::{
    search_const::PAGE_SIZE_OPTIONS,
    view_models::{PaginationViewModel, ResultsHeaderView},
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Query \"start\" value ({start}) exceeds the number of total results ({total_hits})")]
pub struct OutOfRange {
    pub start: u64,
    pub total_hits: u64,
}

pub fn build_pagination(total_hits: u64, start: u64, size: u64) -> Result<PaginationViewModel, OutOfRange> {
    let size = size.max(1);
    let start_index = start as i128 + 1;
    let end_index = start_index + (total_hits as i128 - start_index).min(size as i128 - 1);
    if end_index < start_index {
        return Err(OutOfRange { start, total_hits });
    }

    Ok(PaginationViewModel {
        start_index: start_index as u64,
        end_index: end_index as u64,
        total_hits,
        page_size: size,
        current_page: start_index as u64 / size + 1,
    })
}

/// Zero-based offset of the first result on `page` (1-based); saturates
/// instead of overflowing for absurd page sizes.
pub fn start_for_page(page: u64, size: u64) -> u64 {
    page.saturating_sub(1).saturating_mul(size)
}

/// The standard sizes, plus the current one when it is not among them.
pub fn page_size_options(current: u64) -> Vec<u64> {
    let mut options = PAGE_SIZE_OPTIONS.to_vec();
    if !options.contains(&current) {
        options.push(current);
    }
    options
}

pub fn build_results_header(total_hits: u64, start: u64, size: u64) -> ResultsHeaderView {
    match build_pagination(total_hits, start, size) {
        Ok(pagination) => ResultsHeaderView::Showing { pagination, page_size_options: page_size_options(size) },
        Err(out_of_range) => ResultsHeaderView::OutOfRange { message: out_of_range.to_string() },
    }
}
