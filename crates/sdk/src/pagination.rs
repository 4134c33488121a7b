//! Pagination controls for the recipe list.
//!
//! Sibling-page links are produced by re-encoding the current
//! [`FilterState`] with a different page, so every active filter survives
//! navigation unchanged.

use serde::Serialize;

use crate::codec;
use crate::filter::FilterState;

/// Number of pages needed for `total_count` results at `limit` per page.
pub fn total_pages(total_count: u64, limit: u32) -> u32 {
    if limit == 0 {
        return 0;
    }
    let pages = total_count.div_ceil(u64::from(limit));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Query string for `target_page` with every other field of `filter` kept.
///
/// Pages below 1 are clamped to 1.
pub fn build_page_url(filter: &FilterState, target_page: u32) -> String {
    let target = filter.clone().with_page(target_page.max(1));
    codec::encode(&target)
}

/// State of the previous/next controls for one rendered page.
///
/// Controls are disabled rather than hidden at the boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageNav {
    pub page: u32,
    /// `None` when the backend did not report a total.
    pub total_pages: Option<u32>,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub prev_query: String,
    pub next_query: String,
}

impl PageNav {
    pub fn new(filter: &FilterState, total_count: Option<u64>) -> Self {
        let page = filter.page.max(1);
        let total_pages = total_count.map(|total| total_pages(total, filter.limit));

        // Unknown total: next stays enabled and an empty page reports itself.
        let next_enabled = match total_pages {
            Some(total) => page < total,
            None => true,
        };

        Self {
            page,
            total_pages,
            prev_enabled: page > 1,
            next_enabled,
            prev_query: build_page_url(filter, page.saturating_sub(1)),
            next_query: build_page_url(filter, page.saturating_add(1)),
        }
    }
}
