//! Pantry SDK
//!
//! Types shared by the Pantry kernel and its clients: the recipe record,
//! the filter/sort state that drives the recipe list, the query-string codec
//! that persists that state in the URL, and the pagination helpers built on
//! top of the codec.

pub mod codec;
pub mod filter;
pub mod pagination;
pub mod types;

pub mod prelude {
    pub use crate::codec::{decode, encode};
    pub use crate::filter::{
        DEFAULT_PAGE_LIMIT, FilterState, MAX_PAGE_LIMIT, SortBy, SortMode, SortOrder,
    };
    pub use crate::pagination::{PageNav, build_page_url, total_pages};
    pub use crate::types::*;
}
