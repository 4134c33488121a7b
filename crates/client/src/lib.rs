//! Pantry client.
//!
//! Talks to the kernel's recipe API on behalf of a UI: fetches list pages for
//! the filter state held in the URL, caches lookup lists per page load, and
//! makes sure a slow response for an old query never replaces the result of
//! a newer one.

pub mod config;
pub mod error;
pub mod lookup;
pub mod orchestrator;
pub mod transport;

pub use config::ClientConfig;
pub use error::ClientError;
pub use lookup::{Lookup, LookupProvider};
pub use orchestrator::{FetchOrchestrator, LoadOutcome, LoadSnapshot, LoadState};
pub use transport::{HttpTransport, RecipeTransport};
