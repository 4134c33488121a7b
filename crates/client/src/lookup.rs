//! Category and tag lists for the filter controls.
//!
//! Each provider fetches a list at most once successfully; a failed fetch is
//! reported and retried on the next call.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::warn;

use crate::transport::RecipeTransport;

/// Result of a lookup. `Unavailable` is distinct from an empty list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Loaded(Vec<String>),
    /// The list could not be loaded; carries a user-facing message.
    Unavailable(String),
}

impl Lookup {
    /// Names to render, empty when unavailable.
    pub fn names(&self) -> &[String] {
        match self {
            Lookup::Loaded(names) => names,
            Lookup::Unavailable(_) => &[],
        }
    }
}

/// Per-page-load cache of category and tag lists.
pub struct LookupProvider {
    transport: Arc<dyn RecipeTransport>,
    categories: OnceCell<Vec<String>>,
    tags: OnceCell<Vec<String>>,
}

impl LookupProvider {
    pub fn new(transport: Arc<dyn RecipeTransport>) -> Self {
        Self {
            transport,
            categories: OnceCell::new(),
            tags: OnceCell::new(),
        }
    }

    pub async fn list_categories(&self) -> Lookup {
        let loaded = self
            .categories
            .get_or_try_init(|| self.transport.fetch_categories())
            .await;

        match loaded {
            Ok(names) => Lookup::Loaded(names.clone()),
            Err(e) => {
                warn!(error = %e, "failed to load categories");
                Lookup::Unavailable(e.user_message())
            }
        }
    }

    pub async fn list_tags(&self) -> Lookup {
        let loaded = self
            .tags
            .get_or_try_init(|| self.transport.fetch_tags())
            .await;

        match loaded {
            Ok(names) => Lookup::Loaded(names.clone()),
            Err(e) => {
                warn!(error = %e, "failed to load tags");
                Lookup::Unavailable(e.user_message())
            }
        }
    }
}
