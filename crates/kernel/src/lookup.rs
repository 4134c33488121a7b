//! Cached category and tag lists.
//!
//! The lists change rarely and are requested on every page load, so they are
//! held in an in-process Moka cache with a configurable TTL.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use moka::future::Cache;
use tracing::debug;

use crate::recipe::RecipeRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum LookupKind {
    Categories,
    Tags,
}

/// Category/tag list service backed by the recipe repository.
#[derive(Clone)]
pub struct LookupService {
    inner: Arc<LookupServiceInner>,
}

struct LookupServiceInner {
    repository: Arc<dyn RecipeRepository>,
    cache: Cache<LookupKind, Arc<Vec<String>>>,
}

impl LookupService {
    pub fn new(repository: Arc<dyn RecipeRepository>, ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(2)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self {
            inner: Arc::new(LookupServiceInner { repository, cache }),
        }
    }

    pub async fn categories(&self) -> Result<Arc<Vec<String>>> {
        self.load(LookupKind::Categories).await
    }

    pub async fn tags(&self) -> Result<Arc<Vec<String>>> {
        self.load(LookupKind::Tags).await
    }

    async fn load(&self, kind: LookupKind) -> Result<Arc<Vec<String>>> {
        let repository = self.inner.repository.clone();
        self.inner
            .cache
            .try_get_with(kind, async move {
                debug!(?kind, "lookup cache miss");
                let names = match kind {
                    LookupKind::Categories => repository.list_categories().await?,
                    LookupKind::Tags => repository.list_tags().await?,
                };
                Ok::<_, anyhow::Error>(Arc::new(names))
            })
            .await
            .map_err(|e| anyhow::anyhow!("failed to load {kind:?} list: {e}"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::recipe::MemoryRecipeRepository;
    use pantry_sdk::types::Recipe;
    use uuid::Uuid;

    fn recipe(category: &str, tags: &[&str]) -> Recipe {
        Recipe {
            id: Uuid::now_v7(),
            title: "Test".into(),
            description: String::new(),
            prep: None,
            cook: None,
            servings: None,
            steps: Vec::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            category: Some(category.into()),
            images: Vec::new(),
            ingredients: Vec::new(),
            created: 0,
            rating: None,
        }
    }

    #[tokio::test]
    async fn lists_are_cached_within_ttl() {
        let repo = Arc::new(MemoryRecipeRepository::new(vec![recipe("Soup", &["warm"])]));
        let service = LookupService::new(repo.clone(), 300);

        assert_eq!(*service.categories().await.unwrap(), vec!["Soup"]);

        repo.insert(recipe("Bread", &["baked"])).await;
        assert_eq!(*service.categories().await.unwrap(), vec!["Soup"]);

        // Tags were never loaded, so they see the new recipe.
        assert_eq!(*service.tags().await.unwrap(), vec!["baked", "warm"]);
    }
}
