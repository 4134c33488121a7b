//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::db;
use crate::lookup::LookupService;
use crate::recipe::{DigestRating, PgRecipeRepository, RecipeRepository, ResultRanker};

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Recipe catalog.
    recipes: Arc<dyn RecipeRepository>,

    /// Cached category and tag lists.
    lookups: LookupService,

    /// Rating attachment and rating-order sorting.
    ranker: ResultRanker,
}

impl AppState {
    /// Create application state backed by PostgreSQL.
    ///
    /// Connects the pool and applies pending migrations.
    pub async fn new(config: &Config) -> Result<Self> {
        let pool = db::create_pool(config)
            .await
            .context("failed to create database pool")?;

        db::run_migrations(&pool)
            .await
            .context("failed to run migrations")?;

        info!("Database migrations applied");

        Ok(Self::with_repository(
            config,
            Arc::new(PgRecipeRepository::new(pool)),
        ))
    }

    /// Create application state over any repository.
    pub fn with_repository(config: &Config, recipes: Arc<dyn RecipeRepository>) -> Self {
        let lookups = LookupService::new(recipes.clone(), config.lookup_cache_ttl_secs);
        let ranker = ResultRanker::new(DigestRating::new(config.rating_salt.clone()));

        Self {
            inner: Arc::new(AppStateInner {
                recipes,
                lookups,
                ranker,
            }),
        }
    }

    pub fn recipes(&self) -> &Arc<dyn RecipeRepository> {
        &self.inner.recipes
    }

    pub fn lookups(&self) -> &LookupService {
        &self.inner.lookups
    }

    pub fn ranker(&self) -> &ResultRanker {
        &self.inner.ranker
    }

    /// Check if the recipe store is reachable.
    pub async fn storage_healthy(&self) -> bool {
        self.inner.recipes.is_healthy().await
    }
}
