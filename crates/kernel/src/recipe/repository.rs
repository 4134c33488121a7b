//! Recipe storage backends.
//!
//! Provides trait and implementations for reading recipes from PostgreSQL or
//! from an in-memory catalog.

use anyhow::{Context, Result};
use async_trait::async_trait;
use pantry_sdk::types::Recipe;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::query_builder::{QuerySpec, RecipeQueryBuilder};

/// One page of query results with the total match count.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPage {
    pub recipes: Vec<Recipe>,
    pub total: u64,
}

/// Read access to the recipe catalog.
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Execute a query: matching recipes for the requested window, plus the
    /// number of matches ignoring skip/limit.
    async fn fetch_page(&self, spec: &QuerySpec) -> Result<FetchedPage>;

    /// Load a single recipe.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Recipe>>;

    /// All category names, sorted.
    async fn list_categories(&self) -> Result<Vec<String>>;

    /// All tag names, sorted.
    async fn list_tags(&self) -> Result<Vec<String>>;

    /// Check if the backend is reachable.
    async fn is_healthy(&self) -> bool;
}

/// PostgreSQL-backed catalog.
pub struct PgRecipeRepository {
    pool: PgPool,
}

impl PgRecipeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecipeRepository for PgRecipeRepository {
    async fn fetch_page(&self, spec: &QuerySpec) -> Result<FetchedPage> {
        let builder = RecipeQueryBuilder::new(spec);

        // SET LOCAL only applies inside a transaction.
        let mut tx = self
            .pool
            .begin()
            .await
            .context("failed to begin transaction")?;

        sqlx::query("SET LOCAL statement_timeout = '10s'")
            .execute(&mut *tx)
            .await
            .context("failed to set statement timeout")?;

        let count_sql = builder.build_count();
        let total: i64 = sqlx::query_scalar(&count_sql)
            .fetch_one(&mut *tx)
            .await
            .context("failed to execute count query")?;

        let main_sql = builder.build();
        let rows: Vec<serde_json::Value> =
            sqlx::query_scalar(&format!("SELECT row_to_json(t) FROM ({main_sql}) t"))
                .fetch_all(&mut *tx)
                .await
                .context("failed to execute main query")?;

        tx.commit()
            .await
            .context("failed to commit query transaction")?;

        let recipes = rows
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Recipe>, _>>()
            .context("failed to decode recipe row")?;

        tracing::debug!(
            total,
            returned = recipes.len(),
            skip = spec.skip,
            limit = spec.limit,
            "recipe query executed"
        );

        Ok(FetchedPage {
            recipes,
            total: u64::try_from(total).unwrap_or(0),
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Recipe>> {
        let row: Option<serde_json::Value> = sqlx::query_scalar(
            "SELECT row_to_json(t) FROM (SELECT * FROM recipe WHERE id = $1) t",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("failed to fetch recipe")?;

        row.map(serde_json::from_value)
            .transpose()
            .context("failed to decode recipe row")
    }

    async fn list_categories(&self) -> Result<Vec<String>> {
        sqlx::query_scalar("SELECT name FROM category ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .context("failed to list categories")
    }

    async fn list_tags(&self) -> Result<Vec<String>> {
        sqlx::query_scalar("SELECT name FROM tag ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .context("failed to list tags")
    }

    async fn is_healthy(&self) -> bool {
        crate::db::check_health(&self.pool).await
    }
}

/// In-memory catalog evaluating queries with [`QuerySpec::matches`] and
/// [`QuerySpec::compare`].
///
/// Categories and tags are derived from the stored recipes.
#[derive(Default)]
pub struct MemoryRecipeRepository {
    recipes: RwLock<Vec<Recipe>>,
}

impl MemoryRecipeRepository {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self {
            recipes: RwLock::new(recipes),
        }
    }

    pub async fn insert(&self, recipe: Recipe) {
        self.recipes.write().await.push(recipe);
    }
}

#[async_trait]
impl RecipeRepository for MemoryRecipeRepository {
    async fn fetch_page(&self, spec: &QuerySpec) -> Result<FetchedPage> {
        let recipes = self.recipes.read().await;

        let mut matched: Vec<&Recipe> = recipes.iter().filter(|r| spec.matches(r)).collect();
        matched.sort_by(|a, b| spec.compare(a, b));

        let total = matched.len() as u64;
        let skip = usize::try_from(spec.skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(spec.limit).unwrap_or(usize::MAX);

        let page = matched
            .into_iter()
            .skip(skip)
            .take(limit)
            .cloned()
            .collect();

        Ok(FetchedPage {
            recipes: page,
            total,
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Recipe>> {
        let recipes = self.recipes.read().await;
        Ok(recipes.iter().find(|r| r.id == id).cloned())
    }

    async fn list_categories(&self) -> Result<Vec<String>> {
        let recipes = self.recipes.read().await;
        let mut names: Vec<String> = recipes.iter().filter_map(|r| r.category.clone()).collect();
        names.sort();
        names.dedup();
        Ok(names)
    }

    async fn list_tags(&self) -> Result<Vec<String>> {
        let recipes = self.recipes.read().await;
        let mut names: Vec<String> = recipes.iter().flat_map(|r| r.tags.clone()).collect();
        names.sort();
        names.dedup();
        Ok(names)
    }

    async fn is_healthy(&self) -> bool {
        true
    }
}
