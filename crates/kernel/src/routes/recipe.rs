//! Recipe query API routes.
//!
//! The list endpoint takes the same query string the UI keeps in its URL, so
//! a bookmarked page and the API request behind it are the same contract.

use axum::extract::{Path, Query, RawQuery, State};
use axum::routing::get;
use axum::{Json, Router};
use pantry_sdk::codec;
use pantry_sdk::filter::SortMode;
use pantry_sdk::types::{ListResponse, Recipe, RecommendedResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::recipe::{HOME_CANDIDATE_LIMIT, HOME_TOP_N, QuerySpec, SortField};
use crate::state::AppState;

/// Create the recipe router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/recipes", get(list_recipes))
        .route("/api/recipes/recent", get(recent_recipes))
        .route("/api/recipes/recommended", get(recommended_recipes))
        .route("/api/recipes/{id}", get(get_recipe))
}

/// List recipes matching the filter encoded in the query string.
async fn list_recipes(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> AppResult<Json<ListResponse>> {
    let filter = codec::decode(query.as_deref().unwrap_or_default());
    let spec = QuerySpec::build(&filter)?;

    let page = state.recipes().fetch_page(&spec).await?;
    let recipes = state.ranker().rank(page.recipes, filter.sort_mode());

    tracing::debug!(
        page = filter.page,
        total = page.total,
        returned = recipes.len(),
        "listed recipes"
    );

    Ok(Json(ListResponse::from_recipes(recipes, Some(page.total))))
}

#[derive(Debug, Deserialize)]
struct RecentParams {
    /// Stored field to sort by, descending. Anything unknown means
    /// most-recent-first.
    sort: Option<String>,
}

/// Unfiltered recipes, most recent first or descending by one field.
async fn recent_recipes(
    State(state): State<AppState>,
    Query(params): Query<RecentParams>,
    RawQuery(query): RawQuery,
) -> AppResult<Json<ListResponse>> {
    // Only page and limit are read from the shared codec here.
    let paging = codec::decode(query.as_deref().unwrap_or_default());
    let field = params.sort.as_deref().and_then(SortField::from_column);
    let spec = QuerySpec::recent(field, paging.page, paging.limit)?;

    let page = state.recipes().fetch_page(&spec).await?;
    let recipes = state.ranker().rank(page.recipes, SortMode::Storage);

    Ok(Json(ListResponse::from_recipes(recipes, Some(page.total))))
}

/// Home page selection: the best rated of the most recent recipes.
async fn recommended_recipes(
    State(state): State<AppState>,
) -> AppResult<Json<RecommendedResponse>> {
    let spec = QuerySpec::recent(None, 1, HOME_CANDIDATE_LIMIT)?;
    let candidates = state.recipes().fetch_page(&spec).await?;
    let recipes = state.ranker().recommend(candidates.recipes, HOME_TOP_N);

    Ok(Json(RecommendedResponse { recipes }))
}

/// Single recipe for the detail view.
async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Recipe>> {
    let id = Uuid::parse_str(&id)
        .map_err(|_| AppError::BadRequest(format!("invalid recipe id '{id}'")))?;

    let recipe = state
        .recipes()
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut rated = state.ranker().rank(vec![recipe], SortMode::Storage);
    rated.pop().map(Json).ok_or(AppError::NotFound)
}
