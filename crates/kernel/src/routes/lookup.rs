//! Category and tag list routes.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::error::AppResult;
use crate::state::AppState;

/// Create the lookup router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/categories", get(list_categories))
        .route("/api/tags", get(list_tags))
}

async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    let names = state.lookups().categories().await?;
    Ok(Json(names.as_ref().clone()))
}

async fn list_tags(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    let names = state.lookups().tags().await?;
    Ok(Json(names.as_ref().clone()))
}
