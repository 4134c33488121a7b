//! Application error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pantry_sdk::types::ErrorBody;
use thiserror::Error;

use crate::recipe::QueryError;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("recipe not found")]
    NotFound,

    #[error("bad request: {0}")]
    BadRequest(String),

    /// A filter reached the query builder in a state decoding never produces.
    #[error("invalid filter: {0}")]
    InvalidFilter(String),
}

impl From<QueryError> for AppError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::InvalidFilter(reason) => AppError::InvalidFilter(reason),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidFilter(_) => StatusCode::BAD_REQUEST,
        };

        // Internal details are logged, never returned.
        let error = match &self {
            AppError::Internal(e) => {
                tracing::error!(error = %e, "internal server error");
                "internal server error".to_string()
            }
            AppError::InvalidFilter(reason) => {
                tracing::warn!(reason = %reason, "rejected invalid filter");
                self.to_string()
            }
            _ => self.to_string(),
        };

        (status, Json(ErrorBody { error })).into_response()
    }
}

/// Result type alias using AppError.
pub type AppResult<T> = Result<T, AppError>;
