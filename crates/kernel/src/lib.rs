//! Pantry Kernel Library
//!
//! Recipe query API: decodes the URL filter state, builds and executes the
//! database query, ranks the results, and serves them over HTTP.
//! The main entry point for running the server is the `pantry` binary.

pub mod config;
pub mod db;
pub mod error;
pub mod lookup;
pub mod recipe;
pub mod routes;
pub mod state;

use axum::Router;
use axum::http::{HeaderValue, Method};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;

/// Build the full application router with middleware.
pub fn build_router(state: AppState, config: &Config) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::recipe::router())
        .merge(routes::lookup::router())
        .layer(build_cors_layer(config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    let methods = [Method::GET, Method::OPTIONS];

    if config.cors_allowed_origins.len() == 1 && config.cors_allowed_origins[0] == "*" {
        CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods(methods)
            .allow_headers(tower_http::cors::Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_allowed_origins
            .iter()
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!(origin = %o, "ignoring unparseable CORS origin");
                    None
                }
            })
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(tower_http::cors::Any)
    }
}
