#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! Requests go through the REAL kernel router, state, ranker and lookup
//! cache. Only the storage backend is swapped for the in-memory repository,
//! which evaluates the same `QuerySpec` the Postgres backend renders.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use http_body_util::BodyExt;
use pantry_sdk::types::Recipe;
use serde_json::Value;
use tower::ServiceExt;

use pantry_kernel::recipe::MemoryRecipeRepository;
use pantry_kernel::{AppState, Config, build_router};

/// Test application wrapper using the REAL kernel routes and state.
pub struct TestApp {
    router: Router,
    pub repository: Arc<MemoryRecipeRepository>,
    pub state: AppState,
}

impl TestApp {
    /// Create a test application serving `recipes`.
    pub fn new(recipes: Vec<Recipe>) -> Self {
        let config = Config::for_tests();
        let repository = Arc::new(MemoryRecipeRepository::new(recipes));
        let state = AppState::with_repository(&config, repository.clone());
        let router = build_router(state.clone(), &config);

        Self {
            router,
            repository,
            state,
        }
    }

    /// Test application over the sample catalog.
    pub fn with_sample_catalog() -> Self {
        Self::new(pantry_test_utils::catalog::sample())
    }

    /// Send a request to the test application.
    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request")
    }

    /// GET `uri` and return the status and JSON body.
    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let response = self
            .request(Request::get(uri).body(Body::empty()).unwrap())
            .await;
        let status = response.status();
        (status, response_json(response).await)
    }
}

pub async fn response_json(response: Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap_or(Value::Null)
}
