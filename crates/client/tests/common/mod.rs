#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Fake transport for client tests.
//!
//! List responses are gated per page number: a fetch for page N waits until
//! the test releases the gate for N, so tests control arrival order exactly.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use pantry_client::{ClientError, RecipeTransport};
use pantry_sdk::filter::FilterState;
use pantry_sdk::types::{ListResponse, Recipe, RecommendedResponse};
use tokio::sync::oneshot;
use uuid::Uuid;

type Reply = Result<ListResponse, ClientError>;

#[derive(Default)]
pub struct FakeTransport {
    gates: Mutex<HashMap<u32, oneshot::Receiver<Reply>>>,
    recipes: Vec<Recipe>,
    categories: Vec<String>,
    /// Lookup calls that fail before lookups start succeeding.
    lookup_failures: AtomicUsize,
    pub lookup_calls: AtomicUsize,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_recipes(mut self, recipes: Vec<Recipe>) -> Self {
        self.recipes = recipes;
        self
    }

    pub fn with_categories(mut self, categories: &[&str]) -> Self {
        self.categories = categories.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn failing_lookups(self, count: usize) -> Self {
        self.lookup_failures.store(count, Ordering::SeqCst);
        self
    }

    /// Gate the response for `page`; send on the returned sender to release it.
    pub fn gate(&self, page: u32) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(page, rx);
        tx
    }

    fn lookup(&self, names: &[String]) -> Result<Vec<String>, ClientError> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        let failed = self
            .lookup_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            Err(ClientError::Server {
                status: 503,
                message: "unavailable".into(),
            })
        } else {
            Ok(names.to_vec())
        }
    }
}

#[async_trait]
impl RecipeTransport for FakeTransport {
    async fn fetch_page(&self, filter: &FilterState) -> Result<ListResponse, ClientError> {
        let gate = self.gates.lock().unwrap().remove(&filter.page);
        match gate {
            Some(rx) => rx.await.expect("gate dropped"),
            None => Ok(ListResponse::from_recipes(
                self.recipes.clone(),
                Some(self.recipes.len() as u64),
            )),
        }
    }

    async fn fetch_recommended(&self) -> Result<RecommendedResponse, ClientError> {
        Ok(RecommendedResponse {
            recipes: self.recipes.clone(),
        })
    }

    async fn fetch_recipe(&self, id: Uuid) -> Result<Recipe, ClientError> {
        self.recipes
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(ClientError::NotFound)
    }

    async fn fetch_categories(&self) -> Result<Vec<String>, ClientError> {
        self.lookup(&self.categories)
    }

    async fn fetch_tags(&self) -> Result<Vec<String>, ClientError> {
        self.lookup(&[])
    }
}

/// A list response holding one recipe with the given title.
pub fn single(title: &str) -> Reply {
    let recipe = pantry_test_utils::test_recipe(title).build();
    Ok(ListResponse::from_recipes(vec![recipe], Some(1)))
}
