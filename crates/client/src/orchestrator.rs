//! Fetch orchestration for the recipe list.
//!
//! Every load takes a new request token. The visible state lives in a watch
//! channel together with the latest issued token, and a response is written
//! only if its token is still the latest when it arrives. Issuing a token and
//! applying a response both happen under the channel's lock, so an older
//! response can never overwrite a newer one regardless of arrival order.

use std::sync::Arc;

use pantry_sdk::filter::FilterState;
use pantry_sdk::types::{Page, Recipe};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::ClientError;
use crate::transport::RecipeTransport;

/// What the recipe list currently shows.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    /// May hold an empty page; an empty result is not an error.
    Loaded(Page),
    /// User-facing failure message.
    Failed(String),
}

/// Visible state plus the latest request token issued.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoadSnapshot {
    pub token: u64,
    pub state: LoadState,
}

/// Result of one `load` call from the caller's point of view.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded(Page),
    Failed(String),
    /// A newer load was issued before this one finished; its response was
    /// discarded.
    Superseded,
}

/// Issues recipe list fetches and keeps the visible state consistent.
#[derive(Clone)]
pub struct FetchOrchestrator {
    inner: Arc<FetchOrchestratorInner>,
}

struct FetchOrchestratorInner {
    transport: Arc<dyn RecipeTransport>,
    state: watch::Sender<LoadSnapshot>,
}

impl FetchOrchestrator {
    pub fn new(transport: Arc<dyn RecipeTransport>) -> Self {
        let (state, _) = watch::channel(LoadSnapshot::default());
        Self {
            inner: Arc::new(FetchOrchestratorInner { transport, state }),
        }
    }

    /// Receiver for rendering; changes whenever the visible state does.
    pub fn subscribe(&self) -> watch::Receiver<LoadSnapshot> {
        self.inner.state.subscribe()
    }

    /// Currently visible state.
    pub fn current(&self) -> LoadState {
        self.inner.state.borrow().state.clone()
    }

    /// Fetch the page for `filter` and publish it unless superseded.
    pub async fn load(&self, filter: FilterState) -> LoadOutcome {
        let token = self.begin();

        let state = match self.inner.transport.fetch_page(&filter).await {
            Ok(response) => LoadState::Loaded(Page::from_response(response, &filter)),
            Err(e) => {
                warn!(error = %e, token, "recipe list fetch failed");
                LoadState::Failed(e.user_message())
            }
        };

        self.finish(token, state)
    }

    /// Issue a load for the current query and for every later change.
    ///
    /// Loads run concurrently; the token rule decides which result stays
    /// visible. The task ends when the sender side is dropped.
    pub fn drive(&self, mut queries: watch::Receiver<FilterState>) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move {
            loop {
                let filter = queries.borrow_and_update().clone();
                let worker = this.clone();
                tokio::spawn(async move {
                    worker.load(filter).await;
                });

                if queries.changed().await.is_err() {
                    debug!("query source closed, stopping driver");
                    break;
                }
            }
        })
    }

    /// Home page recipes.
    pub async fn load_recommended(&self) -> Result<Vec<Recipe>, String> {
        self.inner
            .transport
            .fetch_recommended()
            .await
            .map(|response| response.recipes)
            .map_err(|e| report("recommended recipes", e))
    }

    /// A single recipe for the detail view.
    pub async fn load_recipe(&self, id: Uuid) -> Result<Recipe, String> {
        self.inner
            .transport
            .fetch_recipe(id)
            .await
            .map_err(|e| report("recipe detail", e))
    }

    fn begin(&self) -> u64 {
        let mut token = 0;
        self.inner.state.send_modify(|snapshot| {
            snapshot.token += 1;
            snapshot.state = LoadState::Loading;
            token = snapshot.token;
        });
        token
    }

    fn finish(&self, token: u64, state: LoadState) -> LoadOutcome {
        let outcome = match &state {
            LoadState::Loaded(page) => LoadOutcome::Loaded(page.clone()),
            LoadState::Failed(message) => LoadOutcome::Failed(message.clone()),
            LoadState::Idle | LoadState::Loading => LoadOutcome::Superseded,
        };

        let applied = self.inner.state.send_if_modified(|snapshot| {
            if snapshot.token == token {
                snapshot.state = state;
                true
            } else {
                false
            }
        });

        if applied {
            outcome
        } else {
            debug!(token, "discarding stale recipe list response");
            LoadOutcome::Superseded
        }
    }
}

fn report(what: &str, err: ClientError) -> String {
    warn!(error = %err, "failed to load {what}");
    err.user_message()
}
