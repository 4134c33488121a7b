//! Transport to the recipe API.

use async_trait::async_trait;
use pantry_sdk::codec;
use pantry_sdk::filter::FilterState;
use pantry_sdk::types::{ErrorBody, ListResponse, Recipe, RecommendedResponse};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::ClientError;

/// Requests the client can make against the recipe API.
#[async_trait]
pub trait RecipeTransport: Send + Sync {
    /// One page of the recipe list for `filter`.
    async fn fetch_page(&self, filter: &FilterState) -> Result<ListResponse, ClientError>;

    /// Home page selection.
    async fn fetch_recommended(&self) -> Result<RecommendedResponse, ClientError>;

    /// A single recipe for the detail view.
    async fn fetch_recipe(&self, id: Uuid) -> Result<Recipe, ClientError>;

    async fn fetch_categories(&self) -> Result<Vec<String>, ClientError>;

    async fn fetch_tags(&self) -> Result<Vec<String>, ClientError>;
}

/// HTTP transport using reqwest.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base: Url,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent("Pantry-Client/0.1")
            .build()
            .unwrap_or_default();

        Self {
            client,
            base: config.api_url.clone(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Option<&str>,
    ) -> Result<T, ClientError> {
        let mut url = self.base.join(path)?;
        url.set_query(query.filter(|q| !q.is_empty()));

        tracing::debug!(%url, "recipe API request");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(server_error(status, &body));
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

/// Longest fallback body excerpt carried into a [`ClientError::Server`].
const MAX_BODY_EXCERPT: usize = 120;

fn server_error(status: StatusCode, body: &[u8]) -> ClientError {
    let message = match serde_json::from_slice::<ErrorBody>(body) {
        Ok(parsed) => first_line(&parsed.error),
        Err(_) => body_excerpt(&String::from_utf8_lossy(body)),
    };
    ClientError::Server {
        status: status.as_u16(),
        message,
    }
}

/// First non-empty line of a non-JSON error body, capped in length. Markup
/// (a proxy's HTML error page) is dropped entirely.
fn body_excerpt(body: &str) -> String {
    let line = first_line(body);
    if line.starts_with('<') {
        return String::new();
    }
    line
}

fn first_line(text: &str) -> String {
    let line = text
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or_default();
    match line.char_indices().nth(MAX_BODY_EXCERPT) {
        Some((cut, _)) => format!("{}...", &line[..cut]),
        None => line.to_string(),
    }
}

#[async_trait]
impl RecipeTransport for HttpTransport {
    async fn fetch_page(&self, filter: &FilterState) -> Result<ListResponse, ClientError> {
        let query = codec::encode(filter);
        self.get_json("/api/recipes", Some(&query)).await
    }

    async fn fetch_recommended(&self) -> Result<RecommendedResponse, ClientError> {
        self.get_json("/api/recipes/recommended", None).await
    }

    async fn fetch_recipe(&self, id: Uuid) -> Result<Recipe, ClientError> {
        match self.get_json(&format!("/api/recipes/{id}"), None).await {
            Err(ClientError::Server { status: 404, .. }) => Err(ClientError::NotFound),
            other => other,
        }
    }

    async fn fetch_categories(&self) -> Result<Vec<String>, ClientError> {
        self.get_json("/api/categories", None).await
    }

    async fn fetch_tags(&self) -> Result<Vec<String>, ClientError> {
        self.get_json("/api/tags", None).await
    }
}
