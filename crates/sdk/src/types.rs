//! Recipe records and the wire shapes of the recipe API.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::filter::FilterState;
use crate::pagination::total_pages;

/// A recipe as stored in the catalog.
///
/// The pipeline never mutates stored recipes. `rating` is the only field
/// filled in transiently (by the server-side ranker) and is never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique identifier (UUIDv7, time-sortable).
    pub id: Uuid,

    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Preparation time in minutes.
    #[serde(default)]
    pub prep: Option<i32>,

    /// Cooking time in minutes.
    #[serde(default)]
    pub cook: Option<i32>,

    #[serde(default)]
    pub servings: Option<i32>,

    /// Ordered instructions.
    #[serde(default)]
    pub steps: Vec<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub category: Option<String>,

    /// Image URLs.
    #[serde(default)]
    pub images: Vec<String>,

    #[serde(default)]
    pub ingredients: Vec<Ingredient>,

    /// Unix timestamp when created; the creation-order sort key.
    #[serde(default)]
    pub created: i64,

    /// Synthesized popularity score, present only in API responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
}

impl Recipe {
    /// Number of instruction steps.
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Whether the recipe carries every tag in `required`.
    pub fn has_all_tags<'a>(&self, required: impl IntoIterator<Item = &'a String>) -> bool {
        required.into_iter().all(|t| self.tags.contains(t))
    }
}

/// A single ingredient line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    #[serde(default)]
    pub quantity: String,
}

/// Body of `GET /api/recipes` and `GET /api/recipes/recent`.
///
/// An empty result is a successful response carrying only a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListResponse {
    Recipes {
        recipes: Vec<Recipe>,
        #[serde(
            rename = "totalCount",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        total_count: Option<u64>,
    },
    Empty {
        message: String,
    },
}

/// Message used for a successful, empty list response.
pub const NO_RECIPES_MESSAGE: &str = "No recipes found.";

impl ListResponse {
    /// Build the response for a fetched page, switching to the message form
    /// when nothing matched.
    pub fn from_recipes(recipes: Vec<Recipe>, total_count: Option<u64>) -> Self {
        if recipes.is_empty() {
            ListResponse::Empty {
                message: NO_RECIPES_MESSAGE.to_string(),
            }
        } else {
            ListResponse::Recipes {
                recipes,
                total_count,
            }
        }
    }
}

/// Body of `GET /api/recipes/recommended`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedResponse {
    pub recipes: Vec<Recipe>,
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// One fetched page of the recipe list.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub recipes: Vec<Recipe>,
    /// Total matching recipes, when the server reported it.
    pub total_count: Option<u64>,
    pub page: u32,
    pub limit: u32,
}

impl Page {
    /// Interpret a list response for the filter state it was fetched with.
    pub fn from_response(response: ListResponse, filter: &FilterState) -> Self {
        let (recipes, total_count) = match response {
            ListResponse::Recipes {
                recipes,
                total_count,
            } => (recipes, total_count),
            // The empty form carries no total; on the first page that still
            // proves there are no matches at all.
            ListResponse::Empty { .. } => (Vec::new(), (filter.page == 1).then_some(0)),
        };

        Self {
            recipes,
            total_count,
            page: filter.page,
            limit: filter.limit,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// `ceil(total_count / limit)`, or `None` when the total is unknown.
    pub fn total_pages(&self) -> Option<u32> {
        self.total_count.map(|total| total_pages(total, self.limit))
    }
}
