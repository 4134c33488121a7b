//! Popularity ratings and rating-based ordering.
//!
//! Ratings are synthesized, never stored: each listed recipe gets a score in
//! `[RATING_MIN, RATING_MAX]` with one decimal place. The list endpoint only
//! reorders by rating when the client asked for rating order; the home page
//! always takes the top rated candidates.

use std::cmp::Ordering;

use pantry_sdk::filter::{SortMode, SortOrder};
use pantry_sdk::types::Recipe;
use sha2::{Digest, Sha256};
use uuid::Uuid;

pub const RATING_MIN: f32 = 1.0;
pub const RATING_MAX: f32 = 5.0;

/// Candidates fetched for the home page before ranking.
pub const HOME_CANDIDATE_LIMIT: u32 = 100;

/// Recipes kept on the home page after ranking.
pub const HOME_TOP_N: usize = 10;

/// Produces a rating for a recipe.
pub trait RatingSource: Send + Sync {
    fn rate(&self, recipe: &Recipe) -> f32;
}

/// Rating derived from a SHA-256 digest of a salt and the recipe id.
///
/// The same recipe always gets the same score for a given salt, so rating
/// order is reproducible across requests and pages.
#[derive(Debug, Clone)]
pub struct DigestRating {
    salt: String,
}

impl DigestRating {
    pub fn new(salt: impl Into<String>) -> Self {
        Self { salt: salt.into() }
    }

    fn score(&self, id: &Uuid) -> f32 {
        let mut hasher = Sha256::new();
        hasher.update(self.salt.as_bytes());
        hasher.update(id.as_bytes());
        let digest = hasher.finalize();

        // 41 one-decimal steps from 1.0 to 5.0 inclusive.
        let bucket = u16::from_be_bytes([digest[0], digest[1]]) % 41;
        RATING_MIN + f32::from(bucket) / 10.0
    }
}

impl RatingSource for DigestRating {
    fn rate(&self, recipe: &Recipe) -> f32 {
        self.score(&recipe.id)
    }
}

/// Attaches ratings and applies rating order.
pub struct ResultRanker {
    source: Box<dyn RatingSource>,
}

impl ResultRanker {
    pub fn new(source: impl RatingSource + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    /// Rate every recipe; reorder only when `mode` is rating order.
    ///
    /// The sort is stable, so recipes with equal ratings keep the order the
    /// query produced.
    pub fn rank(&self, mut recipes: Vec<Recipe>, mode: SortMode) -> Vec<Recipe> {
        self.attach(&mut recipes);

        if let SortMode::Rating(order) = mode {
            recipes.sort_by(|a, b| {
                let ord = compare_ratings(a, b);
                match order {
                    SortOrder::Asc => ord,
                    SortOrder::Desc => ord.reverse(),
                }
            });
        }

        recipes
    }

    /// Highest rated `top_n` recipes from `candidates`, best first.
    pub fn recommend(&self, candidates: Vec<Recipe>, top_n: usize) -> Vec<Recipe> {
        let mut ranked = self.rank(candidates, SortMode::Rating(SortOrder::Desc));
        ranked.truncate(top_n);
        ranked
    }

    fn attach(&self, recipes: &mut [Recipe]) {
        for recipe in recipes.iter_mut() {
            recipe.rating = Some(self.source.rate(recipe));
        }
    }
}

impl Default for ResultRanker {
    fn default() -> Self {
        Self::new(DigestRating::new("pantry"))
    }
}

fn compare_ratings(a: &Recipe, b: &Recipe) -> Ordering {
    a.rating
        .unwrap_or(RATING_MIN)
        .total_cmp(&b.rating.unwrap_or(RATING_MIN))
}
