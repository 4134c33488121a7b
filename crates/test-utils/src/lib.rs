//! Pantry test utilities.
//!
//! Helpers for integration testing: recipe fixtures, a small sample
//! catalog, and assertion utilities for query and response checks.

use pantry_sdk::types::{Ingredient, Recipe};
use uuid::Uuid;

/// Create a test recipe with default values.
pub fn test_recipe(title: &str) -> TestRecipe {
    TestRecipe {
        recipe: Recipe {
            id: Uuid::now_v7(),
            title: title.to_string(),
            description: String::new(),
            prep: None,
            cook: None,
            servings: None,
            steps: Vec::new(),
            tags: Vec::new(),
            category: None,
            images: Vec::new(),
            ingredients: Vec::new(),
            created: chrono::Utc::now().timestamp(),
            rating: None,
        },
    }
}

/// A recipe builder for creating test fixtures.
#[derive(Debug, Clone)]
pub struct TestRecipe {
    recipe: Recipe,
}

impl TestRecipe {
    /// Set a custom ID.
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.recipe.id = id;
        self
    }

    /// Set an ID from a small integer, for readable ordering assertions.
    pub fn with_numeric_id(self, n: u128) -> Self {
        self.with_id(Uuid::from_u128(n))
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.recipe.description = description.to_string();
        self
    }

    /// Set prep and cook time in minutes.
    pub fn with_times(mut self, prep: i32, cook: i32) -> Self {
        self.recipe.prep = Some(prep);
        self.recipe.cook = Some(cook);
        self
    }

    pub fn with_servings(mut self, servings: i32) -> Self {
        self.recipe.servings = Some(servings);
        self
    }

    /// Give the recipe `count` numbered steps.
    pub fn with_step_count(mut self, count: usize) -> Self {
        self.recipe.steps = (1..=count).map(|i| format!("Step {i}")).collect();
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.recipe.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn in_category(mut self, category: &str) -> Self {
        self.recipe.category = Some(category.to_string());
        self
    }

    pub fn with_image(mut self, url: &str) -> Self {
        self.recipe.images.push(url.to_string());
        self
    }

    pub fn with_ingredient(mut self, name: &str, quantity: &str) -> Self {
        self.recipe.ingredients.push(Ingredient {
            name: name.to_string(),
            quantity: quantity.to_string(),
        });
        self
    }

    /// Set the creation timestamp (storage order key).
    pub fn created_at(mut self, created: i64) -> Self {
        self.recipe.created = created;
        self
    }

    pub fn build(self) -> Recipe {
        self.recipe
    }
}

/// Sample catalogs for route and pipeline tests.
pub mod catalog {
    use super::*;

    /// Six recipes with fixed ids 1..=6 and creation times 1000..=6000.
    ///
    /// | id | title             | category  | tags              | steps | prep |
    /// |----|-------------------|-----------|-------------------|-------|------|
    /// | 1  | Tomato Soup       | Soup      | vegan, quick      | 3     | 10   |
    /// | 2  | Lentil Stew       | Soup      | vegan             | 5     | 15   |
    /// | 3  | Pancakes          | Breakfast | quick, sweet      | 4     | 5    |
    /// | 4  | Vegan Chili       | Dinner    | vegan, quick, hot | 6     | 20   |
    /// | 5  | Roast Chicken     | Dinner    | (none)            | 5     | 15   |
    /// | 6  | Overnight Oats    | Breakfast | vegan, quick      | 2     | 5    |
    pub fn sample() -> Vec<Recipe> {
        vec![
            test_recipe("Tomato Soup")
                .with_numeric_id(1)
                .with_description("Simple soup from ripe tomatoes")
                .in_category("Soup")
                .with_tags(&["vegan", "quick"])
                .with_step_count(3)
                .with_times(10, 25)
                .with_ingredient("tomatoes", "6")
                .created_at(1000)
                .build(),
            test_recipe("Lentil Stew")
                .with_numeric_id(2)
                .with_description("Hearty stew")
                .in_category("Soup")
                .with_tags(&["vegan"])
                .with_step_count(5)
                .with_times(15, 45)
                .created_at(2000)
                .build(),
            test_recipe("Pancakes")
                .with_numeric_id(3)
                .with_description("Fluffy breakfast pancakes with syrup")
                .in_category("Breakfast")
                .with_tags(&["quick", "sweet"])
                .with_step_count(4)
                .with_times(5, 10)
                .created_at(3000)
                .build(),
            test_recipe("Vegan Chili")
                .with_numeric_id(4)
                .with_description("Smoky bean chili")
                .in_category("Dinner")
                .with_tags(&["vegan", "quick", "hot"])
                .with_step_count(6)
                .with_times(20, 40)
                .created_at(4000)
                .build(),
            test_recipe("Roast Chicken")
                .with_numeric_id(5)
                .with_description("Sunday roast with tomato salad")
                .in_category("Dinner")
                .with_step_count(5)
                .with_times(15, 80)
                .created_at(5000)
                .build(),
            test_recipe("Overnight Oats")
                .with_numeric_id(6)
                .in_category("Breakfast")
                .with_tags(&["vegan", "quick"])
                .with_step_count(2)
                .with_times(5, 0)
                .created_at(6000)
                .build(),
        ]
    }

    /// `count` recipes in one category, all with the same step count, so any
    /// field sort is decided by the identifier tie-break.
    pub fn uniform(count: u128) -> Vec<Recipe> {
        (1..=count)
            .map(|n| {
                test_recipe(&format!("Recipe {n}"))
                    .with_numeric_id(n)
                    .in_category("Bulk")
                    .with_step_count(3)
                    .with_times(10, 10)
                    .created_at(1000)
                    .build()
            })
            .collect()
    }
}

/// Assertion helpers for JSON responses and rendered SQL.
pub mod assert {
    use serde_json::Value;

    /// Assert that a JSON value has a specific key.
    pub fn has_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_some(),
            "Expected JSON to have key '{key}', got: {value}"
        );
    }

    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert that a string does not contain a substring.
    pub fn not_contains(haystack: &str, needle: &str) {
        assert!(
            !haystack.contains(needle),
            "Expected string to NOT contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Titles of the `recipes` array in a list response, in order.
    pub fn titles(body: &Value) -> Vec<String> {
        body["recipes"]
            .as_array()
            .map(|recipes| {
                recipes
                    .iter()
                    .filter_map(|r| r["title"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}
