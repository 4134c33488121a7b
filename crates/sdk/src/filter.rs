//! Filter and sort state for the recipe list.
//!
//! [`FilterState`] is the decoded form of the list page's query string. It is
//! rebuilt from the URL on every navigation; a change produces a new value
//! (and a new URL) instead of mutating the current one.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Page size used when the query string carries no usable `limit`.
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Upper bound for `limit`; larger requests are clamped.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Explicit sort fields selectable in the list UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortBy {
    #[serde(rename = "PREPTIME")]
    PrepTime,
    #[serde(rename = "COOKTIME")]
    CookTime,
    #[serde(rename = "STEPS")]
    Steps,
    #[serde(rename = "DATE")]
    Date,
}

impl SortBy {
    /// Wire name used in the `sortBy` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::PrepTime => "PREPTIME",
            SortBy::CookTime => "COOKTIME",
            SortBy::Steps => "STEPS",
            SortBy::Date => "DATE",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PREPTIME" => Ok(SortBy::PrepTime),
            "COOKTIME" => Ok(SortBy::CookTime),
            "STEPS" => Ok(SortBy::Steps),
            "DATE" => Ok(SortBy::Date),
            _ => Err(UnknownValue(s.to_string())),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Wire name used in the `sortOrder` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(UnknownValue(s.to_string())),
        }
    }
}

/// A query value that names no known variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownValue(pub String);

impl fmt::Display for UnknownValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown value '{}'", self.0)
    }
}

impl std::error::Error for UnknownValue {}

/// How a result set should be ordered, derived from `sort_by`/`sort_order`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    /// No sort requested: storage order (most recent first).
    Storage,
    /// Explicit field sort, executed by the database.
    Field(SortBy, SortOrder),
    /// No field but a direction: order by synthesized rating.
    Rating(SortOrder),
}

/// Decoded filter, sort, and pagination state of the recipe list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    /// Free-text search over title and description. Empty means no search.
    pub search: String,
    /// Exact category. Empty means any category.
    pub category: String,
    /// Required tags; a recipe must carry all of them.
    pub tags: BTreeSet<String>,
    /// Minimum number of steps.
    pub min_steps: Option<u32>,
    pub sort_by: Option<SortBy>,
    pub sort_order: Option<SortOrder>,
    /// 1-indexed page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: String::new(),
            tags: BTreeSet::new(),
            min_steps: None,
            sort_by: None,
            sort_order: None,
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl FilterState {
    /// Resolve the ordering this state asks for.
    pub fn sort_mode(&self) -> SortMode {
        match (self.sort_by, self.sort_order) {
            (Some(by), order) => SortMode::Field(by, order.unwrap_or_default()),
            (None, Some(order)) => SortMode::Rating(order),
            (None, None) => SortMode::Storage,
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Set the page size. Zero falls back to [`DEFAULT_PAGE_LIMIT`] and
    /// anything above [`MAX_PAGE_LIMIT`] is clamped, as decoding does.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = match limit {
            0 => DEFAULT_PAGE_LIMIT,
            n => n.min(MAX_PAGE_LIMIT),
        };
        self
    }

    /// Replace the search text. A new search starts from the first page.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self.page = 1;
        self
    }

    /// Select a category (empty clears it). Starts from the first page and
    /// keeps every other filter.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self.page = 1;
        self
    }

    /// Add a tag. Blank tags are ignored.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        if !tag.is_empty() {
            self.tags.insert(tag);
        }
        self
    }

    /// Add the tag if absent, remove it if present.
    pub fn toggle_tag(mut self, tag: &str) -> Self {
        if !self.tags.remove(tag) && !tag.is_empty() {
            self.tags.insert(tag.to_string());
        }
        self
    }

    pub fn with_min_steps(mut self, min_steps: Option<u32>) -> Self {
        self.min_steps = min_steps;
        self
    }

    /// Apply an explicit field sort. Filters and page are preserved.
    pub fn with_sort(mut self, by: SortBy, order: SortOrder) -> Self {
        self.sort_by = Some(by);
        self.sort_order = Some(order);
        self
    }

    /// Order by synthesized rating instead of a stored field.
    pub fn with_rating_order(mut self, order: SortOrder) -> Self {
        self.sort_by = None;
        self.sort_order = Some(order);
        self
    }

    /// Drop both sort fields, returning to storage order.
    pub fn clear_sort(mut self) -> Self {
        self.sort_by = None;
        self.sort_order = None;
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn default_state() {
        let f = FilterState::default();
        assert_eq!(f.page, 1);
        assert_eq!(f.limit, DEFAULT_PAGE_LIMIT);
        assert_eq!(f.sort_mode(), SortMode::Storage);
    }

    #[test]
    fn with_limit_clamps_like_decoding() {
        assert_eq!(FilterState::default().with_limit(0).limit, DEFAULT_PAGE_LIMIT);
        assert_eq!(FilterState::default().with_limit(1).limit, 1);
        assert_eq!(FilterState::default().with_limit(100).limit, MAX_PAGE_LIMIT);
        assert_eq!(FilterState::default().with_limit(101).limit, MAX_PAGE_LIMIT);
        assert_eq!(FilterState::default().with_limit(u32::MAX).limit, MAX_PAGE_LIMIT);
    }

    #[test]
    fn sort_by_without_order_defaults_to_asc() {
        let f = FilterState {
            sort_by: Some(SortBy::Steps),
            ..Default::default()
        };
        assert_eq!(f.sort_mode(), SortMode::Field(SortBy::Steps, SortOrder::Asc));
    }

    #[test]
    fn order_without_field_is_rating_mode() {
        let f = FilterState::default().with_rating_order(SortOrder::Desc);
        assert_eq!(f.sort_mode(), SortMode::Rating(SortOrder::Desc));
    }

    #[test]
    fn sort_by_parses_case_insensitively() {
        assert_eq!("steps".parse::<SortBy>(), Ok(SortBy::Steps));
        assert_eq!("PREPTIME".parse::<SortBy>(), Ok(SortBy::PrepTime));
        assert!("rating".parse::<SortBy>().is_err());
        assert_eq!("DESC".parse::<SortOrder>(), Ok(SortOrder::Desc));
    }

    #[test]
    fn category_change_resets_page_and_keeps_filters() {
        let f = FilterState::default()
            .with_search("soup")
            .with_tag("vegan")
            .with_page(4)
            .with_category("Dinner");
        assert_eq!(f.page, 1);
        assert_eq!(f.search, "soup");
        assert!(f.tags.contains("vegan"));
    }

    #[test]
    fn tags_reject_blank_and_duplicates() {
        let f = FilterState::default()
            .with_tag("quick")
            .with_tag("quick")
            .with_tag("");
        assert_eq!(f.tags.len(), 1);

        let f = f.toggle_tag("quick").toggle_tag("vegan");
        assert_eq!(f.tags.iter().collect::<Vec<_>>(), vec!["vegan"]);
    }

    #[test]
    fn clear_sort_drops_both_fields() {
        let f = FilterState::default()
            .with_sort(SortBy::Date, SortOrder::Desc)
            .clear_sort();
        assert_eq!(f.sort_by, None);
        assert_eq!(f.sort_order, None);
    }

    #[test]
    fn sort_by_serializes_to_wire_name() {
        assert_eq!(
            serde_json::to_string(&SortBy::CookTime).unwrap(),
            "\"COOKTIME\""
        );
        assert_eq!(serde_json::to_string(&SortOrder::Desc).unwrap(), "\"desc\"");
    }
}
