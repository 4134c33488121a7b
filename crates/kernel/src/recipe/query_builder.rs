//! Recipe query builder using SeaQuery.
//!
//! Turns a decoded [`FilterState`] into a [`QuerySpec`] (predicate, sort,
//! skip/limit) and renders it as PostgreSQL with:
//! - Case-insensitive substring search over title and description
//! - Exact category match
//! - Tag superset match (every requested tag present)
//! - Minimum step count
//! - Identifier tie-break on every ordering, so pages are stable

use std::cmp::Ordering;

use pantry_sdk::filter::{FilterState, MAX_PAGE_LIMIT, SortBy, SortOrder};
use pantry_sdk::types::Recipe;
use sea_query::{
    Alias, Asterisk, Cond, Expr, ExprTrait, Order, PostgresQueryBuilder, Query, SelectStatement,
    SimpleExpr,
};
use thiserror::Error;

const RECIPE_TABLE: &str = "recipe";

/// Errors raised while building a query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The filter violates a contract that decoding normally guarantees.
    #[error("{0}")]
    InvalidFilter(String),
}

/// One predicate clause. Clauses are combined with AND.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// Substring of title or description, case-insensitive.
    Text(String),
    /// Exact category.
    Category(String),
    /// The recipe's tags must include all of these.
    AllTags(Vec<String>),
    /// At least this many steps.
    MinSteps(u32),
}

/// Sortable stored fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Prep,
    Cook,
    Steps,
    /// Creation-order key.
    Created,
}

impl From<SortBy> for SortField {
    fn from(by: SortBy) -> Self {
        match by {
            SortBy::PrepTime => SortField::Prep,
            SortBy::CookTime => SortField::Cook,
            SortBy::Steps => SortField::Steps,
            SortBy::Date => SortField::Created,
        }
    }
}

impl SortField {
    /// Parse the raw field names accepted by the recent-recipes endpoint.
    pub fn from_column(name: &str) -> Option<Self> {
        match name {
            "prep" => Some(SortField::Prep),
            "cook" => Some(SortField::Cook),
            "steps" => Some(SortField::Steps),
            "created" | "date" => Some(SortField::Created),
            _ => None,
        }
    }

    fn sql_expr(&self) -> SimpleExpr {
        match self {
            SortField::Prep => Expr::cust(format!("COALESCE({RECIPE_TABLE}.prep, 0)")),
            SortField::Cook => Expr::cust(format!("COALESCE({RECIPE_TABLE}.cook, 0)")),
            SortField::Steps => Expr::cust(format!("cardinality({RECIPE_TABLE}.steps)")),
            SortField::Created => {
                Expr::col((Alias::new(RECIPE_TABLE), Alias::new("created"))).into()
            }
        }
    }

    fn key(&self, recipe: &Recipe) -> i64 {
        match self {
            SortField::Prep => i64::from(recipe.prep.unwrap_or(0)),
            SortField::Cook => i64::from(recipe.cook.unwrap_or(0)),
            SortField::Steps => i64::try_from(recipe.step_count()).unwrap_or(i64::MAX),
            SortField::Created => recipe.created,
        }
    }
}

/// Primary sort; the identifier tie-break is always appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortClause {
    pub field: SortField,
    pub direction: SortOrder,
}

/// Database-facing translation of a [`FilterState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    pub predicate: Vec<Clause>,
    /// `None` means storage order (most recent first).
    pub sort: Option<SortClause>,
    pub skip: u64,
    pub limit: u32,
}

impl QuerySpec {
    /// Build the query for a list request.
    pub fn build(filter: &FilterState) -> Result<Self, QueryError> {
        let (skip, limit) = paging(filter.page, filter.limit)?;

        let mut predicate = Vec::new();

        let search = filter.search.trim();
        if !search.is_empty() {
            predicate.push(Clause::Text(search.to_string()));
        }

        let category = filter.category.trim();
        if !category.is_empty() {
            predicate.push(Clause::Category(category.to_string()));
        }

        let tags: Vec<String> = filter
            .tags
            .iter()
            .filter(|t| !t.is_empty())
            .cloned()
            .collect();
        if !tags.is_empty() {
            predicate.push(Clause::AllTags(tags));
        }

        if let Some(min_steps) = filter.min_steps {
            predicate.push(Clause::MinSteps(min_steps));
        }

        // Without an explicit field the ranker decides popularity order.
        let sort = filter.sort_by.map(|by| SortClause {
            field: by.into(),
            direction: filter.sort_order.unwrap_or_default(),
        });

        Ok(Self {
            predicate,
            sort,
            skip,
            limit,
        })
    }

    /// Build the unfiltered query behind the recent-recipes endpoint:
    /// storage order, or descending by `field`.
    pub fn recent(field: Option<SortField>, page: u32, limit: u32) -> Result<Self, QueryError> {
        let (skip, limit) = paging(page, limit)?;
        Ok(Self {
            predicate: Vec::new(),
            sort: field.map(|field| SortClause {
                field,
                direction: SortOrder::Desc,
            }),
            skip,
            limit,
        })
    }

    /// Evaluate the predicate against a recipe in memory.
    pub fn matches(&self, recipe: &Recipe) -> bool {
        self.predicate.iter().all(|clause| match clause {
            Clause::Text(text) => {
                let needle = text.to_lowercase();
                recipe.title.to_lowercase().contains(&needle)
                    || recipe.description.to_lowercase().contains(&needle)
            }
            Clause::Category(category) => recipe.category.as_deref() == Some(category.as_str()),
            Clause::AllTags(tags) => recipe.has_all_tags(tags),
            Clause::MinSteps(min) => {
                u32::try_from(recipe.step_count()).unwrap_or(u32::MAX) >= *min
            }
        })
    }

    /// Total order used by the rendered ORDER BY, evaluated in memory.
    pub fn compare(&self, a: &Recipe, b: &Recipe) -> Ordering {
        let primary = match self.sort {
            Some(SortClause { field, direction }) => {
                let ord = field.key(a).cmp(&field.key(b));
                match direction {
                    SortOrder::Asc => ord,
                    SortOrder::Desc => ord.reverse(),
                }
            }
            None => b.created.cmp(&a.created),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

fn paging(page: u32, limit: u32) -> Result<(u64, u32), QueryError> {
    if limit == 0 {
        return Err(QueryError::InvalidFilter(
            "limit must be a positive integer".to_string(),
        ));
    }
    if page == 0 {
        return Err(QueryError::InvalidFilter(
            "page must be at least 1".to_string(),
        ));
    }

    let limit = if limit > MAX_PAGE_LIMIT {
        tracing::warn!(
            requested = limit,
            capped = MAX_PAGE_LIMIT,
            "limit exceeds maximum, capping"
        );
        MAX_PAGE_LIMIT
    } else {
        limit
    };

    let skip = u64::from(page - 1) * u64::from(limit);
    Ok((skip, limit))
}

/// Renders a [`QuerySpec`] as PostgreSQL.
pub struct RecipeQueryBuilder<'a> {
    spec: &'a QuerySpec,
}

impl<'a> RecipeQueryBuilder<'a> {
    pub fn new(spec: &'a QuerySpec) -> Self {
        Self { spec }
    }

    /// Build the main SELECT query with ordering and pagination.
    pub fn build(&self) -> String {
        let mut query = Query::select();

        query.column((Alias::new(RECIPE_TABLE), Asterisk));
        query.from(Alias::new(RECIPE_TABLE));

        self.add_filters(&mut query);
        self.add_sorts(&mut query);

        query.limit(u64::from(self.spec.limit));
        query.offset(self.spec.skip);

        query.to_string(PostgresQueryBuilder)
    }

    /// Build a COUNT query for total results.
    pub fn build_count(&self) -> String {
        let mut query = Query::select();

        query.expr(Expr::col(Asterisk).count());
        query.from(Alias::new(RECIPE_TABLE));

        self.add_filters(&mut query);

        query.to_string(PostgresQueryBuilder)
    }

    fn add_filters(&self, query: &mut SelectStatement) {
        for clause in &self.spec.predicate {
            query.and_where(build_clause(clause));
        }
    }

    fn add_sorts(&self, query: &mut SelectStatement) {
        match self.spec.sort {
            Some(SortClause { field, direction }) => {
                let order = match direction {
                    SortOrder::Asc => Order::Asc,
                    SortOrder::Desc => Order::Desc,
                };
                query.order_by_expr(field.sql_expr(), order);
            }
            None => {
                query.order_by((Alias::new(RECIPE_TABLE), Alias::new("created")), Order::Desc);
            }
        }
        query.order_by((Alias::new(RECIPE_TABLE), Alias::new("id")), Order::Asc);
    }
}

fn build_clause(clause: &Clause) -> SimpleExpr {
    match clause {
        Clause::Text(text) => {
            let pattern = format!("%{}%", escape_like_wildcards(text));
            Cond::any()
                .add(Expr::cust_with_values(
                    format!("{RECIPE_TABLE}.title ILIKE $1"),
                    [pattern.clone()],
                ))
                .add(Expr::cust_with_values(
                    format!("{RECIPE_TABLE}.description ILIKE $1"),
                    [pattern],
                ))
                .into()
        }
        Clause::Category(category) => {
            Expr::col((Alias::new(RECIPE_TABLE), Alias::new("category")))
                .eq(category.as_str())
                .into()
        }
        Clause::AllTags(tags) => {
            // One membership test per tag: the recipe must carry all of them.
            let mut cond = Cond::all();
            for tag in tags {
                cond = cond.add(Expr::cust_with_values(
                    format!("$1 = ANY({RECIPE_TABLE}.tags)"),
                    [tag.clone()],
                ));
            }
            cond.into()
        }
        Clause::MinSteps(min) => Expr::cust_with_values(
            format!("cardinality({RECIPE_TABLE}.steps) >= $1"),
            [i64::from(*min)],
        ),
    }
}

/// Escape SQL LIKE wildcard characters (`%`, `_`, `\`) in a value.
fn escape_like_wildcards(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pantry_sdk::codec;
    use pantry_sdk::filter::DEFAULT_PAGE_LIMIT;
    use uuid::Uuid;

    fn recipe(id: u128, steps: usize, tags: &[&str]) -> Recipe {
        Recipe {
            id: Uuid::from_u128(id),
            title: format!("Recipe {id}"),
            description: String::new(),
            prep: None,
            cook: None,
            servings: None,
            steps: (0..steps).map(|i| format!("step {i}")).collect(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            category: None,
            images: Vec::new(),
            ingredients: Vec::new(),
            created: 0,
            rating: None,
        }
    }

    #[test]
    fn end_to_end_from_query_string() {
        let filter = codec::decode("page=2&tags=vegan,quick&sortBy=STEPS&sortOrder=desc");
        let spec = QuerySpec::build(&filter).unwrap();

        assert_eq!(
            spec.predicate,
            vec![Clause::AllTags(vec!["quick".into(), "vegan".into()])]
        );
        assert_eq!(
            spec.sort,
            Some(SortClause {
                field: SortField::Steps,
                direction: SortOrder::Desc,
            })
        );
        assert_eq!(spec.skip, u64::from(DEFAULT_PAGE_LIMIT));
        assert_eq!(spec.limit, DEFAULT_PAGE_LIMIT);

        let sql = RecipeQueryBuilder::new(&spec).build();
        assert!(sql.contains("'vegan' = ANY(recipe.tags)"), "{sql}");
        assert!(sql.contains("'quick' = ANY(recipe.tags)"), "{sql}");
        assert!(sql.contains("cardinality(recipe.steps) DESC"), "{sql}");
        assert!(sql.contains("\"recipe\".\"id\" ASC"), "{sql}");
        assert!(sql.contains("LIMIT 20"), "{sql}");
        assert!(sql.contains("OFFSET 20"), "{sql}");
    }

    #[test]
    fn empty_filter_uses_storage_order() {
        let spec = QuerySpec::build(&FilterState::default()).unwrap();
        assert!(spec.predicate.is_empty());
        assert!(spec.sort.is_none());
        assert_eq!(spec.skip, 0);

        let sql = RecipeQueryBuilder::new(&spec).build();
        assert!(!sql.contains("WHERE"), "{sql}");
        assert!(sql.contains("\"recipe\".\"created\" DESC"), "{sql}");
        assert!(sql.contains("\"recipe\".\"id\" ASC"), "{sql}");
    }

    #[test]
    fn field_mapping() {
        let cases = [
            (SortBy::PrepTime, "COALESCE(recipe.prep, 0) ASC"),
            (SortBy::CookTime, "COALESCE(recipe.cook, 0) ASC"),
            (SortBy::Steps, "cardinality(recipe.steps) ASC"),
            (SortBy::Date, "\"recipe\".\"created\" ASC"),
        ];
        for (by, expected) in cases {
            let filter = FilterState::default().with_sort(by, SortOrder::Asc);
            let sql = RecipeQueryBuilder::new(&QuerySpec::build(&filter).unwrap()).build();
            assert!(sql.contains(expected), "{by}: {sql}");
        }
    }

    #[test]
    fn rating_order_emits_no_sort_clause() {
        let filter = FilterState::default().with_rating_order(SortOrder::Desc);
        let spec = QuerySpec::build(&filter).unwrap();
        assert!(spec.sort.is_none());
    }

    #[test]
    fn all_clauses_combined_with_and() {
        let filter = FilterState::default()
            .with_search("curry")
            .with_category("Dinner")
            .with_tag("spicy")
            .with_min_steps(Some(3));
        let spec = QuerySpec::build(&filter).unwrap();
        assert_eq!(spec.predicate.len(), 4);

        let sql = RecipeQueryBuilder::new(&spec).build();
        assert!(sql.contains("ILIKE"), "{sql}");
        assert!(sql.contains("%curry%"), "{sql}");
        assert!(sql.contains("\"category\" = 'Dinner'"), "{sql}");
        assert!(sql.contains("cardinality(recipe.steps) >= 3"), "{sql}");
        assert!(sql.contains(" AND "), "{sql}");
    }

    #[test]
    fn count_query_has_filters_but_no_paging() {
        let filter = FilterState::default().with_category("Soup").with_page(3);
        let spec = QuerySpec::build(&filter).unwrap();
        let sql = RecipeQueryBuilder::new(&spec).build_count();

        assert!(sql.contains("COUNT(*)"), "{sql}");
        assert!(sql.contains("'Soup'"), "{sql}");
        assert!(!sql.contains("LIMIT"), "{sql}");
        assert!(!sql.contains("ORDER BY"), "{sql}");
    }

    #[test]
    fn blank_search_is_skipped() {
        let filter = FilterState::default().with_search("   ");
        assert!(QuerySpec::build(&filter).unwrap().predicate.is_empty());
    }

    #[test]
    fn zero_limit_is_invalid() {
        let filter = FilterState {
            limit: 0,
            ..Default::default()
        };
        assert!(matches!(
            QuerySpec::build(&filter),
            Err(QueryError::InvalidFilter(_))
        ));
    }

    #[test]
    fn zero_page_is_invalid() {
        let filter = FilterState {
            page: 0,
            ..Default::default()
        };
        assert!(QuerySpec::build(&filter).is_err());
    }

    #[test]
    fn oversized_limit_is_clamped() {
        let filter = FilterState {
            limit: 500,
            page: 2,
            ..Default::default()
        };
        let spec = QuerySpec::build(&filter).unwrap();
        assert_eq!(spec.limit, MAX_PAGE_LIMIT);
        assert_eq!(spec.skip, u64::from(MAX_PAGE_LIMIT));
    }

    #[test]
    fn tag_superset_matching() {
        let spec = QuerySpec::build(&FilterState::default().with_tag("a").with_tag("b")).unwrap();
        assert!(spec.matches(&recipe(1, 1, &["a", "b", "c"])));
        assert!(!spec.matches(&recipe(2, 1, &["a"])));
    }

    #[test]
    fn min_steps_matching() {
        let spec = QuerySpec::build(&FilterState::default().with_min_steps(Some(3))).unwrap();
        assert!(spec.matches(&recipe(1, 3, &[])));
        assert!(!spec.matches(&recipe(2, 2, &[])));
    }

    #[test]
    fn text_matches_title_or_description() {
        let spec = QuerySpec::build(&FilterState::default().with_search("LEMON")).unwrap();
        let mut r = recipe(1, 1, &[]);
        assert!(!spec.matches(&r));
        r.description = "Bright lemon glaze".into();
        assert!(spec.matches(&r));
    }

    #[test]
    fn tied_sort_values_break_on_id() {
        let filter = FilterState::default().with_sort(SortBy::Steps, SortOrder::Asc);
        let spec = QuerySpec::build(&filter).unwrap();

        let mut a = vec![
            recipe(9, 2, &[]),
            recipe(3, 2, &[]),
            recipe(5, 1, &[]),
            recipe(1, 2, &[]),
        ];
        let mut b = a.clone();
        b.reverse();

        a.sort_by(|x, y| spec.compare(x, y));
        b.sort_by(|x, y| spec.compare(x, y));

        let ids: Vec<u128> = a.iter().map(|r| r.id.as_u128()).collect();
        assert_eq!(ids, vec![5, 1, 3, 9]);
        assert_eq!(a, b);
    }

    #[test]
    fn recent_query_sorts_descending() {
        let spec = QuerySpec::recent(SortField::from_column("prep"), 1, 10).unwrap();
        let sql = RecipeQueryBuilder::new(&spec).build();
        assert!(sql.contains("COALESCE(recipe.prep, 0) DESC"), "{sql}");

        let spec = QuerySpec::recent(SortField::from_column("default"), 1, 10).unwrap();
        assert!(spec.sort.is_none());
    }

    #[test]
    fn like_wildcards_escaped() {
        assert_eq!(escape_like_wildcards("hello"), "hello");
        assert_eq!(escape_like_wildcards("100%"), "100\\%");
        assert_eq!(escape_like_wildcards("a_b"), "a\\_b");
        assert_eq!(escape_like_wildcards("a\\b"), "a\\\\b");
    }
}
