//! Recipe query pipeline: filter-to-query translation, storage, and ranking.

mod query_builder;
mod ranker;
mod repository;

pub use query_builder::{
    Clause, QueryError, QuerySpec, RecipeQueryBuilder, SortClause, SortField,
};
pub use ranker::{
    DigestRating, HOME_CANDIDATE_LIMIT, HOME_TOP_N, RATING_MAX, RATING_MIN, RatingSource,
    ResultRanker,
};
pub use repository::{FetchedPage, MemoryRecipeRepository, PgRecipeRepository, RecipeRepository};
