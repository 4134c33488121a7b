#![allow(clippy::unwrap_used, clippy::expect_used)]
//! URL state through query building, execution, ranking and pagination,
//! without the HTTP layer.

use pantry_kernel::recipe::{
    Clause, MemoryRecipeRepository, QuerySpec, RecipeQueryBuilder, RecipeRepository,
    ResultRanker, SortClause, SortField,
};
use pantry_sdk::codec;
use pantry_sdk::filter::SortOrder;
use pantry_sdk::pagination::{PageNav, build_page_url};
use pantry_test_utils::{assert, catalog};

#[test]
fn query_string_to_sql() {
    let filter = codec::decode("page=2&tags=vegan,quick&sortBy=STEPS&sortOrder=desc");
    let spec = QuerySpec::build(&filter).unwrap();

    assert_eq!(spec.skip, 20);
    assert_eq!(spec.limit, 20);
    assert_eq!(
        spec.sort,
        Some(SortClause {
            field: SortField::Steps,
            direction: SortOrder::Desc,
        })
    );
    assert!(matches!(&spec.predicate[..], [Clause::AllTags(tags)] if tags.len() == 2));

    let sql = RecipeQueryBuilder::new(&spec).build();
    assert::contains(&sql, "cardinality(recipe.steps) DESC");
    assert::contains(&sql, "OFFSET 20");
}

#[test]
fn search_value_is_escaped_in_sql() {
    let filter = codec::decode("search=50%25_off");
    let spec = QuerySpec::build(&filter).unwrap();
    assert_eq!(spec.predicate, vec![Clause::Text("50%_off".into())]);

    let sql = RecipeQueryBuilder::new(&spec).build();
    assert::contains(&sql, "ILIKE");
    assert::not_contains(&sql, "%50%_off%");
}

#[tokio::test]
async fn walk_pages_with_navigation() {
    let repo = MemoryRecipeRepository::new(catalog::uniform(25));
    let ranker = ResultRanker::default();

    let mut query = String::from("sortBy=DATE&limit=10");
    let mut seen = 0;

    loop {
        let filter = codec::decode(&query);
        let spec = QuerySpec::build(&filter).unwrap();
        let page = repo.fetch_page(&spec).await.unwrap();
        let recipes = ranker.rank(page.recipes, filter.sort_mode());
        seen += recipes.len();

        let nav = PageNav::new(&filter, Some(page.total));
        assert_eq!(nav.total_pages, Some(3));
        assert_eq!(nav.prev_enabled, filter.page > 1);

        if !nav.next_enabled {
            assert_eq!(filter.page, 3);
            break;
        }
        assert_eq!(nav.next_query, build_page_url(&filter, filter.page + 1));
        query = nav.next_query;
    }

    assert_eq!(seen, 25);
}
