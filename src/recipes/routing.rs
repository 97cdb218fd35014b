use lazy_static::lazy_static;
use regex::Regex;

use super::catalog::Catalog;
use super::model::Recipe;

lazy_static! {
    static ref DETAIL_FRAGMENT: Regex = Regex::new(r"^receta-(\d+)$").unwrap();
}

/// Location fragment: `receta-<id>` selects a detail view, anything else the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    List,
    Detail(i64),
}

impl Route {
    pub fn parse(fragment: &str) -> Self {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        DETAIL_FRAGMENT
            .captures(fragment)
            .and_then(|c| c[1].parse().ok())
            .map(Route::Detail)
            .unwrap_or(Route::List)
    }

    pub fn fragment(&self) -> String {
        match self {
            Route::List => String::new(),
            Route::Detail(id) => format!("receta-{id}"),
        }
    }
}

/// What the presentation layer should show for a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    List,
    Detail(Recipe),
}

/// Unknown detail ids fall back to the list.
pub fn resolve(route: Route, catalog: &Catalog) -> View {
    match route {
        Route::Detail(id) => catalog
            .find(id)
            .cloned()
            .map(View::Detail)
            .unwrap_or(View::List),
        Route::List => View::List,
    }
}

#[cfg(test)]
mod routing_tests {
    use super::*;
    use crate::recipes::catalog::catalog_tests::recipe;
    use crate::recipes::model::{Category, Difficulty};

    #[test]
    fn parses_detail_fragments() {
        assert_eq!(Route::parse("receta-12"), Route::Detail(12));
        assert_eq!(Route::parse("#receta-1700000000000"), Route::Detail(1_700_000_000_000));
    }

    #[test]
    fn anything_else_is_the_list() {
        for fragment in ["", "#", "receta-", "receta-abc", "recetas-1", "receta-1-2", "x"] {
            assert_eq!(Route::parse(fragment), Route::List, "{fragment}");
        }
        // overflowing ids are not a detail route
        assert_eq!(Route::parse("receta-99999999999999999999"), Route::List);
    }

    #[test]
    fn fragment_round_trips() {
        assert_eq!(Route::parse(&Route::Detail(5).fragment()), Route::Detail(5));
        assert_eq!(Route::List.fragment(), "");
    }

    #[test]
    fn missing_recipe_degrades_to_list() {
        let catalog = Catalog::new(
            vec![recipe(3, "Gazpacho", Category::Primero, Difficulty::Baja)],
            [],
        );
        assert!(matches!(
            resolve(Route::Detail(3), &catalog),
            View::Detail(r) if r.title == "Gazpacho"
        ));
        assert_eq!(resolve(Route::Detail(4), &catalog), View::List);
        assert_eq!(resolve(Route::List, &catalog), View::List);
    }
}
