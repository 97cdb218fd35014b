use serde::{Deserialize, Serialize};

use super::model::{CategoryFilter, DifficultyFilter, Recipe, SortDirection, ViewFilters};
use super::routing::Route;
use super::services::ListedRecipe;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub category: CategoryFilter,
    #[serde(default)]
    pub difficulty: DifficultyFilter,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub sort: SortDirection,
}

impl From<ListQuery> for ViewFilters {
    fn from(q: ListQuery) -> Self {
        Self {
            category: q.category,
            difficulty: q.difficulty,
            search_term: q.search,
            sort: q.sort,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecipeCard {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub favorite: bool,
    /// Fragment that opens the detail view.
    pub fragment: String,
}

impl From<ListedRecipe> for RecipeCard {
    fn from(item: ListedRecipe) -> Self {
        Self {
            fragment: Route::Detail(item.recipe.id).fragment(),
            recipe: item.recipe,
            favorite: item.favorite,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecipeListResponse {
    pub total: usize,
    pub count: usize,
    pub items: Vec<RecipeCard>,
}

#[derive(Debug, Serialize)]
pub struct RecipeDetails {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub favorite: bool,
    pub ingredient_list: Vec<String>,
}

impl From<ListedRecipe> for RecipeDetails {
    fn from(item: ListedRecipe) -> Self {
        Self {
            ingredient_list: item.recipe.ingredient_list(),
            recipe: item.recipe,
            favorite: item.favorite,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FavoriteResponse {
    pub id: i64,
    pub favorite: bool,
}

#[derive(Debug, Serialize)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum RouteResponse {
    List,
    Detail { recipe: RecipeDetails },
}
