use std::cmp::Ordering;
use std::collections::BTreeSet;

use super::model::{
    CategoryFilter, DifficultyFilter, Recipe, RecipeDraft, SortDirection, ViewFilters,
};

/// In-memory recipe collection plus the favorites set.
///
/// Mutations never validate input; drafts arrive already checked by the
/// handlers.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    recipes: Vec<Recipe>,
    favorites: BTreeSet<i64>,
}

impl Catalog {
    pub fn new(recipes: Vec<Recipe>, favorites: impl IntoIterator<Item = i64>) -> Self {
        Self {
            recipes,
            favorites: favorites.into_iter().collect(),
        }
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn find(&self, id: i64) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    pub fn favorites(&self) -> &BTreeSet<i64> {
        &self.favorites
    }

    pub fn is_favorite(&self, id: i64) -> bool {
        self.favorites.contains(&id)
    }

    /// Appends a recipe built from `draft`. The id is `now_ms` unless that
    /// would collide, in which case it is one past the largest id.
    pub fn add_recipe(&mut self, draft: RecipeDraft, now_ms: i64) -> &Recipe {
        let id = match self.recipes.iter().map(|r| r.id).max() {
            Some(max) if now_ms <= max => max + 1,
            _ => now_ms,
        };
        self.recipes.push(Recipe::from_draft(id, draft));
        &self.recipes[self.recipes.len() - 1]
    }

    /// Replaces the recipe with `id` in place. `None` if there is none.
    pub fn update_recipe(&mut self, id: i64, draft: RecipeDraft) -> Option<&Recipe> {
        let slot = self.recipes.iter_mut().find(|r| r.id == id)?;
        *slot = Recipe::from_draft(id, draft);
        Some(slot)
    }

    /// Flips membership of `id`; returns whether it is now a favorite.
    pub fn toggle_favorite(&mut self, id: i64) -> bool {
        if self.favorites.remove(&id) {
            false
        } else {
            self.favorites.insert(id);
            true
        }
    }

    pub fn derive_visible_list(&self, filters: &ViewFilters) -> Vec<Recipe> {
        let needle = filters.search_term.to_lowercase();

        let mut visible: Vec<Recipe> = self
            .recipes
            .iter()
            .filter(|r| match filters.category {
                CategoryFilter::All => true,
                CategoryFilter::Favorites => self.favorites.contains(&r.id),
                CategoryFilter::Only(category) => r.category == category,
            })
            .filter(|r| match filters.difficulty {
                DifficultyFilter::All => true,
                DifficultyFilter::Only(difficulty) => r.difficulty == difficulty,
            })
            .filter(|r| matches_search(r, &needle))
            .cloned()
            .collect();

        match filters.sort {
            SortDirection::None => {}
            SortDirection::Asc => visible.sort_by(|a, b| compare_titles(&a.title, &b.title)),
            SortDirection::Desc => visible.sort_by(|a, b| compare_titles(&b.title, &a.title)),
        }
        visible
    }
}

fn matches_search(recipe: &Recipe, needle: &str) -> bool {
    needle.is_empty()
        || recipe.title.to_lowercase().contains(needle)
        || recipe.description.to_lowercase().contains(needle)
        || recipe.ingredients.to_lowercase().contains(needle)
}

/// Collation-style title ordering: letters first compare without accents or
/// case, then with accents, then by case with lowercase first.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    let lower = |s: &str| s.chars().flat_map(char::to_lowercase).collect::<Vec<_>>();
    let folded = |s: &str| lower(s).into_iter().map(fold_accent).collect::<Vec<_>>();

    folded(a)
        .cmp(&folded(b))
        .then_with(|| lower(a).cmp(&lower(b)))
        .then_with(|| a.chars().map(invert_case).cmp(b.chars().map(invert_case)))
}

fn invert_case(c: char) -> char {
    if c.is_lowercase() {
        c.to_uppercase().next().unwrap_or(c)
    } else {
        c.to_lowercase().next().unwrap_or(c)
    }
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' | 'ã' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        other => other,
    }
}
