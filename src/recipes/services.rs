use std::sync::Arc;

use rand::Rng;
use time::Date;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::catalog::Catalog;
use super::daily::pick_daily_recipe;
use super::model::{DailyPick, Recipe, RecipeDraft, ViewFilters};
use super::routing::{resolve, Route, View};
use crate::seed;
use crate::storage::{
    load_or_default, save, KeyValueStore, StoreError, DAILY_PICK_KEY, FAVORITES_KEY, RECIPES_KEY,
};

/// A recipe as listed, with its favorite flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedRecipe {
    pub recipe: Recipe,
    pub favorite: bool,
}

#[derive(Debug, Clone)]
pub struct VisibleList {
    /// Size of the whole collection, not of `items`.
    pub total: usize,
    pub items: Vec<ListedRecipe>,
}

/// The catalog plus the store it is mirrored to. Every mutation is written
/// back before the lock is released.
pub struct CatalogService {
    catalog: Mutex<Catalog>,
    store: Arc<dyn KeyValueStore>,
}

impl CatalogService {
    pub async fn load(
        store: Arc<dyn KeyValueStore>,
        seed: Vec<Recipe>,
    ) -> Result<Self, StoreError> {
        let stored = load_or_default(store.as_ref(), RECIPES_KEY, seed).await?;
        let recipes = seed::dedup_ids(stored);
        let favorites: Vec<i64> =
            load_or_default(store.as_ref(), FAVORITES_KEY, Vec::new()).await?;
        info!(recipes = recipes.len(), favorites = favorites.len(), "catalog loaded");

        Ok(Self {
            catalog: Mutex::new(Catalog::new(recipes, favorites)),
            store,
        })
    }

    pub async fn visible(&self, filters: &ViewFilters) -> VisibleList {
        let catalog = self.catalog.lock().await;
        let items = catalog
            .derive_visible_list(filters)
            .into_iter()
            .map(|recipe| ListedRecipe {
                favorite: catalog.is_favorite(recipe.id),
                recipe,
            })
            .collect::<Vec<_>>();
        debug!(
            category = %filters.category,
            search = %filters.search_term,
            visible = items.len(),
            "derived visible list"
        );
        VisibleList {
            total: catalog.len(),
            items,
        }
    }

    pub async fn get(&self, id: i64) -> Option<ListedRecipe> {
        let catalog = self.catalog.lock().await;
        catalog.find(id).cloned().map(|recipe| ListedRecipe {
            favorite: catalog.is_favorite(id),
            recipe,
        })
    }

    pub async fn len(&self) -> usize {
        self.catalog.lock().await.len()
    }

    /// Changes are made on a copy; the live catalog only sees them once the
    /// store accepted the write.
    pub async fn add(&self, draft: RecipeDraft, now_ms: i64) -> Result<Recipe, StoreError> {
        let mut catalog = self.catalog.lock().await;
        let mut next = catalog.clone();
        let recipe = next.add_recipe(draft, now_ms).clone();
        save(self.store.as_ref(), RECIPES_KEY, next.recipes()).await?;
        *catalog = next;
        info!(id = recipe.id, title = %recipe.title, "recipe added");
        Ok(recipe)
    }

    pub async fn update(&self, id: i64, draft: RecipeDraft) -> Result<Option<Recipe>, StoreError> {
        let mut catalog = self.catalog.lock().await;
        let mut next = catalog.clone();
        let Some(recipe) = next.update_recipe(id, draft).cloned() else {
            debug!(id, "update of unknown recipe ignored");
            return Ok(None);
        };
        save(self.store.as_ref(), RECIPES_KEY, next.recipes()).await?;
        *catalog = next;
        info!(id, "recipe updated");
        Ok(Some(recipe))
    }

    pub async fn toggle_favorite(&self, id: i64) -> Result<bool, StoreError> {
        let mut catalog = self.catalog.lock().await;
        let mut next = catalog.clone();
        let favorite = next.toggle_favorite(id);
        save(self.store.as_ref(), FAVORITES_KEY, next.favorites()).await?;
        *catalog = next;
        debug!(id, favorite, "favorite toggled");
        Ok(favorite)
    }

    pub async fn favorites(&self) -> Vec<i64> {
        self.catalog.lock().await.favorites().iter().copied().collect()
    }

    /// Returns the stored pick if it is from `today`, otherwise draws and
    /// stores a new one.
    pub async fn recipe_of_the_day<R: Rng + Send + ?Sized>(
        &self,
        today: Date,
        rng: &mut R,
    ) -> Result<Option<DailyPick>, StoreError> {
        let catalog = self.catalog.lock().await;
        if catalog.is_empty() {
            return Ok(None);
        }
        let cached: Option<DailyPick> =
            load_or_default(self.store.as_ref(), DAILY_PICK_KEY, None).await?;
        let pick = pick_daily_recipe(catalog.recipes(), cached.clone(), today, rng);
        if pick != cached {
            if let Some(fresh) = &pick {
                save(self.store.as_ref(), DAILY_PICK_KEY, fresh).await?;
                info!(id = fresh.recipe.id, %today, "new recipe of the day");
            }
        }
        Ok(pick)
    }

    /// `None` means the fragment renders the list.
    pub async fn resolve_route(&self, fragment: &str) -> Option<ListedRecipe> {
        let catalog = self.catalog.lock().await;
        match resolve(Route::parse(fragment), &catalog) {
            View::List => None,
            View::Detail(recipe) => Some(ListedRecipe {
                favorite: catalog.is_favorite(recipe.id),
                recipe,
            }),
        }
    }
}
