use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use rand::{rngs::StdRng, SeedableRng};
use tracing::{error, instrument, warn};

use super::dto::{
    FavoriteResponse, ListQuery, RecipeCard, RecipeDetails, RecipeListResponse, RouteResponse,
};
use super::model::{Recipe, RecipeDraft, ViewFilters};
use crate::{error::AppError, state::AppState};

// --- public routers ---

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(list_recipes))
        .route("/recipes/:id", get(get_recipe))
        .route("/favorites", get(list_favorites))
        .route("/recipe-of-the-day", get(recipe_of_the_day))
        .route("/route/:fragment", get(resolve_route))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", post(create_recipe))
        .route("/recipes/:id", put(update_recipe))
        .route("/recipes/:id/favorite", post(toggle_favorite))
}

// --- handlers ---

#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> Json<RecipeListResponse> {
    let filters = ViewFilters::from(q);
    let list = state.catalog.visible(&filters).await;
    Json(RecipeListResponse {
        total: list.total,
        count: list.items.len(),
        items: list.items.into_iter().map(RecipeCard::from).collect(),
    })
}

#[instrument(skip(state))]
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RecipeDetails>, AppError> {
    match state.catalog.get(id).await {
        Some(item) => Ok(Json(RecipeDetails::from(item))),
        None => {
            warn!(id, "recipe not found");
            Err(AppError::NotFound(id))
        }
    }
}

/// POST /recipes; responds 201 with a Location header.
#[instrument(skip(state, draft))]
pub async fn create_recipe(
    State(state): State<AppState>,
    Json(draft): Json<RecipeDraft>,
) -> Result<(StatusCode, HeaderMap, Json<Recipe>), AppError> {
    validate(&draft)?;
    let recipe = state
        .catalog
        .add(draft, state.now_ms())
        .await
        .map_err(storage_failed)?;

    let mut headers = HeaderMap::new();
    if let Ok(location) = HeaderValue::from_str(&format!("/api/v1/recipes/{}", recipe.id)) {
        headers.insert(header::LOCATION, location);
    }
    Ok((StatusCode::CREATED, headers, Json(recipe)))
}

#[instrument(skip(state, draft))]
pub async fn update_recipe(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(draft): Json<RecipeDraft>,
) -> Result<Json<Recipe>, AppError> {
    validate(&draft)?;
    match state.catalog.update(id, draft).await.map_err(storage_failed)? {
        Some(recipe) => Ok(Json(recipe)),
        None => Err(AppError::NotFound(id)),
    }
}

#[instrument(skip(state))]
pub async fn toggle_favorite(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<FavoriteResponse>, AppError> {
    let favorite = state
        .catalog
        .toggle_favorite(id)
        .await
        .map_err(storage_failed)?;
    Ok(Json(FavoriteResponse { id, favorite }))
}

#[instrument(skip(state))]
pub async fn list_favorites(State(state): State<AppState>) -> Json<Vec<i64>> {
    Json(state.catalog.favorites().await)
}

/// 204 when there is nothing to pick from.
#[instrument(skip(state))]
pub async fn recipe_of_the_day(State(state): State<AppState>) -> Result<Response, AppError> {
    let mut rng = StdRng::from_entropy();
    let pick = state
        .catalog
        .recipe_of_the_day(state.today(), &mut rng)
        .await
        .map_err(storage_failed)?;
    Ok(match pick {
        Some(pick) => Json(pick).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

#[instrument(skip(state))]
pub async fn resolve_route(
    State(state): State<AppState>,
    Path(fragment): Path<String>,
) -> Json<RouteResponse> {
    let response = match state.catalog.resolve_route(&fragment).await {
        Some(item) => RouteResponse::Detail {
            recipe: RecipeDetails::from(item),
        },
        None => RouteResponse::List,
    };
    Json(response)
}

fn validate(draft: &RecipeDraft) -> Result<(), AppError> {
    let missing = draft.missing_fields();
    if missing.is_empty() {
        Ok(())
    } else {
        warn!(?missing, "rejecting incomplete recipe");
        Err(AppError::Validation(missing))
    }
}

fn storage_failed(e: crate::storage::StoreError) -> AppError {
    error!(error = %e, "store write failed");
    AppError::Storage(e)
}

#[cfg(test)]
mod handler_tests {
    use super::*;
    use crate::recipes::catalog::catalog_tests::draft;
    use crate::recipes::model::{Category, CategoryFilter, SortDirection};

    async fn state() -> AppState {
        AppState::fake().await
    }

    #[tokio::test]
    async fn list_applies_query_filters() {
        let state = state().await;
        let q = ListQuery {
            category: CategoryFilter::Only(Category::Postre),
            sort: SortDirection::Asc,
            ..Default::default()
        };
        let Json(body) = list_recipes(State(state), Query(q)).await;
        assert_eq!(body.total, 2);
        assert_eq!(body.count, 1);
        assert_eq!(body.items[0].recipe.title, "Flan");
        assert_eq!(body.items[0].fragment, "receta-2");
    }

    #[tokio::test]
    async fn create_then_fetch() {
        let state = state().await;
        let (status, headers, Json(created)) =
            create_recipe(State(state.clone()), Json(draft("Churros"))).await.unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            headers.get(header::LOCATION).unwrap().to_str().unwrap(),
            format!("/api/v1/recipes/{}", created.id)
        );

        let Json(details) = get_recipe(State(state), Path(created.id)).await.unwrap();
        assert_eq!(details.recipe.title, "Churros");
        assert_eq!(details.ingredient_list, vec!["harina", "agua"]);
        assert!(!details.favorite);
    }

    #[tokio::test]
    async fn incomplete_draft_is_rejected() {
        let state = state().await;
        let mut bad = draft("Churros");
        bad.instructions = "   ".into();
        let err = create_recipe(State(state.clone()), Json(bad)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ref f) if f == &vec!["instrucciones"]));

        let Json(body) = list_recipes(State(state), Query(ListQuery::default())).await;
        assert_eq!(body.total, 2);
    }

    #[tokio::test]
    async fn update_unknown_is_not_found() {
        let state = state().await;
        let err = update_recipe(State(state), Path(77), Json(draft("Nada")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(77)));
    }

    #[tokio::test]
    async fn update_replaces_recipe() {
        let state = state().await;
        let Json(updated) =
            update_recipe(State(state.clone()), Path(1), Json(draft("Tortilla de patatas")))
                .await
                .unwrap();
        assert_eq!(updated.id, 1);
        let Json(details) = get_recipe(State(state), Path(1)).await.unwrap();
        assert_eq!(details.recipe.title, "Tortilla de patatas");
    }

    #[tokio::test]
    async fn favorite_toggle_round_trip() {
        let state = state().await;
        let Json(on) = toggle_favorite(State(state.clone()), Path(1)).await.unwrap();
        assert!(on.favorite);
        let Json(ids) = list_favorites(State(state.clone())).await;
        assert_eq!(ids, vec![1]);
        let Json(off) = toggle_favorite(State(state.clone()), Path(1)).await.unwrap();
        assert!(!off.favorite);
        let Json(ids) = list_favorites(State(state)).await;
        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn recipe_of_the_day_is_stable() {
        let state = state().await;
        let first = recipe_of_the_day(State(state.clone())).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        let today = state.today();
        let a = state
            .catalog
            .recipe_of_the_day(today, &mut StdRng::seed_from_u64(1))
            .await
            .unwrap();
        let b = state
            .catalog
            .recipe_of_the_day(today, &mut StdRng::seed_from_u64(2))
            .await
            .unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn route_fragment_resolution() {
        let state = state().await;
        toggle_favorite(State(state.clone()), Path(1)).await.unwrap();
        let Json(detail) = resolve_route(State(state.clone()), Path("receta-1".into())).await;
        assert!(matches!(
            detail,
            RouteResponse::Detail { ref recipe } if recipe.recipe.id == 1 && recipe.favorite
        ));

        let Json(missing) = resolve_route(State(state), Path("receta-404".into())).await;
        assert!(matches!(missing, RouteResponse::List));
    }
}
