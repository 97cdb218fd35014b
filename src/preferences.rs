use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{error, info, instrument};

use crate::error::AppError;
use crate::state::AppState;
use crate::storage::{load_or_default, save, KeyValueStore, StoreError, DARK_MODE_KEY};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub dark_mode: bool,
}

/// Display preferences. Dark mode is stored as a bare boolean under `darkMode`.
pub struct PreferencesService {
    current: Mutex<Preferences>,
    store: Arc<dyn KeyValueStore>,
}

impl PreferencesService {
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Result<Self, StoreError> {
        let dark_mode = load_or_default(store.as_ref(), DARK_MODE_KEY, false).await?;
        Ok(Self {
            current: Mutex::new(Preferences { dark_mode }),
            store,
        })
    }

    pub async fn get(&self) -> Preferences {
        *self.current.lock().await
    }

    pub async fn set(&self, prefs: Preferences) -> Result<Preferences, StoreError> {
        let mut current = self.current.lock().await;
        save(self.store.as_ref(), DARK_MODE_KEY, &prefs.dark_mode).await?;
        *current = prefs;
        Ok(prefs)
    }

    pub async fn toggle_dark_mode(&self) -> Result<Preferences, StoreError> {
        let mut current = self.current.lock().await;
        let next = Preferences {
            dark_mode: !current.dark_mode,
        };
        save(self.store.as_ref(), DARK_MODE_KEY, &next.dark_mode).await?;
        *current = next;
        Ok(next)
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/preferences", get(get_preferences).put(put_preferences))
        .route("/preferences/dark-mode/toggle", post(toggle_dark_mode))
}

#[instrument(skip(state))]
pub async fn get_preferences(State(state): State<AppState>) -> Json<Preferences> {
    Json(state.preferences.get().await)
}

#[instrument(skip(state))]
pub async fn put_preferences(
    State(state): State<AppState>,
    Json(prefs): Json<Preferences>,
) -> Result<Json<Preferences>, AppError> {
    let saved = state.preferences.set(prefs).await.map_err(|e| {
        error!(error = %e, "saving preferences failed");
        AppError::from(e)
    })?;
    Ok(Json(saved))
}

#[instrument(skip(state))]
pub async fn toggle_dark_mode(State(state): State<AppState>) -> Result<Json<Preferences>, AppError> {
    let prefs = state.preferences.toggle_dark_mode().await.map_err(|e| {
        error!(error = %e, "saving preferences failed");
        AppError::from(e)
    })?;
    info!(dark_mode = prefs.dark_mode, "dark mode toggled");
    Ok(Json(prefs))
}

#[cfg(test)]
mod preferences_tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[tokio::test]
    async fn defaults_to_light_mode() {
        let service = PreferencesService::load(Arc::new(MemoryStore::new())).await.unwrap();
        assert_eq!(service.get().await, Preferences { dark_mode: false });
    }

    #[tokio::test]
    async fn reads_bare_boolean_snapshot() {
        let store = Arc::new(MemoryStore::with_entries([(DARK_MODE_KEY, "true")]));
        let service = PreferencesService::load(store).await.unwrap();
        assert!(service.get().await.dark_mode);
    }

    #[tokio::test]
    async fn toggle_persists() {
        let store = Arc::new(MemoryStore::new());
        let service = PreferencesService::load(store.clone()).await.unwrap();
        assert!(service.toggle_dark_mode().await.unwrap().dark_mode);
        assert_eq!(store.get(DARK_MODE_KEY).await.unwrap().as_deref(), Some("true"));

        let reloaded = PreferencesService::load(store).await.unwrap();
        assert!(reloaded.get().await.dark_mode);
    }

    #[tokio::test]
    async fn handlers_share_state() {
        let state = AppState::fake().await;
        let Json(on) = toggle_dark_mode(State(state.clone())).await.unwrap();
        assert!(on.dark_mode);
        let Json(off) = put_preferences(State(state.clone()), Json(Preferences { dark_mode: false }))
            .await
            .unwrap();
        assert!(!off.dark_mode);
        let Json(current) = get_preferences(State(state)).await;
        assert!(!current.dark_mode);
    }
}
