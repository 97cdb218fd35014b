use crate::config::AppConfig;
use crate::preferences::PreferencesService;
use crate::recipes::services::CatalogService;
use crate::seed;
use crate::storage::{KeyValueStore, MemoryStore, PgStore};
use anyhow::Context;
use std::sync::Arc;
use time::{Date, OffsetDateTime, UtcOffset};
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub catalog: Arc<CatalogService>,
    pub preferences: Arc<PreferencesService>,
    utc_offset: UtcOffset,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let store = match &config.database_url {
            Some(url) => {
                let db = sqlx::postgres::PgPoolOptions::new()
                    .max_connections(config.database_max_connections)
                    .connect(url)
                    .await
                    .context("connect to database")?;

                sqlx::migrate!("./migrations")
                    .run(&db)
                    .await
                    .context("run migrations")?;
                info!("using postgres key-value store");
                Arc::new(PgStore::new(db)) as Arc<dyn KeyValueStore>
            }
            None => {
                warn!("DATABASE_URL not set; changes will not survive a restart");
                Arc::new(MemoryStore::new()) as Arc<dyn KeyValueStore>
            }
        };

        let seed = seed::load(config.seed_path.as_deref()).await;
        Self::from_parts(config, store, seed).await
    }

    pub async fn from_parts(
        config: Arc<AppConfig>,
        store: Arc<dyn KeyValueStore>,
        seed: Vec<crate::recipes::model::Recipe>,
    ) -> anyhow::Result<Self> {
        let utc_offset = config.utc_offset()?;
        let catalog = CatalogService::load(store.clone(), seed)
            .await
            .context("load catalog")?;
        let preferences = PreferencesService::load(store)
            .await
            .context("load preferences")?;
        Ok(Self {
            config,
            catalog: Arc::new(catalog),
            preferences: Arc::new(preferences),
            utc_offset,
        })
    }

    /// Calendar day used for the recipe of the day.
    pub fn today(&self) -> Date {
        OffsetDateTime::now_utc().to_offset(self.utc_offset).date()
    }

    /// Creation timestamp for new recipe ids.
    pub fn now_ms(&self) -> i64 {
        (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
    }

    /// In-memory state seeded with Tortilla (id 1) and Flan (id 2).
    #[cfg(test)]
    pub async fn fake() -> Self {
        use crate::recipes::catalog::catalog_tests::recipe;
        use crate::recipes::model::{Category, Difficulty};

        let seed = vec![
            recipe(1, "Tortilla", Category::Primero, Difficulty::Baja),
            recipe(2, "Flan", Category::Postre, Difficulty::Media),
        ];
        Self::from_parts(
            Arc::new(AppConfig::default()),
            Arc::new(MemoryStore::new()),
            seed,
        )
        .await
        .expect("fake state")
    }
}
