use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;
use time::UtcOffset;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub seed_path: Option<PathBuf>,
    /// Offset used to decide which calendar day "today" is.
    pub today_utc_offset_hours: i8,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            database_url: None,
            database_max_connections: 10,
            seed_path: None,
            today_utc_offset_hours: 0,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            host: std::env::var("APP_HOST").unwrap_or(defaults.host),
            port: parse_var("APP_PORT")?.unwrap_or(defaults.port),
            database_url: std::env::var("DATABASE_URL").ok().filter(|v| !v.is_empty()),
            database_max_connections: parse_var("DATABASE_MAX_CONNECTIONS")?
                .unwrap_or(defaults.database_max_connections),
            seed_path: std::env::var("SEED_PATH").ok().map(PathBuf::from),
            today_utc_offset_hours: parse_var("TODAY_UTC_OFFSET_HOURS")?
                .unwrap_or(defaults.today_utc_offset_hours),
        })
    }

    pub fn utc_offset(&self) -> anyhow::Result<UtcOffset> {
        UtcOffset::from_hms(self.today_utc_offset_hours, 0, 0)
            .context("TODAY_UTC_OFFSET_HOURS out of range")
    }
}

fn parse_var<T>(key: &str) -> anyhow::Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(v) => v
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("invalid {key}={v}")),
        Err(_) => Ok(None),
    }
}
