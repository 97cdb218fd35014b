use std::collections::HashSet;
use std::path::Path;

use tracing::{info, warn};

use crate::recipes::model::Recipe;

const BUNDLED: &str = include_str!("../data/recetas.json");

/// Initial collection used when nothing has been persisted yet.
///
/// An override file that can't be read or parsed falls back to the bundled set.
pub async fn load(path: Option<&Path>) -> Vec<Recipe> {
    if let Some(path) = path {
        match tokio::fs::read_to_string(path).await {
            Ok(raw) => match parse(&raw) {
                Ok(recipes) => {
                    info!(path = %path.display(), count = recipes.len(), "loaded seed recipes");
                    return recipes;
                }
                Err(e) => warn!(path = %path.display(), error = %e, "malformed seed file; using bundled recipes"),
            },
            Err(e) => warn!(path = %path.display(), error = %e, "cannot read seed file; using bundled recipes"),
        }
    }
    bundled()
}

pub fn bundled() -> Vec<Recipe> {
    parse(BUNDLED).unwrap_or_else(|e| {
        warn!(error = %e, "bundled seed recipes are malformed");
        Vec::new()
    })
}

fn parse(raw: &str) -> serde_json::Result<Vec<Recipe>> {
    let recipes: Vec<Recipe> = serde_json::from_str(raw)?;
    Ok(dedup_ids(recipes))
}

/// Keeps the first recipe for each id.
pub fn dedup_ids(recipes: Vec<Recipe>) -> Vec<Recipe> {
    let mut seen = HashSet::new();
    recipes
        .into_iter()
        .filter(|r| {
            let fresh = seen.insert(r.id);
            if !fresh {
                warn!(id = r.id, title = %r.title, "dropping recipe with duplicate id");
            }
            fresh
        })
        .collect()
}
