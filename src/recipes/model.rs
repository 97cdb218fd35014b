use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::Date;

time::serde::format_description!(calendar_day, Date, "[year]-[month]-[day]");

/// Course a recipe belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Category {
    #[default]
    Aperitivo,
    Primero,
    Segundo,
    Postre,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Aperitivo => "Aperitivo",
            Category::Primero => "Primero",
            Category::Segundo => "Segundo",
            Category::Postre => "Postre",
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Aperitivo" => Ok(Category::Aperitivo),
            "Primero" => Ok(Category::Primero),
            "Segundo" => Ok(Category::Segundo),
            "Postre" => Ok(Category::Postre),
            other => Err(format!("unknown category `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    #[default]
    Baja,
    Media,
    Alta,
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Baja" => Ok(Difficulty::Baja),
            "Media" => Ok(Difficulty::Media),
            "Alta" => Ok(Difficulty::Alta),
            other => Err(format!("unknown difficulty `{other}`")),
        }
    }
}

/// A stored recipe.
///
/// Serialized with the field names of the persisted `recetas` snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recipe {
    pub id: i64,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "ingredientes")]
    pub ingredients: String,
    #[serde(rename = "instrucciones")]
    pub instructions: String,
    #[serde(rename = "categoria")]
    pub category: Category,
    #[serde(rename = "dificultad")]
    pub difficulty: Difficulty,
    #[serde(rename = "imagen", default)]
    pub image_url: String,
}

impl Recipe {
    pub fn from_draft(id: i64, draft: RecipeDraft) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            ingredients: draft.ingredients,
            instructions: draft.instructions,
            category: draft.category,
            difficulty: draft.difficulty,
            image_url: draft.image_url,
        }
    }

    /// Ingredients as a list: split on commas, trimmed, blanks dropped.
    pub fn ingredient_list(&self) -> Vec<String> {
        self.ingredients
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

pub const DEFAULT_IMAGE_URL: &str = "https://picsum.photos/400/250";

fn default_image_url() -> String {
    DEFAULT_IMAGE_URL.to_string()
}

/// Submitted recipe form: every field except the id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipeDraft {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "ingredientes")]
    pub ingredients: String,
    #[serde(rename = "instrucciones")]
    pub instructions: String,
    #[serde(rename = "categoria", default)]
    pub category: Category,
    #[serde(rename = "dificultad", default)]
    pub difficulty: Difficulty,
    #[serde(rename = "imagen", default = "default_image_url")]
    pub image_url: String,
}

impl RecipeDraft {
    /// Names of required text fields that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("titulo", &self.title),
            ("descripcion", &self.description),
            ("ingredientes", &self.ingredients),
            ("instrucciones", &self.instructions),
        ]
        .into_iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// Recipe of the day, cached for one calendar day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyPick {
    #[serde(with = "calendar_day")]
    pub date: Date,
    #[serde(rename = "receta")]
    pub recipe: Recipe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Favorites,
    Only(Category),
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "All" | "Todas" => Ok(CategoryFilter::All),
            "Favorites" | "Favoritas" => Ok(CategoryFilter::Favorites),
            other => other.parse().map(CategoryFilter::Only),
        }
    }
}

impl TryFrom<String> for CategoryFilter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("All"),
            CategoryFilter::Favorites => f.write_str("Favorites"),
            CategoryFilter::Only(c) => f.write_str(c.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum DifficultyFilter {
    #[default]
    All,
    Only(Difficulty),
}

impl FromStr for DifficultyFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "All" | "Todas" => Ok(DifficultyFilter::All),
            other => other.parse().map(DifficultyFilter::Only),
        }
    }
}

impl TryFrom<String> for DifficultyFilter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    None,
    Asc,
    Desc,
}

/// Active list filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewFilters {
    pub category: CategoryFilter,
    pub difficulty: DifficultyFilter,
    pub search_term: String,
    pub sort: SortDirection,
}
