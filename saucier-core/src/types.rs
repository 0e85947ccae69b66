use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown {kind}: {value}")]
pub struct UnknownLabel {
    pub kind: &'static str,
    pub value: String,
}

/// Languages a recipe can be generated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Fr,
    Es,
}

impl Language {
    pub const ALL: &'static [Language] = &[Language::En, Language::Fr, Language::Es];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
            Language::Es => "es",
        }
    }

    /// English name of the language, used when instructing the model.
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Fr => "French",
            Language::Es => "Spanish",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = UnknownLabel;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Language::ALL
            .iter()
            .copied()
            .find(|l| l.as_str() == normalized)
            .ok_or_else(|| UnknownLabel {
                kind: "language",
                value: s.to_string(),
            })
    }
}

/// Difficulty label. Ordered from easiest to hardest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: &'static [Difficulty] = &[Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Difficulty::ALL
            .iter()
            .copied()
            .find(|d| d.as_str() == normalized)
            .ok_or_else(|| UnknownLabel {
                kind: "difficulty",
                value: s.to_string(),
            })
    }
}

/// A persisted recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Recipe {
    pub id: Uuid,
    pub title: String,
    /// "quantity + name" entries, in order.
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub cuisine_type: String,
    pub language: Language,
    /// Preparation time in minutes.
    pub duration: i32,
    pub created_at: DateTime<Utc>,
    /// Running mean of every submitted rating, in [0, 5].
    pub rating: f64,
    pub ratings_count: i32,
    pub tags: Vec<String>,
    pub difficulty: Difficulty,
    pub image_url: Option<String>,
}

/// Everything needed to insert a recipe. The store assigns `id` and
/// `created_at`; rating starts at zero.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecipe {
    pub title: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub cuisine_type: String,
    pub language: Language,
    pub duration: i32,
    pub tags: Vec<String>,
    pub difficulty: Difficulty,
    pub image_url: Option<String>,
}

/// Timing and summary information returned alongside a generated recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct GenerationMetadata {
    /// Seconds spent waiting on the model, rounded to 2 decimals.
    pub generation_time: f64,
    /// Seconds spent on image search, rounded to 2 decimals.
    pub image_search_time: f64,
    pub total_ingredients: usize,
    pub total_steps: usize,
    pub is_vegetarian: bool,
}
