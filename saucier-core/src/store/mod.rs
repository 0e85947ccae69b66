//! Recipe persistence abstraction.
//!
//! The core only defines the contract and an in-memory implementation; the
//! server provides the Postgres-backed one.

mod memory;

pub use memory::MemoryStore;

use uuid::Uuid;

use crate::error::StoreError;
use crate::types::{Difficulty, Language, NewRecipe, Recipe};

/// Default number of recipes per page.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Largest page a client may request.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Filters for listing recipes. Every set field must match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeFilter {
    /// Case-insensitive substring of the title or any ingredient.
    pub search: Option<String>,
    pub cuisine_type: Option<String>,
    pub language: Option<Language>,
    /// Recipe must carry all of these.
    pub tags: Vec<String>,
    pub difficulty: Option<Difficulty>,
    pub min_rating: Option<f64>,
}

impl RecipeFilter {
    /// In-process evaluation of the filter.
    pub fn matches(&self, recipe: &Recipe) -> bool {
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let in_title = recipe.title.to_lowercase().contains(&needle);
            let in_ingredients = recipe
                .ingredients
                .iter()
                .any(|i| i.to_lowercase().contains(&needle));
            if !in_title && !in_ingredients {
                return false;
            }
        }
        if let Some(cuisine) = &self.cuisine_type {
            if &recipe.cuisine_type != cuisine {
                return false;
            }
        }
        if let Some(language) = self.language {
            if recipe.language != language {
                return false;
            }
        }
        if !self.tags.iter().all(|t| recipe.tags.contains(t)) {
            return false;
        }
        if let Some(difficulty) = self.difficulty {
            if recipe.difficulty != difficulty {
                return false;
            }
        }
        if let Some(min_rating) = self.min_rating {
            if recipe.rating < min_rating {
                return false;
            }
        }
        true
    }
}

/// One page of results plus the total number of matches.
#[derive(Debug, Clone)]
pub struct RecipePage {
    pub total: i64,
    pub recipes: Vec<Recipe>,
}

/// Storage for recipes.
///
/// `add_rating` and `merge_tags` must be atomic per recipe: concurrent calls
/// on the same id may not lose updates.
pub trait RecipeStore: Send + Sync {
    fn insert(&self, recipe: NewRecipe) -> Result<Recipe, StoreError>;

    fn get(&self, id: Uuid) -> Result<Recipe, StoreError>;

    /// Matching recipes, newest first.
    fn list(&self, filter: &RecipeFilter, limit: i64, offset: i64)
        -> Result<RecipePage, StoreError>;

    /// Fold one rating into the running mean.
    fn add_rating(&self, id: Uuid, rating: f64) -> Result<Recipe, StoreError>;

    /// Union `tags` into the recipe's tags.
    fn merge_tags(&self, id: Uuid, tags: &[String]) -> Result<Recipe, StoreError>;
}

/// Running mean after one more rating. Returns `(rating, ratings_count)`.
pub fn fold_rating(current: f64, count: i32, new_rating: f64) -> (f64, i32) {
    let count = count.max(0);
    let total = current * f64::from(count) + new_rating;
    let new_count = count + 1;
    let mean = total / f64::from(new_count);
    (mean.clamp(0.0, 5.0), new_count)
}

/// Existing tags followed by new distinct tags, duplicates dropped.
pub fn union_tags(existing: &[String], new_tags: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(existing.len() + new_tags.len());
    for tag in existing.iter().chain(new_tags) {
        if !merged.contains(tag) {
            merged.push(tag.clone());
        }
    }
    merged
}
