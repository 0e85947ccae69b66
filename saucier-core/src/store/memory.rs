//! In-memory recipe store for tests and offline runs.

use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use super::{fold_rating, union_tags, RecipeFilter, RecipePage, RecipeStore};
use crate::error::StoreError;
use crate::types::{NewRecipe, Recipe};

#[derive(Debug, Default)]
pub struct MemoryStore {
    recipes: Mutex<HashMap<Uuid, Recipe>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Uuid, Recipe>>, StoreError> {
        self.recipes
            .lock()
            .map_err(|_| StoreError::Backend("recipe map lock poisoned".to_string()))
    }

    /// Apply `f` to one recipe while holding the lock.
    fn update<F>(&self, id: Uuid, f: F) -> Result<Recipe, StoreError>
    where
        F: FnOnce(&mut Recipe),
    {
        let mut recipes = self.lock()?;
        let recipe = recipes.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        f(recipe);
        Ok(recipe.clone())
    }
}

impl RecipeStore for MemoryStore {
    fn insert(&self, new: NewRecipe) -> Result<Recipe, StoreError> {
        let recipe = Recipe {
            id: Uuid::new_v4(),
            title: new.title,
            ingredients: new.ingredients,
            steps: new.steps,
            cuisine_type: new.cuisine_type,
            language: new.language,
            duration: new.duration,
            created_at: Utc::now(),
            rating: 0.0,
            ratings_count: 0,
            tags: union_tags(&[], &new.tags),
            difficulty: new.difficulty,
            image_url: new.image_url,
        };
        self.lock()?.insert(recipe.id, recipe.clone());
        Ok(recipe)
    }

    fn get(&self, id: Uuid) -> Result<Recipe, StoreError> {
        self.lock()?.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    fn list(
        &self,
        filter: &RecipeFilter,
        limit: i64,
        offset: i64,
    ) -> Result<RecipePage, StoreError> {
        let recipes = self.lock()?;
        let mut matching: Vec<&Recipe> = recipes.values().filter(|r| filter.matches(r)).collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = matching.len() as i64;
        let recipes = matching
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect();

        Ok(RecipePage { total, recipes })
    }

    fn add_rating(&self, id: Uuid, rating: f64) -> Result<Recipe, StoreError> {
        self.update(id, |recipe| {
            let (mean, count) = fold_rating(recipe.rating, recipe.ratings_count, rating);
            recipe.rating = mean;
            recipe.ratings_count = count;
        })
    }

    fn merge_tags(&self, id: Uuid, tags: &[String]) -> Result<Recipe, StoreError> {
        self.update(id, |recipe| {
            recipe.tags = union_tags(&recipe.tags, tags);
        })
    }
}
