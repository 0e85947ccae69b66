use chrono::{DateTime, Utc};
use diesel::prelude::*;
use saucier_core::{Recipe, StoreError};
use uuid::Uuid;

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RecipeRow {
    pub id: Uuid,
    pub title: String,
    pub ingredients: Vec<Option<String>>,
    pub steps: Vec<Option<String>>,
    pub cuisine_type: String,
    pub language: String,
    pub duration: i32,
    pub created_at: DateTime<Utc>,
    pub rating: f64,
    pub ratings_count: i32,
    pub tags: Vec<Option<String>>,
    pub difficulty: String,
    pub image_url: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipes)]
pub struct NewRecipeRow<'a> {
    pub title: &'a str,
    pub ingredients: &'a [Option<String>],
    pub steps: &'a [Option<String>],
    pub cuisine_type: &'a str,
    pub language: &'a str,
    pub duration: i32,
    pub tags: &'a [Option<String>],
    pub difficulty: &'a str,
    pub image_url: Option<&'a str>,
}

/// Wrap plain strings for a nullable-element array column.
pub fn to_nullable(items: &[String]) -> Vec<Option<String>> {
    items.iter().cloned().map(Some).collect()
}

impl TryFrom<RecipeRow> for Recipe {
    type Error = StoreError;

    fn try_from(row: RecipeRow) -> Result<Self, Self::Error> {
        let language = row
            .language
            .parse()
            .map_err(|e| StoreError::Corrupt(format!("recipe {}: {}", row.id, e)))?;
        let difficulty = row
            .difficulty
            .parse()
            .map_err(|e| StoreError::Corrupt(format!("recipe {}: {}", row.id, e)))?;

        Ok(Recipe {
            id: row.id,
            title: row.title,
            ingredients: row.ingredients.into_iter().flatten().collect(),
            steps: row.steps.into_iter().flatten().collect(),
            cuisine_type: row.cuisine_type,
            language,
            duration: row.duration,
            created_at: row.created_at,
            rating: row.rating,
            ratings_count: row.ratings_count,
            tags: row.tags.into_iter().flatten().collect(),
            difficulty,
            image_url: row.image_url,
        })
    }
}
