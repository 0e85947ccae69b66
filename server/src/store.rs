//! Postgres-backed recipe store.

use diesel::dsl::sql;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::sql_types::{BigInt, Bool, Text};
use saucier_core::store::{fold_rating, union_tags};
use saucier_core::{NewRecipe, Recipe, RecipeFilter, RecipePage, RecipeStore, StoreError};
use uuid::Uuid;

use crate::db::DbPool;
use crate::models::{to_nullable, NewRecipeRow, RecipeRow};
use crate::schema::recipes;

type PgPooled = PooledConnection<ConnectionManager<PgConnection>>;

pub struct PgRecipeStore {
    pool: DbPool,
}

impl PgRecipeStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<PgPooled, StoreError> {
        self.pool
            .get()
            .map_err(|e| StoreError::Backend(format!("Database connection failed: {}", e)))
    }

    /// Lock one row, apply `f` to it and write the result back.
    fn update_locked<F>(&self, id: Uuid, f: F) -> Result<Recipe, StoreError>
    where
        F: FnOnce(&mut PgConnection, RecipeRow) -> QueryResult<RecipeRow>,
    {
        let mut pooled = self.conn()?;
        let conn: &mut PgConnection = &mut pooled;
        let row = conn
            .transaction(|conn| {
                let row: RecipeRow = recipes::table
                    .find(id)
                    .select(RecipeRow::as_select())
                    .for_update()
                    .first(conn)?;
                f(conn, row)
            })
            .map_err(|e| query_error(id, e))?;
        Recipe::try_from(row)
    }
}

fn query_error(id: Uuid, e: diesel::result::Error) -> StoreError {
    match e {
        diesel::NotFound => StoreError::NotFound(id),
        other => StoreError::Backend(other.to_string()),
    }
}

fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn filtered_query<'a>(
    filter: &'a RecipeFilter,
    search_pattern: Option<&'a str>,
) -> recipes::BoxedQuery<'a, Pg> {
    let mut query = recipes::table.into_boxed();

    // Title or any ingredient
    if let Some(pattern) = search_pattern {
        query = query.filter(
            recipes::title
                .ilike(pattern)
                .or(sql::<Text>("array_to_string(ingredients, ' ')").ilike(pattern)),
        );
    }
    if let Some(ref cuisine_type) = filter.cuisine_type {
        query = query.filter(recipes::cuisine_type.eq(cuisine_type));
    }
    if let Some(language) = filter.language {
        query = query.filter(recipes::language.eq(language.as_str()));
    }
    // AND logic: every tag must be present
    for tag in &filter.tags {
        query = query.filter(sql::<Bool>("").bind::<Text, _>(tag).sql(" = ANY(tags)"));
    }
    if let Some(difficulty) = filter.difficulty {
        query = query.filter(recipes::difficulty.eq(difficulty.as_str()));
    }
    if let Some(min_rating) = filter.min_rating {
        query = query.filter(recipes::rating.ge(min_rating));
    }

    query
}

impl RecipeStore for PgRecipeStore {
    fn insert(&self, recipe: NewRecipe) -> Result<Recipe, StoreError> {
        let mut conn = self.conn()?;

        let ingredients = to_nullable(&recipe.ingredients);
        let steps = to_nullable(&recipe.steps);
        let tags = to_nullable(&union_tags(&[], &recipe.tags));
        let row = NewRecipeRow {
            title: &recipe.title,
            ingredients: &ingredients,
            steps: &steps,
            cuisine_type: &recipe.cuisine_type,
            language: recipe.language.as_str(),
            duration: recipe.duration,
            tags: &tags,
            difficulty: recipe.difficulty.as_str(),
            image_url: recipe.image_url.as_deref(),
        };

        let saved: RecipeRow = diesel::insert_into(recipes::table)
            .values(&row)
            .returning(RecipeRow::as_returning())
            .get_result(&mut conn)
            .map_err(|e| StoreError::Backend(format!("Failed to insert recipe: {}", e)))?;

        Recipe::try_from(saved)
    }

    fn get(&self, id: Uuid) -> Result<Recipe, StoreError> {
        let mut conn = self.conn()?;
        let row: RecipeRow = recipes::table
            .find(id)
            .select(RecipeRow::as_select())
            .first(&mut conn)
            .map_err(|e| query_error(id, e))?;
        Recipe::try_from(row)
    }

    fn list(
        &self,
        filter: &RecipeFilter,
        limit: i64,
        offset: i64,
    ) -> Result<RecipePage, StoreError> {
        let search_pattern = filter.search.as_deref().map(like_pattern);
        let mut conn = self.conn()?;

        // COUNT(*) OVER() gives the total across all matching rows
        let rows: Vec<(RecipeRow, i64)> = filtered_query(filter, search_pattern.as_deref())
            .order((recipes::created_at.desc(), recipes::id.desc()))
            .select((RecipeRow::as_select(), sql::<BigInt>("COUNT(*) OVER()")))
            .limit(limit)
            .offset(offset)
            .load(&mut conn)
            .map_err(|e| StoreError::Backend(format!("Failed to fetch recipes: {}", e)))?;

        let total = rows.first().map(|(_, total)| *total).unwrap_or(0);
        let recipes = rows
            .into_iter()
            .map(|(row, _)| Recipe::try_from(row))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RecipePage { total, recipes })
    }

    fn add_rating(&self, id: Uuid, rating: f64) -> Result<Recipe, StoreError> {
        self.update_locked(id, |conn, row| {
            let (mean, count) = fold_rating(row.rating, row.ratings_count, rating);
            diesel::update(recipes::table.find(id))
                .set((recipes::rating.eq(mean), recipes::ratings_count.eq(count)))
                .returning(RecipeRow::as_returning())
                .get_result(conn)
        })
    }

    fn merge_tags(&self, id: Uuid, tags: &[String]) -> Result<Recipe, StoreError> {
        self.update_locked(id, |conn, row| {
            let existing: Vec<String> = row.tags.into_iter().flatten().collect();
            let merged = to_nullable(&union_tags(&existing, tags));
            diesel::update(recipes::table.find(id))
                .set(recipes::tags.eq(&merged))
                .returning(RecipeRow::as_returning())
                .get_result(conn)
        })
    }
}
