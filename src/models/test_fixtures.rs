use rstest::*;
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};

use crate::models::api::{Ingredient, Recipe};

/// Owner id used by every fixture-backed test
pub const OWNER: i64 = 1;

/// In-memory SQLite database with migrations applied
///
/// Shared by the model, controller and store tests so every suite sees the
/// same schema.
#[fixture]
pub async fn test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// Build an unsaved recipe from `(name, amount, unit)` triples
pub fn recipe(name: &str, servings: Option<i64>, ingredients: &[(&str, f64, &str)]) -> Recipe {
    Recipe {
        id: 0,
        name: name.to_string(),
        instructions: None,
        servings,
        created_at: String::new(),
        ingredients: ingredients
            .iter()
            .map(|(name, amount, unit)| Ingredient::new(*name, *amount, *unit))
            .collect(),
    }
}
