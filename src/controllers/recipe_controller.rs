use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;

use crate::error::{MealBuddyError, Result};
use crate::models::api::{Ingredient, Recipe};
use crate::models::{RecipeIngredientRecord, RecipeRecord};

/// Fetch a recipe by ID with all its ingredients
pub async fn get_recipe(pool: &SqlitePool, recipe_id: i64) -> Result<Recipe> {
    let mut conn = pool.acquire().await?;
    fetch_recipe(&mut conn, recipe_id).await
}

pub(crate) async fn fetch_recipe(conn: &mut SqliteConnection, recipe_id: i64) -> Result<Recipe> {
    let recipe = sqlx::query_as::<_, RecipeRecord>(
        "SELECT id, name, instructions, servings, created_at FROM recipes WHERE id = ?",
    )
    .bind(recipe_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(MealBuddyError::RecipeNotFound(recipe_id))?;

    // Ingredients keep the order they were entered in
    let ingredients = sqlx::query_as::<_, RecipeIngredientRecord>(
        r#"
        SELECT id, recipe_id, name, amount, unit, created_at
        FROM recipe_ingredients
        WHERE recipe_id = ?
        ORDER BY id
        "#,
    )
    .bind(recipe_id)
    .fetch_all(&mut *conn)
    .await?
    .into_iter()
    .map(|row| Ingredient {
        name: row.name,
        amount: row.amount,
        unit: row.unit,
    })
    .collect();

    Ok(Recipe {
        id: recipe.id,
        name: recipe.name,
        instructions: recipe.instructions,
        servings: recipe.servings,
        created_at: recipe.created_at,
        ingredients,
    })
}

/// Create a new recipe with ingredients
/// Takes a Recipe struct (ignoring id and created_at)
pub async fn create_recipe(pool: &SqlitePool, recipe: &Recipe) -> Result<i64> {
    let mut tx = pool.begin().await?;

    let recipe_id =
        sqlx::query("INSERT INTO recipes (name, instructions, servings) VALUES (?, ?, ?)")
            .bind(&recipe.name)
            .bind(&recipe.instructions)
            .bind(recipe.servings)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();

    for ingredient in &recipe.ingredients {
        sqlx::query(
            "INSERT INTO recipe_ingredients (recipe_id, name, amount, unit) VALUES (?, ?, ?, ?)",
        )
        .bind(recipe_id)
        .bind(&ingredient.name)
        .bind(ingredient.amount)
        .bind(&ingredient.unit)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    info!(
        recipe_id,
        ingredients = recipe.ingredients.len(),
        "Recipe created"
    );

    Ok(recipe_id)
}

/// Get all recipes, without ingredients, ordered by name
pub async fn list_recipes(pool: &SqlitePool) -> Result<Vec<RecipeRecord>> {
    let recipes = sqlx::query_as::<_, RecipeRecord>(
        "SELECT id, name, instructions, servings, created_at FROM recipes ORDER BY name, id",
    )
    .fetch_all(pool)
    .await?;

    Ok(recipes)
}
