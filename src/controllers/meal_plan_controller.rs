use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::info;
use validator::Validate;

use crate::controllers::recipe_controller::fetch_recipe;
use crate::error::{MealBuddyError, Result};
use crate::grocery::MealPlanStore;
use crate::models::api::{MealPlan, MealPlanEntry, NewMealPlan, Recipe};
use crate::models::{MealPlanRecipeRecord, MealPlanRecord};

/// Create a meal plan and its recipe slots
/// Every slot must reference an existing recipe
#[tracing::instrument(skip(pool, plan), fields(name = %plan.name))]
pub async fn create_meal_plan(pool: &SqlitePool, owner_id: i64, plan: &NewMealPlan) -> Result<i64> {
    plan.validate()?;

    let mut tx = pool.begin().await?;

    let meal_plan_id = sqlx::query(
        "INSERT INTO meal_plans (owner_id, name, start_date, end_date) VALUES (?, ?, ?, ?)",
    )
    .bind(owner_id)
    .bind(&plan.name)
    .bind(plan.start_date)
    .bind(plan.end_date)
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();

    for entry in &plan.entries {
        let recipe_exists: Option<i64> = sqlx::query_scalar("SELECT id FROM recipes WHERE id = ?")
            .bind(entry.recipe_id)
            .fetch_optional(&mut *tx)
            .await?;

        if recipe_exists.is_none() {
            return Err(MealBuddyError::RecipeNotFound(entry.recipe_id));
        }

        sqlx::query(
            "INSERT INTO meal_plan_recipes (meal_plan_id, recipe_id, day, meal_type, servings) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(meal_plan_id)
        .bind(entry.recipe_id)
        .bind(entry.day)
        .bind(&entry.meal_type)
        .bind(entry.servings)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    info!(meal_plan_id, entries = plan.entries.len(), "Meal plan created");

    Ok(meal_plan_id)
}

/// Fetch a meal plan owned by `owner_id` with every slot's recipe loaded
///
/// Slots are ordered by day, then meal type, then insertion.
pub async fn get_meal_plan_with_recipes(
    pool: &SqlitePool,
    meal_plan_id: i64,
    owner_id: i64,
) -> Result<MealPlan> {
    let mut conn = pool.acquire().await?;

    let record = sqlx::query_as::<_, MealPlanRecord>(
        "SELECT id, owner_id, name, start_date, end_date, created_at FROM meal_plans WHERE id = ? AND owner_id = ?",
    )
    .bind(meal_plan_id)
    .bind(owner_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(MealBuddyError::MealPlanNotFound(meal_plan_id))?;

    let slots = sqlx::query_as::<_, MealPlanRecipeRecord>(
        r#"
        SELECT id, meal_plan_id, recipe_id, day, meal_type, servings
        FROM meal_plan_recipes
        WHERE meal_plan_id = ?
        ORDER BY day, meal_type, id
        "#,
    )
    .bind(meal_plan_id)
    .fetch_all(&mut *conn)
    .await?;

    // the same recipe often fills several slots
    let mut recipes: HashMap<i64, Recipe> = HashMap::new();
    let mut entries = Vec::with_capacity(slots.len());

    for slot in slots {
        let recipe = match recipes.get(&slot.recipe_id) {
            Some(recipe) => recipe.clone(),
            None => {
                let recipe = fetch_recipe(&mut conn, slot.recipe_id).await?;
                recipes.insert(slot.recipe_id, recipe.clone());
                recipe
            }
        };

        entries.push(MealPlanEntry {
            id: slot.id,
            day: slot.day,
            meal_type: slot.meal_type,
            recipe,
            servings: slot.servings,
        });
    }

    Ok(MealPlan {
        id: record.id,
        owner_id: record.owner_id,
        name: record.name,
        start_date: record.start_date,
        end_date: record.end_date,
        entries,
        created_at: record.created_at,
    })
}

/// Get an owner's meal plans, newest first, without their slots
pub async fn list_meal_plans(pool: &SqlitePool, owner_id: i64) -> Result<Vec<MealPlanRecord>> {
    let meal_plans = sqlx::query_as::<_, MealPlanRecord>(
        r#"
        SELECT id, owner_id, name, start_date, end_date, created_at
        FROM meal_plans
        WHERE owner_id = ?
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    Ok(meal_plans)
}

/// Point a meal plan slot at another recipe and serving count
pub async fn update_meal_plan_entry(
    pool: &SqlitePool,
    owner_id: i64,
    meal_plan_id: i64,
    entry_id: i64,
    recipe_id: i64,
    servings: i64,
) -> Result<MealPlanRecipeRecord> {
    if servings < 1 {
        return Err(MealBuddyError::InvalidQuantity(servings as f64));
    }

    let mut tx = pool.begin().await?;

    let owned: Option<i64> =
        sqlx::query_scalar("SELECT id FROM meal_plans WHERE id = ? AND owner_id = ?")
            .bind(meal_plan_id)
            .bind(owner_id)
            .fetch_optional(&mut *tx)
            .await?;
    if owned.is_none() {
        return Err(MealBuddyError::MealPlanNotFound(meal_plan_id));
    }

    let recipe_exists: Option<i64> = sqlx::query_scalar("SELECT id FROM recipes WHERE id = ?")
        .bind(recipe_id)
        .fetch_optional(&mut *tx)
        .await?;
    if recipe_exists.is_none() {
        return Err(MealBuddyError::RecipeNotFound(recipe_id));
    }

    let updated = sqlx::query_as::<_, MealPlanRecipeRecord>(
        r#"
        UPDATE meal_plan_recipes
        SET recipe_id = ?, servings = ?
        WHERE id = ? AND meal_plan_id = ?
        RETURNING id, meal_plan_id, recipe_id, day, meal_type, servings
        "#,
    )
    .bind(recipe_id)
    .bind(servings)
    .bind(entry_id)
    .bind(meal_plan_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(MealBuddyError::MealPlanEntryNotFound(entry_id))?;

    tx.commit().await?;

    Ok(updated)
}

/// Delete a meal plan together with its slots
pub async fn delete_meal_plan(pool: &SqlitePool, owner_id: i64, meal_plan_id: i64) -> Result<()> {
    let mut tx = pool.begin().await?;

    let deleted = sqlx::query("DELETE FROM meal_plans WHERE id = ? AND owner_id = ?")
        .bind(meal_plan_id)
        .bind(owner_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if deleted == 0 {
        return Err(MealBuddyError::MealPlanNotFound(meal_plan_id));
    }

    sqlx::query("DELETE FROM meal_plan_recipes WHERE meal_plan_id = ?")
        .bind(meal_plan_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    info!(meal_plan_id, "Meal plan deleted");

    Ok(())
}

#[async_trait]
impl MealPlanStore for SqlitePool {
    async fn get_meal_plan_with_recipes(
        &self,
        meal_plan_id: i64,
        owner_id: i64,
    ) -> Result<MealPlan> {
        get_meal_plan_with_recipes(self, meal_plan_id, owner_id).await
    }
}
