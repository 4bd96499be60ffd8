use chrono::NaiveDate;
use serde::Serialize;
use sqlx::prelude::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MealPlanRecord {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: String,
}

/// One recipe slot of a meal plan
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MealPlanRecipeRecord {
    pub id: i64,
    pub meal_plan_id: i64,
    pub recipe_id: i64,
    pub day: i64,
    pub meal_type: String,
    pub servings: i64,
}
