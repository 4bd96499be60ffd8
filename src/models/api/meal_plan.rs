use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::Recipe;

/// Longest range a single meal plan may cover, inclusive of both ends
pub const MAX_MEAL_PLAN_DAYS: i64 = 14;

/// Meal plan with every slot resolved to its recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlan {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub entries: Vec<MealPlanEntry>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanEntry {
    pub id: i64,
    pub day: i64,
    pub meal_type: String,
    pub recipe: Recipe,
    /// Servings requested for this slot, may differ from the recipe's own count
    pub servings: i64,
}

impl MealPlanEntry {
    /// Factor applied to every ingredient amount of the entry's recipe
    pub fn serving_multiplier(&self) -> f64 {
        self.servings as f64 / self.recipe.native_servings() as f64
    }
}

/// Input for creating a meal plan
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_date_range"))]
pub struct NewMealPlan {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    #[validate(nested)]
    pub entries: Vec<NewMealPlanEntry>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewMealPlanEntry {
    pub recipe_id: i64,
    #[validate(range(min = 1, max = 14))]
    pub day: i64,
    #[validate(length(min = 1, max = 20))]
    pub meal_type: String,
    #[serde(default = "default_servings")]
    #[validate(range(min = 1))]
    pub servings: i64,
}

fn default_servings() -> i64 {
    1
}

fn validate_date_range(plan: &NewMealPlan) -> Result<(), ValidationError> {
    if plan.end_date < plan.start_date {
        let mut error = ValidationError::new("date_range");
        error.message = Some("End date must not be before start date".into());
        return Err(error);
    }

    let days = (plan.end_date - plan.start_date).num_days() + 1;
    if days > MAX_MEAL_PLAN_DAYS {
        let mut error = ValidationError::new("date_range");
        error.message = Some("Meal plans cannot exceed 14 days".into());
        return Err(error);
    }

    Ok(())
}
