use async_trait::async_trait;
use tracing::{debug, info};
use validator::Validate;

use crate::error::Result;
use crate::grocery::aggregation::generate_grocery_list;
use crate::models::api::{GenerateGroceryListRequest, GeneratedGroceryList, MealPlan, PantryStock};

/// Source of meal plans with their recipes resolved
#[async_trait]
pub trait MealPlanStore: Send + Sync {
    /// Fails with `MealPlanNotFound` when the plan is missing or belongs to
    /// another owner.
    async fn get_meal_plan_with_recipes(&self, meal_plan_id: i64, owner_id: i64)
    -> Result<MealPlan>;
}

/// Source of an owner's current pantry stock
#[async_trait]
pub trait PantryStore: Send + Sync {
    async fn get_pantry_stock(&self, owner_id: i64) -> Result<Vec<PantryStock>>;
}

/// Loads a meal plan and pantry stock, then runs grocery aggregation
pub struct GroceryListGenerator<'a, M: ?Sized, P: ?Sized> {
    meal_plans: &'a M,
    pantry: &'a P,
}

impl<'a, M, P> GroceryListGenerator<'a, M, P>
where
    M: MealPlanStore + ?Sized,
    P: PantryStore + ?Sized,
{
    pub fn new(meal_plans: &'a M, pantry: &'a P) -> Self {
        Self { meal_plans, pantry }
    }

    #[tracing::instrument(skip(self, request), fields(meal_plan_id = request.meal_plan_id))]
    pub async fn generate(
        &self,
        owner_id: i64,
        request: &GenerateGroceryListRequest,
    ) -> Result<GeneratedGroceryList> {
        request.validate()?;

        let meal_plan = self
            .meal_plans
            .get_meal_plan_with_recipes(request.meal_plan_id, owner_id)
            .await?;

        // stock is only read when it can affect the result
        let pantry_stock = if request.exclude_pantry_items {
            self.pantry.get_pantry_stock(owner_id).await?
        } else {
            Vec::new()
        };

        debug!(
            entries = meal_plan.entries.len(),
            pantry_items = pantry_stock.len(),
            "Aggregating meal plan ingredients"
        );

        let generated = generate_grocery_list(
            &meal_plan,
            &pantry_stock,
            request.exclude_pantry_items,
            request.name.as_deref(),
        );

        info!(
            item_count = generated.item_count,
            excluded_pantry_items = generated.excluded_pantry_item_count,
            "Grocery list generated"
        );

        Ok(generated)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::NaiveDate;

    use super::*;
    use crate::error::MealBuddyError;
    use crate::models::api::{Ingredient, MealPlanEntry, Recipe};

    struct FakeMealPlans {
        plans: HashMap<(i64, i64), MealPlan>,
    }

    #[async_trait]
    impl MealPlanStore for FakeMealPlans {
        async fn get_meal_plan_with_recipes(
            &self,
            meal_plan_id: i64,
            owner_id: i64,
        ) -> Result<MealPlan> {
            self.plans
                .get(&(meal_plan_id, owner_id))
                .cloned()
                .ok_or(MealBuddyError::MealPlanNotFound(meal_plan_id))
        }
    }

    #[derive(Default)]
    struct FakePantry {
        stock: Vec<PantryStock>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PantryStore for FakePantry {
        async fn get_pantry_stock(&self, _owner_id: i64) -> Result<Vec<PantryStock>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.stock.clone())
        }
    }

    fn meal_plans() -> FakeMealPlans {
        let date = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        let plan = MealPlan {
            id: 7,
            owner_id: 1,
            name: "Busy week".to_string(),
            start_date: date,
            end_date: date,
            created_at: String::new(),
            entries: vec![MealPlanEntry {
                id: 1,
                day: 1,
                meal_type: "dinner".to_string(),
                servings: 2,
                recipe: Recipe {
                    id: 3,
                    name: "Pasta".to_string(),
                    instructions: None,
                    servings: Some(1),
                    created_at: String::new(),
                    ingredients: vec![
                        Ingredient::new("Pasta", 100.0, "g"),
                        Ingredient::new("Tomato sauce", 0.5, "cup"),
                    ],
                },
            }],
        };

        FakeMealPlans {
            plans: HashMap::from([((7, 1), plan)]),
        }
    }

    #[tokio::test]
    async fn test_generate_uses_pantry_stock() {
        let plans = meal_plans();
        let pantry = FakePantry {
            stock: vec![PantryStock::new("pasta", 500.0, "g")],
            ..Default::default()
        };

        let generated = GroceryListGenerator::new(&plans, &pantry)
            .generate(1, &GenerateGroceryListRequest::new(7))
            .await
            .expect("Failed to generate grocery list");

        assert_eq!(generated.item_count, 1);
        assert_eq!(generated.list.items[0].name, "Tomato sauce");
        assert_eq!(generated.list.items[0].quantity, 1.0);
        assert_eq!(generated.list.name, "Grocery List for Busy week");
        assert_eq!(generated.excluded_pantry_item_count, 1);
    }

    #[tokio::test]
    async fn test_generate_skips_pantry_when_not_excluding() {
        let plans = meal_plans();
        let pantry = FakePantry {
            stock: vec![PantryStock::new("pasta", 500.0, "g")],
            ..Default::default()
        };
        let request = GenerateGroceryListRequest {
            exclude_pantry_items: false,
            ..GenerateGroceryListRequest::new(7)
        };

        let generated = GroceryListGenerator::new(&plans, &pantry)
            .generate(1, &request)
            .await
            .expect("Failed to generate grocery list");

        assert_eq!(generated.item_count, 2);
        assert_eq!(pantry.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_generate_other_owners_plan_is_not_found() {
        let plans = meal_plans();
        let pantry = FakePantry::default();

        let result = GroceryListGenerator::new(&plans, &pantry)
            .generate(2, &GenerateGroceryListRequest::new(7))
            .await;

        match result {
            Err(MealBuddyError::MealPlanNotFound(id)) => assert_eq!(id, 7),
            other => panic!("Expected MealPlanNotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_generate_rejects_overlong_name() {
        let plans = meal_plans();
        let pantry = FakePantry::default();
        let request = GenerateGroceryListRequest {
            name: Some("x".repeat(101)),
            ..GenerateGroceryListRequest::new(7)
        };

        let result = GroceryListGenerator::new(&plans, &pantry)
            .generate(1, &request)
            .await;

        assert!(matches!(result, Err(MealBuddyError::Validation(_))));
    }
}
