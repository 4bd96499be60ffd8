//! Grocery list generation: ingredient aggregation, pantry exclusion and
//! category tagging.

mod aggregation;
mod categorization;
mod generator;
mod summary;

pub use aggregation::{
    aggregate_ingredients, default_list_name, exclude_stocked_items, generate_grocery_list,
    round_quantity,
};
pub use categorization::{Category, categorize_ingredient};
pub use generator::{GroceryListGenerator, MealPlanStore, PantryStore};
pub use summary::summarize;
