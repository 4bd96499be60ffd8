mod grocery_list;
mod meal_plan;
mod pantry_item;
mod recipe;
mod recipe_ingredient;

pub mod api;

#[cfg(test)]
pub mod test_fixtures;

pub use grocery_list::{GroceryListItemRecord, GroceryListRecord};
pub use meal_plan::{MealPlanRecipeRecord, MealPlanRecord};
pub use pantry_item::PantryItemRecord;
pub use recipe::RecipeRecord;
pub use recipe_ingredient::RecipeIngredientRecord;
