mod grocery_list;
mod meal_plan;
mod page;
mod pantry;
mod recipe;

pub use grocery_list::{
    CategorySummary, CreateGroceryList, GenerateGroceryListRequest, GeneratedGroceryList,
    GroceryItem, GroceryList, GroceryListQuery, GroceryListStatus, GroceryListSummary,
    GroceryListUpdate, NewGroceryItem,
};
pub use meal_plan::{MAX_MEAL_PLAN_DAYS, MealPlan, MealPlanEntry, NewMealPlan, NewMealPlanEntry};
pub(crate) use page::limit_offset;
pub use page::Page;
pub use pantry::{
    CategoryCount, ExpiringPantryItems, ExpiryWindow, NewPantryItem, PANTRY_CATEGORIES,
    PantryAddOutcome, PantryCategoryStats, PantryItem, PantryItemUpdate, PantryListing,
    PantryQuery, PantryStats, PantryStock,
};
pub use recipe::{DEFAULT_UNIT, Ingredient, Recipe};
