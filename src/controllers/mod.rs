mod grocery_list_controller;
mod meal_plan_controller;
mod pantry_controller;
mod recipe_controller;

pub use grocery_list_controller::{
    create_grocery_list, delete_grocery_list, generate_grocery_list, get_grocery_list,
    grocery_list_summary, list_grocery_lists, set_item_purchased, update_grocery_list,
};
pub use meal_plan_controller::{
    create_meal_plan, delete_meal_plan, get_meal_plan_with_recipes, list_meal_plans,
    update_meal_plan_entry,
};
pub use pantry_controller::{
    add_pantry_item, bulk_add_pantry_items, delete_pantry_item, get_expiring_pantry_items,
    get_pantry_item, get_pantry_stats, get_pantry_stock, list_pantry_items, update_pantry_item, use_pantry_item,
};
pub use recipe_controller::{create_recipe, get_recipe, list_recipes};
