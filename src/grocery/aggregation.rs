use indexmap::IndexMap;

use crate::grocery::categorization::categorize_ingredient;
use crate::models::api::{
    GeneratedGroceryList, GroceryItem, GroceryList, GroceryListStatus, MealPlan, MealPlanEntry,
    PantryStock,
};

/// Sum scaled ingredient amounts across meal plan entries
///
/// Buckets are keyed by (lowercased name, unit): the same ingredient under
/// two units stays two items and no unit conversion happens. Items come back
/// in first-insertion order with the display name and category of the first
/// occurrence. Quantities are not rounded here.
pub fn aggregate_ingredients(entries: &[MealPlanEntry]) -> Vec<GroceryItem> {
    let mut buckets: IndexMap<(String, String), GroceryItem> = IndexMap::new();

    for entry in entries {
        let multiplier = entry.serving_multiplier();

        for ingredient in &entry.recipe.ingredients {
            let amount = ingredient.amount_or_zero() * multiplier;
            let unit = ingredient.unit_or_default();
            let key = (ingredient.name.to_lowercase(), unit.to_string());

            buckets
                .entry(key)
                .and_modify(|item| item.quantity += amount)
                .or_insert_with(|| GroceryItem {
                    name: ingredient.name.clone(),
                    quantity: amount,
                    unit: unit.to_string(),
                    category: categorize_ingredient(&ingredient.name).to_string(),
                    purchased: false,
                });
        }
    }

    buckets.into_values().collect()
}

/// Drop items the pantry already covers
///
/// Each item is compared with the first pantry entry whose name matches
/// case-insensitively; it survives only when that entry holds strictly less
/// than the required quantity. Units are ignored and the pantry entry is not
/// drawn down, so one entry can cover several unit buckets of the same name.
pub fn exclude_stocked_items(items: Vec<GroceryItem>, pantry_stock: &[PantryStock]) -> Vec<GroceryItem> {
    let stock: Vec<(String, f64)> = pantry_stock
        .iter()
        .map(|stock| (stock.name.to_lowercase(), stock.quantity))
        .collect();

    items
        .into_iter()
        .filter(|item| {
            let name = item.name.to_lowercase();
            match stock.iter().find(|(stocked, _)| *stocked == name) {
                Some((_, on_hand)) => *on_hand < item.quantity,
                None => true,
            }
        })
        .collect()
}

/// Round to two decimal places for display
///
/// Halves round up toward positive infinity, so `-0.125` becomes `-0.12`.
pub fn round_quantity(quantity: f64) -> f64 {
    (quantity * 100.0 + 0.5).floor() / 100.0
}

/// List name used when the caller supplies none
pub fn default_list_name(meal_plan_name: &str) -> String {
    format!("Grocery List for {}", meal_plan_name)
}

/// Build a categorized, deduplicated grocery list from a meal plan
///
/// Pure and deterministic: identical inputs give identical output. Pantry
/// filtering only runs when `exclude_pantry_items` is set and there is stock
/// to compare against.
pub fn generate_grocery_list(
    meal_plan: &MealPlan,
    pantry_stock: &[PantryStock],
    exclude_pantry_items: bool,
    list_name: Option<&str>,
) -> GeneratedGroceryList {
    let mut items = aggregate_ingredients(&meal_plan.entries);

    if exclude_pantry_items && !pantry_stock.is_empty() {
        items = exclude_stocked_items(items, pantry_stock);
    }

    for item in &mut items {
        item.quantity = round_quantity(item.quantity);
    }

    let name = match list_name.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => default_list_name(&meal_plan.name),
    };

    let item_count = items.len();
    let excluded_pantry_item_count = if exclude_pantry_items {
        pantry_stock.len()
    } else {
        0
    };

    GeneratedGroceryList {
        list: GroceryList {
            id: 0,
            owner_id: meal_plan.owner_id,
            name,
            items,
            status: GroceryListStatus::Active,
            created_at: String::new(),
        },
        item_count,
        excluded_pantry_item_count,
    }
}
