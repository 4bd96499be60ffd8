use indexmap::IndexMap;

use crate::models::api::{CategorySummary, GroceryList, GroceryListSummary};

/// Per-category progress of a grocery list
///
/// Categories appear in the order they are first seen in the list; items
/// with an empty category are counted under "other".
pub fn summarize(list: &GroceryList) -> GroceryListSummary {
    let mut categories: IndexMap<&str, CategorySummary> = IndexMap::new();

    for item in &list.items {
        let category = if item.category.is_empty() {
            "other"
        } else {
            item.category.as_str()
        };

        let summary = categories
            .entry(category)
            .or_insert_with(|| CategorySummary {
                category: category.to_string(),
                total: 0,
                purchased: 0,
                items: Vec::new(),
            });
        summary.total += 1;
        if item.purchased {
            summary.purchased += 1;
        }
        summary.items.push(item.clone());
    }

    let total_items = list.items.len();
    let purchased_items = list.items.iter().filter(|item| item.purchased).count();
    let completion_percentage = if total_items > 0 {
        (purchased_items as f64 / total_items as f64 * 100.0).round() as u32
    } else {
        0
    };

    GroceryListSummary {
        total_items,
        purchased_items,
        categories: categories.into_values().collect(),
        completion_percentage,
    }
}
