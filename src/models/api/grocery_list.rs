use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::MealBuddyError;

/// A single line of a grocery list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroceryItem {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub category: String,
    #[serde(default)]
    pub purchased: bool,
}

impl fmt::Display for GroceryItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.purchased { "x" } else { " " };
        write!(
            f,
            "[{}] {}: {} {} ({})",
            mark, self.name, self.quantity, self.unit, self.category
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroceryListStatus {
    #[default]
    Active,
    Completed,
}

impl GroceryListStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl FromStr for GroceryListStatus {
    type Err = MealBuddyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(MealBuddyError::InvalidStatus(other.to_string())),
        }
    }
}

/// Grocery list for API responses
///
/// `id`, `owner_id` and `created_at` are only meaningful once the list has
/// been stored; freshly generated lists carry zero/empty values there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroceryList {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub owner_id: i64,
    pub name: String,
    pub items: Vec<GroceryItem>,
    #[serde(default)]
    pub status: GroceryListStatus,
    #[serde(default)]
    pub created_at: String,
}

/// Outcome of generating a list from a meal plan
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedGroceryList {
    /// Serialized inline, so `items` sits next to `itemCount`
    #[serde(flatten)]
    pub list: GroceryList,
    pub item_count: usize,
    /// Pantry records consulted during exclusion, zero when exclusion was off
    pub excluded_pantry_item_count: usize,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateGroceryListRequest {
    pub meal_plan_id: i64,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub name: Option<String>,
    #[serde(default = "default_exclude_pantry_items")]
    pub exclude_pantry_items: bool,
}

impl GenerateGroceryListRequest {
    pub fn new(meal_plan_id: i64) -> Self {
        Self {
            meal_plan_id,
            name: None,
            exclude_pantry_items: default_exclude_pantry_items(),
        }
    }
}

fn default_exclude_pantry_items() -> bool {
    true
}

/// Hand-written list, not derived from a meal plan
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGroceryList {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(nested)]
    pub items: Vec<NewGroceryItem>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewGroceryItem {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(range(min = 0.0))]
    pub quantity: f64,
    #[validate(length(min = 1))]
    pub unit: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub purchased: bool,
}

/// Partial update; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct GroceryListUpdate {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub items: Option<Vec<GroceryItem>>,
    pub status: Option<GroceryListStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroceryListQuery {
    /// `None` lists every status
    pub status: Option<GroceryListStatus>,
    pub page: u32,
    pub limit: u32,
}

impl Default for GroceryListQuery {
    fn default() -> Self {
        Self {
            status: None,
            page: 1,
            limit: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroceryListSummary {
    pub total_items: usize,
    pub purchased_items: usize,
    pub categories: Vec<CategorySummary>,
    pub completion_percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub category: String,
    pub total: usize,
    pub purchased: usize,
    pub items: Vec<GroceryItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_str() {
        assert_eq!(
            "active".parse::<GroceryListStatus>().unwrap(),
            GroceryListStatus::Active
        );
        assert_eq!(GroceryListStatus::Completed.as_str(), "completed");
        assert!(matches!(
            "archived".parse::<GroceryListStatus>(),
            Err(MealBuddyError::InvalidStatus(s)) if s == "archived"
        ));
    }

    #[test]
    fn test_grocery_item_display() {
        let item = GroceryItem {
            name: "Tomato".to_string(),
            quantity: 8.0,
            unit: "piece".to_string(),
            category: "vegetables".to_string(),
            purchased: false,
        };

        assert_eq!(item.to_string(), "[ ] Tomato: 8 piece (vegetables)");
    }

    #[test]
    fn test_generated_list_serializes_items_at_top_level() {
        let generated = GeneratedGroceryList {
            list: GroceryList {
                id: 0,
                owner_id: 1,
                name: "Grocery List for Week 10".to_string(),
                items: vec![GroceryItem {
                    name: "Tomato".to_string(),
                    quantity: 8.0,
                    unit: "piece".to_string(),
                    category: "vegetables".to_string(),
                    purchased: false,
                }],
                status: GroceryListStatus::Active,
                created_at: String::new(),
            },
            item_count: 1,
            excluded_pantry_item_count: 0,
        };

        let json = serde_json::to_value(&generated).expect("Failed to serialize");

        assert!(json.get("list").is_none());
        assert_eq!(json["items"][0]["name"], "Tomato");
        assert_eq!(json["items"][0]["purchased"], false);
        assert_eq!(json["itemCount"], 1);
        assert_eq!(json["excludedPantryItemCount"], 0);
        assert_eq!(json["name"], "Grocery List for Week 10");
        assert_eq!(json["status"], "active");
    }

    #[test]
    fn test_generate_request_defaults_to_excluding_pantry() {
        let request: GenerateGroceryListRequest =
            serde_json::from_str(r#"{"mealPlanId": 4}"#).expect("Failed to parse request");

        assert_eq!(request.meal_plan_id, 4);
        assert!(request.exclude_pantry_items);
        assert_eq!(request.name, None);
    }

    #[test]
    fn test_create_grocery_list_validation() {
        let list = CreateGroceryList {
            name: "Party".to_string(),
            items: vec![NewGroceryItem {
                name: "Chips".to_string(),
                quantity: -2.0,
                unit: "bag".to_string(),
                category: None,
                purchased: false,
            }],
        };

        assert!(list.validate().is_err());
    }
}
