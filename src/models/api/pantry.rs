use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::Page;
use crate::models::PantryItemRecord;

/// Categories a user may assign to a pantry item by hand
pub const PANTRY_CATEGORIES: [&str; 7] = [
    "vegetables",
    "fruits",
    "dairy",
    "grains",
    "protein",
    "spices",
    "other",
];

/// On-hand quantity of one ingredient, as consulted by grocery generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PantryStock {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

impl PantryStock {
    pub fn new(name: impl Into<String>, quantity: f64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit: unit.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PantryItem {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub category: String,
    pub expiry_date: Option<NaiveDate>,
    pub created_at: String,
}

impl From<PantryItemRecord> for PantryItem {
    fn from(record: PantryItemRecord) -> Self {
        Self {
            id: record.id,
            owner_id: record.owner_id,
            name: record.name,
            quantity: record.quantity,
            unit: record.unit,
            category: record.category,
            expiry_date: record.expiry_date,
            created_at: record.created_at,
        }
    }
}

impl From<&PantryItem> for PantryStock {
    fn from(item: &PantryItem) -> Self {
        Self::new(item.name.clone(), item.quantity, item.unit.clone())
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewPantryItem {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(range(min = 0.0))]
    pub quantity: f64,
    #[validate(length(min = 1, max = 20))]
    pub unit: String,
    #[serde(default)]
    #[validate(custom(function = "validate_pantry_category"))]
    pub category: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
}

/// Partial update; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PantryItemUpdate {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(range(min = 0.0))]
    pub quantity: Option<f64>,
    #[validate(length(min = 1, max = 20))]
    pub unit: Option<String>,
    #[validate(custom(function = "validate_pantry_category"))]
    pub category: Option<String>,
    pub expiry_date: Option<NaiveDate>,
}

/// Whether `add_pantry_item` inserted a row or topped up an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PantryAddOutcome {
    Created,
    Merged,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PantryQuery {
    /// `None` or `"all"` lists every category
    pub category: Option<String>,
    /// Only items whose expiry date falls inside the window
    #[serde(default)]
    pub expiring: Option<ExpiryWindow>,
    pub page: u32,
    pub limit: u32,
}

impl Default for PantryQuery {
    fn default() -> Self {
        Self {
            category: None,
            expiring: None,
            page: 1,
            limit: 50,
        }
    }
}

/// Inclusive range of expiry dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ExpiryWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl ExpiryWindow {
    /// `today` through `today + days`
    pub fn within_days(today: NaiveDate, days: u32) -> Self {
        let to = today
            .checked_add_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MAX);
        Self { from: today, to }
    }
}

/// One page of pantry items plus item counts across the whole pantry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PantryListing {
    #[serde(flatten)]
    pub page: Page<PantryItem>,
    /// Counted over every item of the owner, ignoring the query's filters
    pub category_summary: Vec<CategoryCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub category: String,
    pub item_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PantryStats {
    pub total_items: i64,
    pub expiring_items: i64,
    pub expired_items: i64,
    pub category_breakdown: Vec<PantryCategoryStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PantryCategoryStats {
    pub category: String,
    pub item_count: i64,
    pub total_quantity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiringPantryItems {
    pub expiring: Vec<PantryItem>,
    pub expired: Vec<PantryItem>,
}

fn validate_pantry_category(category: &str) -> Result<(), ValidationError> {
    if PANTRY_CATEGORIES.contains(&category) {
        Ok(())
    } else {
        let mut error = ValidationError::new("invalid_pantry_category");
        error.message = Some(format!("Unknown pantry category '{}'", category).into());
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_item(category: Option<&str>) -> NewPantryItem {
        NewPantryItem {
            name: "Rice".to_string(),
            quantity: 2.0,
            unit: "kg".to_string(),
            category: category.map(str::to_string),
            expiry_date: None,
        }
    }

    #[test]
    fn test_new_pantry_item_validation() {
        assert!(new_item(None).validate().is_ok());
        assert!(new_item(Some("grains")).validate().is_ok());
        assert!(new_item(Some("snacks")).validate().is_err());

        let mut item = new_item(None);
        item.quantity = -1.0;
        assert!(item.validate().is_err());

        let mut item = new_item(None);
        item.unit = String::new();
        assert!(item.validate().is_err());
    }

    #[test]
    fn test_expiry_window_within_days() {
        let today = NaiveDate::from_ymd_opt(2025, 2, 25).unwrap();
        let window = ExpiryWindow::within_days(today, 7);

        assert_eq!(window.from, today);
        assert_eq!(window.to, NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
        assert_eq!(ExpiryWindow::within_days(NaiveDate::MAX, 1).to, NaiveDate::MAX);
    }

    #[test]
    fn test_pantry_item_update_validation() {
        assert!(PantryItemUpdate::default().validate().is_ok());

        let update = PantryItemUpdate {
            quantity: Some(-0.5),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}
