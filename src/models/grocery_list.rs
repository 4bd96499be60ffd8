use sqlx::prelude::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct GroceryListRecord {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub status: String,
    pub created_at: String,
}

/// A grocery list line; `position` preserves the list's item order
#[derive(Debug, Clone, FromRow)]
pub struct GroceryListItemRecord {
    pub id: i64,
    pub grocery_list_id: i64,
    pub position: i64,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub category: String,
    pub purchased: bool,
}
