use serde::Serialize;
use sqlx::prelude::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RecipeRecord {
    pub id: i64,
    pub name: String,
    pub instructions: Option<String>,
    pub servings: Option<i64>,
    pub created_at: String,
}
