use chrono::NaiveDate;
use sqlx::prelude::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct PantryItemRecord {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub category: String,
    pub expiry_date: Option<NaiveDate>,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_fixtures::test_db;
    use rstest::*;
    use sqlx::SqlitePool;

    #[rstest]
    #[tokio::test]
    async fn test_pantry_item_model_compatibility(#[future] test_db: SqlitePool) {
        let pool = test_db.await;
        let expiry = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

        sqlx::query(
            "INSERT INTO pantry_items (owner_id, name, quantity, unit, category, expiry_date) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(1_i64)
        .bind("Milk")
        .bind(1.5_f64)
        .bind("l")
        .bind("dairy")
        .bind(expiry)
        .execute(&pool)
        .await
        .expect("Failed to insert pantry item");

        let item = sqlx::query_as::<_, PantryItemRecord>(
            "SELECT id, owner_id, name, quantity, unit, category, expiry_date, created_at FROM pantry_items WHERE name = ?",
        )
        .bind("Milk")
        .fetch_one(&pool)
        .await
        .expect("Failed to fetch pantry item");

        assert_eq!(item.owner_id, 1);
        assert_eq!(item.quantity, 1.5);
        assert_eq!(item.unit, "l");
        assert_eq!(item.category, "dairy");
        assert_eq!(item.expiry_date, Some(expiry));
    }
}
