use sqlx::prelude::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct RecipeIngredientRecord {
    pub id: i64,
    pub recipe_id: i64,
    pub name: String,
    pub amount: Option<f64>,
    pub unit: Option<String>,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_fixtures::test_db;
    use rstest::*;
    use sqlx::SqlitePool;

    async fn insert_recipe(pool: &SqlitePool, name: &str) -> i64 {
        sqlx::query("INSERT INTO recipes (name) VALUES (?)")
            .bind(name)
            .execute(pool)
            .await
            .expect("Failed to insert recipe")
            .last_insert_rowid()
    }

    #[rstest]
    #[tokio::test]
    async fn test_recipe_ingredient_model_compatibility(#[future] test_db: SqlitePool) {
        let pool = test_db.await;
        let recipe_id = insert_recipe(&pool, "Test Recipe").await;

        sqlx::query(
            "INSERT INTO recipe_ingredients (recipe_id, name, amount, unit) VALUES (?, ?, ?, ?)",
        )
        .bind(recipe_id)
        .bind("Tomato")
        .bind(2.5_f64)
        .bind("kg")
        .execute(&pool)
        .await
        .expect("Failed to insert recipe_ingredient");

        let ingredient = sqlx::query_as::<_, RecipeIngredientRecord>(
            "SELECT id, recipe_id, name, amount, unit, created_at FROM recipe_ingredients WHERE recipe_id = ?",
        )
        .bind(recipe_id)
        .fetch_one(&pool)
        .await
        .expect("Failed to fetch recipe_ingredient");

        assert_eq!(ingredient.recipe_id, recipe_id);
        assert_eq!(ingredient.name, "Tomato");
        assert_eq!(ingredient.amount, Some(2.5));
        assert_eq!(ingredient.unit, Some("kg".to_string()));
        assert!(ingredient.id > 0);
        assert!(!ingredient.created_at.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn test_recipe_ingredient_model_null_amount_and_unit(#[future] test_db: SqlitePool) {
        let pool = test_db.await;
        let recipe_id = insert_recipe(&pool, "Salted Water").await;

        sqlx::query("INSERT INTO recipe_ingredients (recipe_id, name) VALUES (?, ?)")
            .bind(recipe_id)
            .bind("salt")
            .execute(&pool)
            .await
            .expect("Failed to insert recipe_ingredient");

        let ingredient = sqlx::query_as::<_, RecipeIngredientRecord>(
            "SELECT id, recipe_id, name, amount, unit, created_at FROM recipe_ingredients WHERE recipe_id = ?",
        )
        .bind(recipe_id)
        .fetch_one(&pool)
        .await
        .expect("Failed to fetch recipe_ingredient");

        assert_eq!(ingredient.amount, None);
        assert_eq!(ingredient.unit, None);
    }
}
