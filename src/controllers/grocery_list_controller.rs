use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;
use validator::Validate;

use crate::error::{MealBuddyError, Result};
use crate::grocery::{GroceryListGenerator, categorize_ingredient, summarize};
use crate::models::api::{
    CreateGroceryList, GenerateGroceryListRequest, GeneratedGroceryList, GroceryItem, GroceryList,
    GroceryListQuery, GroceryListSummary, GroceryListUpdate, Page, limit_offset,
};
use crate::models::{GroceryListItemRecord, GroceryListRecord};

/// Generate a grocery list from a meal plan and store it for the owner
#[tracing::instrument(skip(pool, request), fields(meal_plan_id = request.meal_plan_id))]
pub async fn generate_grocery_list(
    pool: &SqlitePool,
    owner_id: i64,
    request: &GenerateGroceryListRequest,
) -> Result<GeneratedGroceryList> {
    let generated = GroceryListGenerator::new(pool, pool)
        .generate(owner_id, request)
        .await?;

    let mut tx = pool.begin().await?;
    let list_id = insert_list(&mut tx, owner_id, &generated.list.name).await?;
    insert_items(&mut tx, list_id, &generated.list.items).await?;
    tx.commit().await?;

    info!(grocery_list_id = list_id, "Grocery list stored");

    Ok(GeneratedGroceryList {
        list: get_grocery_list(pool, owner_id, list_id).await?,
        ..generated
    })
}

/// Store a hand-written grocery list
///
/// Items without a category are categorized by name.
pub async fn create_grocery_list(
    pool: &SqlitePool,
    owner_id: i64,
    list: &CreateGroceryList,
) -> Result<GroceryList> {
    list.validate()?;

    let items: Vec<GroceryItem> = list
        .items
        .iter()
        .map(|item| GroceryItem {
            name: item.name.clone(),
            quantity: item.quantity,
            unit: item.unit.clone(),
            category: item
                .category
                .clone()
                .unwrap_or_else(|| categorize_ingredient(&item.name).to_string()),
            purchased: item.purchased,
        })
        .collect();

    let mut tx = pool.begin().await?;
    let list_id = insert_list(&mut tx, owner_id, &list.name).await?;
    insert_items(&mut tx, list_id, &items).await?;
    tx.commit().await?;

    get_grocery_list(pool, owner_id, list_id).await
}

pub async fn get_grocery_list(pool: &SqlitePool, owner_id: i64, list_id: i64) -> Result<GroceryList> {
    let mut conn = pool.acquire().await?;

    let record = sqlx::query_as::<_, GroceryListRecord>(
        "SELECT id, owner_id, name, status, created_at FROM grocery_lists WHERE id = ? AND owner_id = ?",
    )
    .bind(list_id)
    .bind(owner_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(MealBuddyError::GroceryListNotFound(list_id))?;

    let items = fetch_items(&mut conn, list_id).await?;

    Ok(GroceryList {
        id: record.id,
        owner_id: record.owner_id,
        name: record.name,
        items,
        status: record.status.parse()?,
        created_at: record.created_at,
    })
}

/// Page through an owner's grocery lists, newest first
pub async fn list_grocery_lists(
    pool: &SqlitePool,
    owner_id: i64,
    query: &GroceryListQuery,
) -> Result<Page<GroceryList>> {
    let status = query.status.map(|s| s.as_str());
    let (limit, offset) = limit_offset(query.page, query.limit);

    let ids: Vec<i64> = sqlx::query_scalar(
        r#"
        SELECT id
        FROM grocery_lists
        WHERE owner_id = ? AND (? IS NULL OR status = ?)
        ORDER BY created_at DESC, id DESC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(owner_id)
    .bind(status)
    .bind(status)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM grocery_lists WHERE owner_id = ? AND (? IS NULL OR status = ?)",
    )
    .bind(owner_id)
    .bind(status)
    .bind(status)
    .fetch_one(pool)
    .await?;

    let mut lists = Vec::with_capacity(ids.len());
    for id in ids {
        lists.push(get_grocery_list(pool, owner_id, id).await?);
    }

    Ok(Page::new(lists, query.page.max(1), query.limit.max(1), total))
}

/// Apply a partial update; when `items` is given it replaces the whole list
pub async fn update_grocery_list(
    pool: &SqlitePool,
    owner_id: i64,
    list_id: i64,
    update: &GroceryListUpdate,
) -> Result<GroceryList> {
    update.validate()?;

    let mut tx = pool.begin().await?;

    let updated = sqlx::query(
        r#"
        UPDATE grocery_lists
        SET name = COALESCE(?, name),
            status = COALESCE(?, status)
        WHERE id = ? AND owner_id = ?
        "#,
    )
    .bind(&update.name)
    .bind(update.status.map(|s| s.as_str()))
    .bind(list_id)
    .bind(owner_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if updated == 0 {
        return Err(MealBuddyError::GroceryListNotFound(list_id));
    }

    if let Some(items) = &update.items {
        sqlx::query("DELETE FROM grocery_list_items WHERE grocery_list_id = ?")
            .bind(list_id)
            .execute(&mut *tx)
            .await?;
        insert_items(&mut tx, list_id, items).await?;
    }

    tx.commit().await?;

    get_grocery_list(pool, owner_id, list_id).await
}

/// Check or uncheck the item at `index` (0-based list position)
pub async fn set_item_purchased(
    pool: &SqlitePool,
    owner_id: i64,
    list_id: i64,
    index: usize,
    purchased: bool,
) -> Result<GroceryList> {
    let owned: Option<i64> =
        sqlx::query_scalar("SELECT id FROM grocery_lists WHERE id = ? AND owner_id = ?")
            .bind(list_id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await?;
    if owned.is_none() {
        return Err(MealBuddyError::GroceryListNotFound(list_id));
    }

    let position = i64::try_from(index)
        .map_err(|_| MealBuddyError::ItemIndexOutOfRange { list_id, index })?;

    let updated = sqlx::query(
        "UPDATE grocery_list_items SET purchased = ? WHERE grocery_list_id = ? AND position = ?",
    )
    .bind(purchased)
    .bind(list_id)
    .bind(position)
    .execute(pool)
    .await?
    .rows_affected();

    if updated == 0 {
        return Err(MealBuddyError::ItemIndexOutOfRange { list_id, index });
    }

    get_grocery_list(pool, owner_id, list_id).await
}

pub async fn delete_grocery_list(pool: &SqlitePool, owner_id: i64, list_id: i64) -> Result<()> {
    let deleted = sqlx::query("DELETE FROM grocery_lists WHERE id = ? AND owner_id = ?")
        .bind(list_id)
        .bind(owner_id)
        .execute(pool)
        .await?
        .rows_affected();

    if deleted == 0 {
        return Err(MealBuddyError::GroceryListNotFound(list_id));
    }

    Ok(())
}

pub async fn grocery_list_summary(
    pool: &SqlitePool,
    owner_id: i64,
    list_id: i64,
) -> Result<GroceryListSummary> {
    let list = get_grocery_list(pool, owner_id, list_id).await?;
    Ok(summarize(&list))
}

async fn insert_list(conn: &mut SqliteConnection, owner_id: i64, name: &str) -> Result<i64> {
    let list_id = sqlx::query("INSERT INTO grocery_lists (owner_id, name) VALUES (?, ?)")
        .bind(owner_id)
        .bind(name)
        .execute(&mut *conn)
        .await?
        .last_insert_rowid();

    Ok(list_id)
}

async fn insert_items(conn: &mut SqliteConnection, list_id: i64, items: &[GroceryItem]) -> Result<()> {
    for (position, item) in items.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO grocery_list_items
                (grocery_list_id, position, name, quantity, unit, category, purchased)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(list_id)
        .bind(position as i64)
        .bind(&item.name)
        .bind(item.quantity)
        .bind(&item.unit)
        .bind(&item.category)
        .bind(item.purchased)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

async fn fetch_items(conn: &mut SqliteConnection, list_id: i64) -> Result<Vec<GroceryItem>> {
    let items = sqlx::query_as::<_, GroceryListItemRecord>(
        r#"
        SELECT id, grocery_list_id, position, name, quantity, unit, category, purchased
        FROM grocery_list_items
        WHERE grocery_list_id = ?
        ORDER BY position
        "#,
    )
    .bind(list_id)
    .fetch_all(&mut *conn)
    .await?
    .into_iter()
    .map(|row| GroceryItem {
        name: row.name,
        quantity: row.quantity,
        unit: row.unit,
        category: row.category,
        purchased: row.purchased,
    })
    .collect();

    Ok(items)
}
