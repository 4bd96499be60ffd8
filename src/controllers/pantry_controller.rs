use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};
use validator::Validate;

use crate::error::{MealBuddyError, Result};
use crate::grocery::{PantryStore, categorize_ingredient};
use crate::models::PantryItemRecord;
use crate::models::api::{
    CategoryCount, ExpiringPantryItems, ExpiryWindow, NewPantryItem, Page, PantryAddOutcome,
    PantryCategoryStats, PantryItem, PantryItemUpdate, PantryListing, PantryQuery, PantryStats,
    PantryStock, limit_offset,
};

const PANTRY_COLUMNS: &str =
    "id, owner_id, name, quantity, unit, category, expiry_date, created_at";

// binds: category twice, window start twice, window end twice
const LISTING_FILTER: &str = "(? IS NULL OR category = ?) \
    AND (? IS NULL OR expiry_date >= ?) \
    AND (? IS NULL OR expiry_date <= ?)";

/// Add stock to the pantry
///
/// An existing item with the same name (ignoring case) and unit is topped up
/// instead of duplicated; a given category or expiry date replaces the
/// stored one. New items without a category are categorized by name.
#[tracing::instrument(skip(pool, item), fields(name = %item.name))]
pub async fn add_pantry_item(
    pool: &SqlitePool,
    owner_id: i64,
    item: &NewPantryItem,
) -> Result<(PantryItem, PantryAddOutcome)> {
    item.validate()?;

    let mut conn = pool.acquire().await?;
    upsert_pantry_item(&mut conn, owner_id, item).await
}

/// Add several items in one transaction, merging each like [`add_pantry_item`]
pub async fn bulk_add_pantry_items(
    pool: &SqlitePool,
    owner_id: i64,
    items: &[NewPantryItem],
) -> Result<usize> {
    if items.is_empty() {
        return Err(MealBuddyError::EmptyItems);
    }
    for item in items {
        item.validate()?;
    }

    let mut tx = pool.begin().await?;
    for item in items {
        upsert_pantry_item(&mut tx, owner_id, item).await?;
    }
    tx.commit().await?;

    info!(owner_id, count = items.len(), "Pantry items added");

    Ok(items.len())
}

async fn upsert_pantry_item(
    conn: &mut SqliteConnection,
    owner_id: i64,
    item: &NewPantryItem,
) -> Result<(PantryItem, PantryAddOutcome)> {
    let existing: Option<i64> = sqlx::query_scalar(
        "SELECT id FROM pantry_items WHERE owner_id = ? AND LOWER(name) = LOWER(?) AND unit = ? ORDER BY id LIMIT 1",
    )
    .bind(owner_id)
    .bind(&item.name)
    .bind(&item.unit)
    .fetch_optional(&mut *conn)
    .await?;

    if let Some(id) = existing {
        let record = sqlx::query_as::<_, PantryItemRecord>(&format!(
            r#"
            UPDATE pantry_items
            SET quantity = quantity + ?,
                category = COALESCE(?, category),
                expiry_date = COALESCE(?, expiry_date)
            WHERE id = ?
            RETURNING {PANTRY_COLUMNS}
            "#
        ))
        .bind(item.quantity)
        .bind(&item.category)
        .bind(item.expiry_date)
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;

        debug!(pantry_item_id = id, quantity = record.quantity, "Pantry item topped up");

        return Ok((record.into(), PantryAddOutcome::Merged));
    }

    let category = item
        .category
        .clone()
        .unwrap_or_else(|| categorize_ingredient(&item.name).to_string());

    let record = sqlx::query_as::<_, PantryItemRecord>(&format!(
        r#"
        INSERT INTO pantry_items (owner_id, name, quantity, unit, category, expiry_date)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING {PANTRY_COLUMNS}
        "#
    ))
    .bind(owner_id)
    .bind(&item.name)
    .bind(item.quantity)
    .bind(&item.unit)
    .bind(&category)
    .bind(item.expiry_date)
    .fetch_one(&mut *conn)
    .await?;

    debug!(pantry_item_id = record.id, "Pantry item created");

    Ok((record.into(), PantryAddOutcome::Created))
}

pub async fn get_pantry_item(pool: &SqlitePool, owner_id: i64, id: i64) -> Result<PantryItem> {
    let record = sqlx::query_as::<_, PantryItemRecord>(&format!(
        "SELECT {PANTRY_COLUMNS} FROM pantry_items WHERE id = ? AND owner_id = ?"
    ))
    .bind(id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await?
    .ok_or(MealBuddyError::PantryItemNotFound(id))?;

    Ok(record.into())
}

/// Apply a partial update to a pantry item
pub async fn update_pantry_item(
    pool: &SqlitePool,
    owner_id: i64,
    id: i64,
    update: &PantryItemUpdate,
) -> Result<PantryItem> {
    update.validate()?;

    let record = sqlx::query_as::<_, PantryItemRecord>(&format!(
        r#"
        UPDATE pantry_items
        SET name = COALESCE(?, name),
            quantity = COALESCE(?, quantity),
            unit = COALESCE(?, unit),
            category = COALESCE(?, category),
            expiry_date = COALESCE(?, expiry_date)
        WHERE id = ? AND owner_id = ?
        RETURNING {PANTRY_COLUMNS}
        "#
    ))
    .bind(&update.name)
    .bind(update.quantity)
    .bind(&update.unit)
    .bind(&update.category)
    .bind(update.expiry_date)
    .bind(id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await?
    .ok_or(MealBuddyError::PantryItemNotFound(id))?;

    Ok(record.into())
}

pub async fn delete_pantry_item(pool: &SqlitePool, owner_id: i64, id: i64) -> Result<()> {
    let deleted = sqlx::query("DELETE FROM pantry_items WHERE id = ? AND owner_id = ?")
        .bind(id)
        .bind(owner_id)
        .execute(pool)
        .await?
        .rows_affected();

    if deleted == 0 {
        return Err(MealBuddyError::PantryItemNotFound(id));
    }

    Ok(())
}

/// Page through an owner's pantry, soonest expiry first, undated items last
///
/// The listing also carries per-category item counts over the whole pantry.
pub async fn list_pantry_items(
    pool: &SqlitePool,
    owner_id: i64,
    query: &PantryQuery,
) -> Result<PantryListing> {
    let category = query.category.as_deref().filter(|c| *c != "all");
    let from = query.expiring.map(|window| window.from);
    let to = query.expiring.map(|window| window.to);
    let (limit, offset) = limit_offset(query.page, query.limit);

    let records = sqlx::query_as::<_, PantryItemRecord>(&format!(
        r#"
        SELECT {PANTRY_COLUMNS}
        FROM pantry_items
        WHERE owner_id = ? AND {LISTING_FILTER}
        ORDER BY expiry_date IS NULL, expiry_date, name
        LIMIT ? OFFSET ?
        "#
    ))
    .bind(owner_id)
    .bind(category)
    .bind(category)
    .bind(from)
    .bind(from)
    .bind(to)
    .bind(to)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total: i64 = sqlx::query_scalar(&format!(
        "SELECT COUNT(*) FROM pantry_items WHERE owner_id = ? AND {LISTING_FILTER}"
    ))
    .bind(owner_id)
    .bind(category)
    .bind(category)
    .bind(from)
    .bind(from)
    .bind(to)
    .bind(to)
    .fetch_one(pool)
    .await?;

    let category_summary = sqlx::query_as::<_, (String, i64)>(
        r#"
        SELECT category, COUNT(*)
        FROM pantry_items
        WHERE owner_id = ?
        GROUP BY category
        ORDER BY category
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(|(category, item_count)| CategoryCount {
        category,
        item_count,
    })
    .collect();

    Ok(PantryListing {
        page: Page::new(
            records.into_iter().map(PantryItem::from).collect(),
            query.page.max(1),
            query.limit.max(1),
            total,
        ),
        category_summary,
    })
}

/// Totals for an owner's pantry: item count, expiry alerts and a per-category
/// breakdown of item count and summed quantity
///
/// Items with an empty category are reported under "other".
#[tracing::instrument(skip(pool))]
pub async fn get_pantry_stats(
    pool: &SqlitePool,
    owner_id: i64,
    today: NaiveDate,
    days: u32,
) -> Result<PantryStats> {
    let window = ExpiryWindow::within_days(today, days);

    let (total_items, expiring_items, expired_items): (i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT
            COUNT(*),
            COUNT(CASE WHEN expiry_date >= ? AND expiry_date <= ? THEN 1 END),
            COUNT(CASE WHEN expiry_date < ? THEN 1 END)
        FROM pantry_items
        WHERE owner_id = ?
        "#,
    )
    .bind(window.from)
    .bind(window.to)
    .bind(today)
    .bind(owner_id)
    .fetch_one(pool)
    .await?;

    let category_breakdown = sqlx::query_as::<_, (String, i64, f64)>(
        r#"
        SELECT
            COALESCE(NULLIF(category, ''), 'other') AS bucket,
            COUNT(*),
            COALESCE(SUM(quantity), 0.0)
        FROM pantry_items
        WHERE owner_id = ?
        GROUP BY bucket
        ORDER BY bucket
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(|(category, item_count, total_quantity)| PantryCategoryStats {
        category,
        item_count,
        total_quantity,
    })
    .collect();

    Ok(PantryStats {
        total_items,
        expiring_items,
        expired_items,
        category_breakdown,
    })
}

/// Current stock in insertion order, the order grocery exclusion matches in
pub async fn get_pantry_stock(pool: &SqlitePool, owner_id: i64) -> Result<Vec<PantryStock>> {
    let stock = sqlx::query_as::<_, (String, f64, String)>(
        "SELECT name, quantity, unit FROM pantry_items WHERE owner_id = ? ORDER BY id",
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(|(name, quantity, unit)| PantryStock::new(name, quantity, unit))
    .collect();

    Ok(stock)
}

/// Take `quantity` out of a pantry item
///
/// Returns the remaining item, or `None` once it is used up and removed.
pub async fn use_pantry_item(
    pool: &SqlitePool,
    owner_id: i64,
    id: i64,
    quantity: f64,
) -> Result<Option<PantryItem>> {
    // also rejects NaN
    if !(quantity > 0.0) {
        return Err(MealBuddyError::InvalidQuantity(quantity));
    }

    let mut tx = pool.begin().await?;

    let on_hand: f64 =
        sqlx::query_scalar("SELECT quantity FROM pantry_items WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(MealBuddyError::PantryItemNotFound(id))?;

    let remaining = (on_hand - quantity).max(0.0);

    if remaining == 0.0 {
        sqlx::query("DELETE FROM pantry_items WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!(pantry_item_id = id, "Pantry item used up and removed");
        return Ok(None);
    }

    let record = sqlx::query_as::<_, PantryItemRecord>(&format!(
        "UPDATE pantry_items SET quantity = ? WHERE id = ? RETURNING {PANTRY_COLUMNS}"
    ))
    .bind(remaining)
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(Some(record.into()))
}

/// Items expiring within `days` of `today` (inclusive) and items already expired
pub async fn get_expiring_pantry_items(
    pool: &SqlitePool,
    owner_id: i64,
    today: NaiveDate,
    days: u32,
) -> Result<ExpiringPantryItems> {
    let window = ExpiryWindow::within_days(today, days);

    let expiring = sqlx::query_as::<_, PantryItemRecord>(&format!(
        r#"
        SELECT {PANTRY_COLUMNS}
        FROM pantry_items
        WHERE owner_id = ? AND expiry_date >= ? AND expiry_date <= ?
        ORDER BY expiry_date, name
        "#
    ))
    .bind(owner_id)
    .bind(window.from)
    .bind(window.to)
    .fetch_all(pool)
    .await?;

    let expired = sqlx::query_as::<_, PantryItemRecord>(&format!(
        r#"
        SELECT {PANTRY_COLUMNS}
        FROM pantry_items
        WHERE owner_id = ? AND expiry_date < ?
        ORDER BY expiry_date DESC, name
        "#
    ))
    .bind(owner_id)
    .bind(today)
    .fetch_all(pool)
    .await?;

    Ok(ExpiringPantryItems {
        expiring: expiring.into_iter().map(PantryItem::from).collect(),
        expired: expired.into_iter().map(PantryItem::from).collect(),
    })
}

#[async_trait]
impl PantryStore for SqlitePool {
    async fn get_pantry_stock(&self, owner_id: i64) -> Result<Vec<PantryStock>> {
        get_pantry_stock(self, owner_id).await
    }
}
