use std::str::FromStr;

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::Row;

use shoplist_core::domain::item::{normalize_name, Item, ItemCode};

use super::{with_generated_code, ItemRepository, RepositoryError};
use crate::DbPool;

const ITEM_COLUMNS: &str = "code, name, price, active, deleted, bought";

pub struct SqlItemRepository {
    pool: DbPool,
}

impl SqlItemRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn row_to_item(row: &sqlx::sqlite::SqliteRow) -> Result<Item, RepositoryError> {
    let code: String = row.try_get("code").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let name: String = row.try_get("name").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let price_str: String =
        row.try_get("price").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let active: bool = row.try_get("active").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let deleted: bool =
        row.try_get("deleted").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let bought: bool = row.try_get("bought").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    let price = Decimal::from_str(&price_str).map_err(|e| {
        RepositoryError::Decode(format!("invalid price `{price_str}` for item `{code}`: {e}"))
    })?;

    Ok(Item { code: ItemCode(code), name, price, active, deleted, bought })
}

async fn upsert_item<'e, E>(executor: E, item: &Item, now: &str) -> Result<(), RepositoryError>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    sqlx::query(
        "INSERT INTO item (
             code, name, name_normalized, price, active, deleted, bought, created_at, updated_at
         )
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(code) DO UPDATE SET
             name = excluded.name,
             name_normalized = excluded.name_normalized,
             price = excluded.price,
             active = excluded.active,
             deleted = excluded.deleted,
             bought = excluded.bought,
             updated_at = excluded.updated_at",
    )
    .bind(&item.code.0)
    .bind(&item.name)
    .bind(normalize_name(&item.name))
    .bind(item.price.to_string())
    .bind(item.active)
    .bind(item.deleted)
    .bind(item.bought)
    .bind(now)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(())
}

/// Escapes LIKE wildcards so the prefix matches literally.
fn like_prefix_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for ch in prefix.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[async_trait::async_trait]
impl ItemRepository for SqlItemRepository {
    async fn find_by_code(&self, code: &ItemCode) -> Result<Option<Item>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {ITEM_COLUMNS} FROM item WHERE code = ?"))
            .bind(&code.0)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(ref r) => Ok(Some(row_to_item(r)?)),
            None => Ok(None),
        }
    }

    async fn find_all(&self) -> Result<Vec<Item>, RepositoryError> {
        let rows = sqlx::query(&format!("SELECT {ITEM_COLUMNS} FROM item ORDER BY code"))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_item).collect::<Result<Vec<_>, _>>()
    }

    async fn find_by_codes_in(&self, codes: &[ItemCode]) -> Result<Vec<Item>, RepositoryError> {
        if codes.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; codes.len()].join(", ");
        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM item
             WHERE active = 1 AND deleted = 0 AND code IN ({placeholders})
             ORDER BY code"
        );
        let mut query = sqlx::query(&sql);
        for code in codes {
            query = query.bind(&code.0);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(row_to_item).collect::<Result<Vec<_>, _>>()
    }

    async fn find_by_prefix(
        &self,
        normalized_prefix: &str,
        limit: u32,
    ) -> Result<Vec<Item>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {ITEM_COLUMNS} FROM item
             WHERE active = 1 AND deleted = 0 AND name_normalized LIKE ? ESCAPE '\\'
             ORDER BY name_normalized, code
             LIMIT ?"
        ))
        .bind(like_prefix_pattern(normalized_prefix))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_item).collect::<Result<Vec<_>, _>>()
    }

    async fn save(&self, item: Item) -> Result<Item, RepositoryError> {
        let item = with_generated_code(item);
        upsert_item(&self.pool, &item, &Utc::now().to_rfc3339()).await?;
        Ok(item)
    }

    async fn save_all(&self, items: Vec<Item>) -> Result<Vec<Item>, RepositoryError> {
        let items: Vec<Item> = items.into_iter().map(with_generated_code).collect();
        let now = Utc::now().to_rfc3339();

        let mut tx = self.pool.begin().await?;
        for item in &items {
            upsert_item(&mut *tx, item, &now).await?;
        }
        tx.commit().await?;

        Ok(items)
    }
}
