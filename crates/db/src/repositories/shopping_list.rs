use std::collections::HashSet;

use chrono::Utc;
use sqlx::Row;

use shoplist_core::domain::item::ItemCode;
use shoplist_core::domain::shopping_list::{ShoppingList, ShoppingListCode, ShoppingListItem};

use super::{retain_known_items, RepositoryError, ShoppingListRepository};
use crate::DbPool;

pub struct SqlShoppingListRepository {
    pool: DbPool,
}

impl SqlShoppingListRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_entry(row: &sqlx::sqlite::SqliteRow) -> Result<ShoppingListItem, RepositoryError> {
    let item_code: String =
        row.try_get("item_code").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let quantity: i64 =
        row.try_get("quantity").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let quantity = u32::try_from(quantity).map_err(|_| {
        RepositoryError::Decode(format!("invalid quantity {quantity} for item `{item_code}`"))
    })?;

    Ok(ShoppingListItem { item_code: ItemCode(item_code), quantity })
}

#[async_trait::async_trait]
impl ShoppingListRepository for SqlShoppingListRepository {
    async fn find_by_code(
        &self,
        code: &ShoppingListCode,
    ) -> Result<Option<ShoppingList>, RepositoryError> {
        let Some(row) = sqlx::query(
            "SELECT code, name, deleted FROM shopping_list WHERE code = ? AND deleted = 0",
        )
        .bind(&code.0)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let name: String = row.try_get("name").map_err(|e| RepositoryError::Decode(e.to_string()))?;
        let deleted: bool =
            row.try_get("deleted").map_err(|e| RepositoryError::Decode(e.to_string()))?;

        let entries = sqlx::query(
            "SELECT item_code, quantity FROM shopping_list_item
             WHERE shopping_list_code = ?
             ORDER BY position",
        )
        .bind(&code.0)
        .fetch_all(&self.pool)
        .await?;
        let items = entries.iter().map(row_to_entry).collect::<Result<Vec<_>, _>>()?;

        Ok(Some(ShoppingList { code: code.clone(), name, deleted, items }))
    }

    async fn save(&self, list: ShoppingList) -> Result<ShoppingList, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let mut known = HashSet::new();
        for entry in &list.items {
            let active = sqlx::query(
                "SELECT 1 FROM item WHERE code = ? AND active = 1 AND deleted = 0",
            )
            .bind(&entry.item_code.0)
            .fetch_optional(&mut *tx)
            .await?;
            if active.is_some() {
                known.insert(entry.item_code.clone());
            }
        }
        let list = retain_known_items(list, &known)?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO shopping_list (code, name, deleted, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(code) DO UPDATE SET
                 name = excluded.name,
                 deleted = excluded.deleted,
                 updated_at = excluded.updated_at",
        )
        .bind(&list.code.0)
        .bind(&list.name)
        .bind(list.deleted)
        .bind(&now)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM shopping_list_item WHERE shopping_list_code = ?")
            .bind(&list.code.0)
            .execute(&mut *tx)
            .await?;

        for (position, entry) in list.items.iter().enumerate() {
            sqlx::query(
                "INSERT INTO shopping_list_item (shopping_list_code, position, item_code, quantity)
                 VALUES (?, ?, ?, ?)",
            )
            .bind(&list.code.0)
            .bind(position as i64)
            .bind(&entry.item_code.0)
            .bind(i64::from(entry.quantity.max(1)))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use shoplist_core::domain::item::{Item, ItemCode};
    use shoplist_core::domain::shopping_list::{ShoppingList, ShoppingListCode, ShoppingListItem};

    use super::SqlShoppingListRepository;
    use crate::repositories::{
        ItemRepository, RepositoryError, ShoppingListRepository, SqlItemRepository,
    };
    use crate::{connect_with_settings, migrations, DbPool};

    async fn setup() -> DbPool {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");

        let items = SqlItemRepository::new(pool.clone());
        for (code, name) in [("item124546", "Pasta"), ("item124547", "Tomato sauce")] {
            items.save(Item::new(ItemCode::from(code), name, Decimal::ONE)).await.expect("item");
        }
        let mut retired = Item::new(ItemCode::from("item124548"), "Tortilla chips", Decimal::ONE);
        retired.active = false;
        items.save(retired).await.expect("item");

        pool
    }

    fn list(code: &str, items: &[&str]) -> ShoppingList {
        ShoppingList {
            code: ShoppingListCode::from(code),
            name: "Pasta night".to_string(),
            deleted: false,
            items: items
                .iter()
                .map(|code| ShoppingListItem { item_code: ItemCode::from(*code), quantity: 2 })
                .collect(),
        }
    }

    #[tokio::test]
    async fn save_and_find_keeps_entry_order() {
        let repo = SqlShoppingListRepository::new(setup().await);

        repo.save(list("shplst1", &["item124547", "item124546"])).await.expect("save");
        let found = repo.find_by_code(&ShoppingListCode::from("shplst1")).await.expect("find");

        let found = found.expect("list exists");
        assert_eq!(
            found.item_codes(),
            vec![ItemCode::from("item124547"), ItemCode::from("item124546")]
        );
        assert_eq!(found.items[0].quantity, 2);
    }

    #[tokio::test]
    async fn save_drops_unknown_and_inactive_items() {
        let repo = SqlShoppingListRepository::new(setup().await);

        let saved = repo
            .save(list("shplst1", &["item124546", "item124548", "item404"]))
            .await
            .expect("save");

        assert_eq!(saved.item_codes(), vec![ItemCode::from("item124546")]);
    }

    #[tokio::test]
    async fn save_rejects_list_without_catalog_items() {
        let repo = SqlShoppingListRepository::new(setup().await);

        let result = repo.save(list("shplst1", &["item404"])).await;

        assert!(matches!(result, Err(RepositoryError::Validation(_))));
        assert_eq!(
            repo.find_by_code(&ShoppingListCode::from("shplst1")).await.expect("find"),
            None
        );
    }

    #[tokio::test]
    async fn resave_replaces_entries() {
        let repo = SqlShoppingListRepository::new(setup().await);
        repo.save(list("shplst1", &["item124546", "item124547"])).await.expect("save");

        repo.save(list("shplst1", &["item124547"])).await.expect("resave");
        let found = repo
            .find_by_code(&ShoppingListCode::from("shplst1"))
            .await
            .expect("find")
            .expect("list exists");

        assert_eq!(found.item_codes(), vec![ItemCode::from("item124547")]);
    }

    #[tokio::test]
    async fn deleted_lists_are_not_found() {
        let repo = SqlShoppingListRepository::new(setup().await);
        let mut deleted = list("shplst1", &["item124546"]);
        deleted.deleted = true;
        repo.save(deleted).await.expect("save");

        assert_eq!(
            repo.find_by_code(&ShoppingListCode::from("shplst1")).await.expect("find"),
            None
        );
    }
}
