use std::str::FromStr;

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::Row;

use shoplist_core::domain::item::normalize_name;

use crate::connection::DbPool;
use crate::repositories::RepositoryError;

#[derive(Debug, Clone, Copy)]
struct SeedItem {
    code: &'static str,
    name: &'static str,
    price: &'static str,
}

#[derive(Debug, Clone, Copy)]
struct SeedList {
    code: &'static str,
    name: &'static str,
    items: &'static [&'static str],
}

/// Every code referenced by the builtin rule table, plus a few prefix-search
/// neighbours.
const SEED_ITEMS: &[SeedItem] = &[
    SeedItem { code: "item124545", name: "Coffee", price: "7.49" },
    SeedItem { code: "item124546", name: "Pasta", price: "1.89" },
    SeedItem { code: "item124547", name: "Tomato sauce", price: "2.39" },
    SeedItem { code: "item124548", name: "Tortilla chips", price: "2.99" },
    SeedItem { code: "item124549", name: "Ground beef", price: "6.80" },
    SeedItem { code: "item1245460", name: "Milk", price: "1.29" },
    SeedItem { code: "item1245461", name: "Parmesan", price: "4.50" },
    SeedItem { code: "item1245462", name: "Basil", price: "1.10" },
    SeedItem { code: "item1245463", name: "Sugar", price: "0.99" },
    SeedItem { code: "item1245464", name: "Salsa", price: "2.79" },
    SeedItem { code: "item1245465", name: "Guacamole", price: "3.49" },
    SeedItem { code: "item1245466", name: "Onions", price: "0.89" },
    SeedItem { code: "item1245467", name: "Garlic", price: "0.59" },
    SeedItem { code: "item1245468", name: "Milkshake", price: "2.20" },
    SeedItem { code: "item1245469", name: "Millet", price: "3.15" },
];

const SEED_LISTS: &[SeedList] = &[
    SeedList {
        code: CatalogSeed::PASTA_LIST_CODE,
        name: "Pasta night",
        items: &["item124546", "item124547"],
    },
    SeedList { code: "shplst1000002", name: "Breakfast", items: &["item124545", "item1245460"] },
    SeedList { code: "shplst1000003", name: "Game day", items: &["item124548"] },
];

/// Deterministic demo catalog: the items behind the builtin rule table and a
/// handful of shopping lists that trigger those rules.
pub struct CatalogSeed;

impl CatalogSeed {
    pub const PASTA_LIST_CODE: &'static str = "shplst1000001";

    /// Inserts the demo catalog. Rows that already exist are left untouched, so
    /// loading twice is a no-op.
    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let mut tx = pool.begin().await?;
        let now = Utc::now().to_rfc3339();
        let mut items_inserted = 0;
        let mut lists_inserted = 0;

        for item in SEED_ITEMS {
            let price = Decimal::from_str(item.price)
                .map_err(|e| RepositoryError::Decode(format!("seed price `{}`: {e}", item.price)))?;
            let result = sqlx::query(
                "INSERT INTO item (
                     code, name, name_normalized, price, active, deleted, bought,
                     created_at, updated_at
                 )
                 VALUES (?, ?, ?, ?, 1, 0, 0, ?, ?)
                 ON CONFLICT(code) DO NOTHING",
            )
            .bind(item.code)
            .bind(item.name)
            .bind(normalize_name(item.name))
            .bind(price.to_string())
            .bind(&now)
            .bind(&now)
            .execute(&mut *tx)
            .await?;
            items_inserted += result.rows_affected();
        }

        for list in SEED_LISTS {
            let result = sqlx::query(
                "INSERT INTO shopping_list (code, name, deleted, created_at, updated_at)
                 VALUES (?, ?, 0, ?, ?)
                 ON CONFLICT(code) DO NOTHING",
            )
            .bind(list.code)
            .bind(list.name)
            .bind(&now)
            .bind(&now)
            .execute(&mut *tx)
            .await?;
            if result.rows_affected() == 0 {
                continue;
            }
            lists_inserted += 1;

            for (position, item_code) in list.items.iter().enumerate() {
                sqlx::query(
                    "INSERT INTO shopping_list_item (
                         shopping_list_code, position, item_code, quantity
                     )
                     VALUES (?, ?, ?, 1)",
                )
                .bind(list.code)
                .bind(position as i64)
                .bind(*item_code)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        Ok(SeedResult {
            items_inserted,
            lists_inserted,
            item_codes: SEED_ITEMS.iter().map(|item| item.code).collect(),
            list_codes: SEED_LISTS.iter().map(|list| list.code).collect(),
        })
    }

    /// Checks that every seeded row is present with its expected entries.
    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let mut checks = Vec::new();

        for item in SEED_ITEMS {
            let present = sqlx::query("SELECT 1 FROM item WHERE code = ?")
                .bind(item.code)
                .fetch_optional(pool)
                .await?
                .is_some();
            checks.push((item.code, present));
        }

        for list in SEED_LISTS {
            let rows = sqlx::query(
                "SELECT item_code FROM shopping_list_item
                 WHERE shopping_list_code = ?
                 ORDER BY position",
            )
            .bind(list.code)
            .fetch_all(pool)
            .await?;
            let codes = rows
                .iter()
                .map(|row| {
                    row.try_get::<String, _>("item_code")
                        .map_err(|e| RepositoryError::Decode(e.to_string()))
                })
                .collect::<Result<Vec<_>, _>>()?;
            let matches = codes.len() == list.items.len()
                && codes
                    .iter()
                    .zip(list.items)
                    .all(|(actual, expected)| actual.as_str() == *expected);
            checks.push((list.code, matches));
        }

        let all_present = checks.iter().all(|(_, ok)| *ok);
        Ok(VerificationResult { all_present, checks })
    }
}

#[derive(Debug)]
pub struct SeedResult {
    pub items_inserted: u64,
    pub lists_inserted: u64,
    pub item_codes: Vec<&'static str>,
    pub list_codes: Vec<&'static str>,
}

#[derive(Debug)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}
