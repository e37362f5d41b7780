//! `cart_lines` table.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use tracing::instrument;

use storefront_cart::{CartError, CartLine, CartResult, CartStore, NewCartLine};
use storefront_core::{CartLineId, FamilyId, UserId, VariantId};

use super::cart_storage_error;

const INSERT_LINE: &str = r#"
INSERT INTO cart_lines (user_id, sku_id, spu_id, count, active, created_at)
VALUES (?, ?, ?, ?, 1, ?)
"#;

const LIST_LINES: &str = r#"
SELECT id, user_id, sku_id, spu_id, count, active, created_at
FROM cart_lines
WHERE user_id = ? AND active = 1
ORDER BY id ASC
"#;

#[derive(Debug, Clone)]
pub struct SqliteCartStore {
    pool: SqlitePool,
}

impl SqliteCartStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CartStore for SqliteCartStore {
    #[instrument(skip(self, line), fields(user_id = user_id.get(), sku_id = line.variant_id.get()), err)]
    async fn add_line(&self, user_id: UserId, line: &NewCartLine) -> CartResult<CartLineId> {
        let result = sqlx::query(INSERT_LINE)
            .bind(user_id.get())
            .bind(line.variant_id.get())
            .bind(line.family_id.get())
            .bind(line.count)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| cart_storage_error("add_cart_line", e))?;

        if result.rows_affected() == 0 {
            return Err(CartError::Integrity("add_cart_line affected 0 rows".into()));
        }
        Ok(CartLineId::new(result.last_insert_rowid()))
    }

    #[instrument(skip(self), fields(user_id = user_id.get()), err)]
    async fn list_lines(&self, user_id: UserId) -> CartResult<Vec<CartLine>> {
        let rows = sqlx::query(LIST_LINES)
            .bind(user_id.get())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| cart_storage_error("list_cart_lines", e))?;

        rows.iter()
            .map(line_from_row)
            .collect::<Result<_, _>>()
            .map_err(|e| cart_storage_error("list_cart_lines", e))
    }
}

fn line_from_row(row: &SqliteRow) -> Result<CartLine, sqlx::Error> {
    Ok(CartLine {
        id: CartLineId::new(row.try_get("id")?),
        user_id: UserId::new(row.try_get("user_id")?),
        variant_id: VariantId::new(row.try_get("sku_id")?),
        family_id: FamilyId::new(row.try_get("spu_id")?),
        count: row.try_get("count")?,
        active: row.try_get("active")?,
        created_at: row.try_get("created_at")?,
    })
}
