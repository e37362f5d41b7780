//! `categories` table.

use chrono::Utc;
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::Row;
use tracing::instrument;

use storefront_catalog::{CatalogError, CatalogResult, Category};
use storefront_core::CategoryId;

use super::catalog_storage_error;

const INSERT_CATEGORY: &str = "INSERT INTO categories (name, created_at) VALUES (?, ?)";

const LIST_CATEGORIES: &str = "SELECT id, name, created_at FROM categories ORDER BY id ASC";

/// Names are unique; a duplicate is rejected by the table as a `Storage` error.
#[instrument(skip(conn), err)]
pub async fn insert(conn: &mut SqliteConnection, name: &str) -> CatalogResult<CategoryId> {
    let result = sqlx::query(INSERT_CATEGORY)
        .bind(name)
        .bind(Utc::now())
        .execute(&mut *conn)
        .await
        .map_err(|e| catalog_storage_error("insert_category", e))?;

    if result.rows_affected() == 0 {
        return Err(CatalogError::no_rows_affected("insert_category"));
    }
    Ok(CategoryId::new(result.last_insert_rowid()))
}

pub async fn list(conn: &mut SqliteConnection) -> CatalogResult<Vec<Category>> {
    let rows = sqlx::query(LIST_CATEGORIES)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| catalog_storage_error("list_categories", e))?;

    rows.iter()
        .map(category_from_row)
        .collect::<Result<_, _>>()
        .map_err(|e| catalog_storage_error("list_categories", e))
}

fn category_from_row(row: &SqliteRow) -> Result<Category, sqlx::Error> {
    Ok(Category {
        id: CategoryId::new(row.try_get("id")?),
        name: row.try_get("name")?,
        created_at: row.try_get("created_at")?,
    })
}
