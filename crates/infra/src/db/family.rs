//! `families` table.

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::Row;
use tracing::{Span, instrument};

use storefront_catalog::{
    CatalogError, CatalogResult, FamilySummary, MetadataBlob, NewFamily, ProductFamily,
};
use storefront_core::{CategoryId, FamilyId};

use super::catalog_storage_error;

const INSERT_FAMILY: &str = r#"
INSERT INTO families (
    category_id, title, production_code, standard_code, inventory, price,
    shelf_life, images, detail_images, recommend, active, created_at
)
VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1, ?)
"#;

const SELECT_FAMILY: &str = r#"
SELECT id, category_id, title, production_code, standard_code, inventory, price,
       shelf_life, images, detail_images, recommend, active, created_at
FROM families
WHERE id = ?
"#;

const LIST_BY_CATEGORY: &str = r#"
SELECT f.id, f.category_id, COALESCE(c.name, '') AS category_name, f.title, f.images, f.price
FROM families f
LEFT JOIN categories c ON c.id = f.category_id
WHERE f.category_id = ? AND f.active = 1
ORDER BY f.id ASC
"#;

const LIST_RECOMMENDED: &str = r#"
SELECT f.id, f.category_id, COALESCE(c.name, '') AS category_name, f.title, f.images, f.price
FROM families f
LEFT JOIN categories c ON c.id = f.category_id
WHERE f.recommend = 1 AND f.active = 1
ORDER BY f.id ASC
"#;

const UPDATE_ACTIVE: &str = "UPDATE families SET active = ? WHERE id = ?";

/// Insert one family row; blobs are encoded before anything touches the table.
#[instrument(skip(conn, family), fields(title = %family.title, family_id), err)]
pub async fn insert(conn: &mut SqliteConnection, family: &NewFamily) -> CatalogResult<FamilyId> {
    let blobs = family.encode_blobs()?;

    let result = sqlx::query(INSERT_FAMILY)
        .bind(family.category_id.map(CategoryId::get))
        .bind(&family.title)
        .bind(&family.production_code)
        .bind(&family.standard_code)
        .bind(family.inventory)
        .bind(family.price)
        .bind(blobs.shelf_life.as_str())
        .bind(blobs.images.as_str())
        .bind(blobs.detail_images.as_str())
        .bind(family.recommend)
        .bind(Utc::now())
        .execute(&mut *conn)
        .await
        .map_err(|e| catalog_storage_error("insert_family", e))?;

    if result.rows_affected() == 0 {
        return Err(CatalogError::no_rows_affected("insert_family"));
    }

    let id = FamilyId::new(result.last_insert_rowid());
    Span::current().record("family_id", id.get());
    Ok(id)
}

#[instrument(skip(conn), fields(family_id = family_id.get()), err)]
pub async fn get(conn: &mut SqliteConnection, family_id: FamilyId) -> CatalogResult<ProductFamily> {
    let row = sqlx::query(SELECT_FAMILY)
        .bind(family_id.get())
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| catalog_storage_error("get_family", e))?
        .ok_or_else(|| CatalogError::not_found(format!("family {family_id}")))?;

    family_from_row(&row).map_err(|e| catalog_storage_error("get_family", e))
}

#[instrument(skip(conn), fields(category_id = category_id.get(), count), err)]
pub async fn list_by_category(
    conn: &mut SqliteConnection,
    category_id: CategoryId,
) -> CatalogResult<Vec<FamilySummary>> {
    let rows = sqlx::query(LIST_BY_CATEGORY)
        .bind(category_id.get())
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| catalog_storage_error("list_families_by_category", e))?;

    Span::current().record("count", rows.len());
    rows.iter()
        .map(summary_from_row)
        .collect::<Result<_, _>>()
        .map_err(|e| catalog_storage_error("list_families_by_category", e))
}

#[instrument(skip(conn), fields(count), err)]
pub async fn list_recommended(conn: &mut SqliteConnection) -> CatalogResult<Vec<FamilySummary>> {
    let rows = sqlx::query(LIST_RECOMMENDED)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| catalog_storage_error("list_recommended_families", e))?;

    Span::current().record("count", rows.len());
    rows.iter()
        .map(summary_from_row)
        .collect::<Result<_, _>>()
        .map_err(|e| catalog_storage_error("list_recommended_families", e))
}

#[instrument(skip(conn), fields(family_id = family_id.get()), err)]
pub async fn set_active(
    conn: &mut SqliteConnection,
    family_id: FamilyId,
    active: bool,
) -> CatalogResult<()> {
    let result = sqlx::query(UPDATE_ACTIVE)
        .bind(active)
        .bind(family_id.get())
        .execute(&mut *conn)
        .await
        .map_err(|e| catalog_storage_error("set_family_active", e))?;

    if result.rows_affected() == 0 {
        return Err(CatalogError::not_found(format!("family {family_id}")));
    }
    Ok(())
}

fn family_from_row(row: &SqliteRow) -> Result<ProductFamily, sqlx::Error> {
    let category_id: Option<i64> = row.try_get("category_id")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    Ok(ProductFamily {
        id: FamilyId::new(row.try_get("id")?),
        category_id: category_id.map(CategoryId::new),
        title: row.try_get("title")?,
        production_code: row.try_get("production_code")?,
        standard_code: row.try_get("standard_code")?,
        inventory: row.try_get("inventory")?,
        price: row.try_get("price")?,
        shelf_life: MetadataBlob::from_stored(row.try_get::<String, _>("shelf_life")?),
        images: MetadataBlob::from_stored(row.try_get::<String, _>("images")?),
        detail_images: MetadataBlob::from_stored(row.try_get::<String, _>("detail_images")?),
        recommend: row.try_get("recommend")?,
        active: row.try_get("active")?,
        created_at,
    })
}

fn summary_from_row(row: &SqliteRow) -> Result<FamilySummary, sqlx::Error> {
    let category_id: Option<i64> = row.try_get("category_id")?;
    Ok(FamilySummary {
        id: FamilyId::new(row.try_get("id")?),
        category_id: category_id.map(CategoryId::new),
        category_name: row.try_get("category_name")?,
        title: row.try_get("title")?,
        images: MetadataBlob::from_stored(row.try_get::<String, _>("images")?),
        price: row.try_get("price")?,
    })
}
