//! `variants` table.

use chrono::Utc;
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::Row;
use tracing::instrument;

use storefront_catalog::{CatalogError, CatalogResult, NewVariant, Variant};
use storefront_core::{FamilyId, VariantId};

use super::catalog_storage_error;

const INSERT_VARIANT: &str = r#"
INSERT INTO variants (family_id, spec, price, stock, created_at)
VALUES (?, ?, ?, ?, ?)
"#;

// Duplicate (family_id, spec) rows are allowed; the oldest one answers.
const FIND_VARIANT: &str = r#"
SELECT id, family_id, spec, price, stock, created_at
FROM variants
WHERE family_id = ? AND spec = ?
ORDER BY id ASC
LIMIT 1
"#;

const LIST_BY_FAMILY: &str = r#"
SELECT id, family_id, spec, price, stock, created_at
FROM variants
WHERE family_id = ?
ORDER BY id ASC
"#;

#[instrument(skip(conn, variant), fields(family_id = family_id.get(), spec = %variant.spec), err)]
pub async fn insert(
    conn: &mut SqliteConnection,
    family_id: FamilyId,
    variant: &NewVariant,
) -> CatalogResult<VariantId> {
    let result = sqlx::query(INSERT_VARIANT)
        .bind(family_id.get())
        .bind(&variant.spec)
        .bind(variant.price)
        .bind(variant.stock)
        .bind(Utc::now())
        .execute(&mut *conn)
        .await
        .map_err(|e| catalog_storage_error("insert_variant", e))?;

    if result.rows_affected() == 0 {
        return Err(CatalogError::no_rows_affected("insert_variant"));
    }
    Ok(VariantId::new(result.last_insert_rowid()))
}

#[instrument(skip(conn), fields(family_id = family_id.get()), err)]
pub async fn find(
    conn: &mut SqliteConnection,
    family_id: FamilyId,
    spec: &str,
) -> CatalogResult<Variant> {
    let row = sqlx::query(FIND_VARIANT)
        .bind(family_id.get())
        .bind(spec)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| catalog_storage_error("find_variant", e))?
        .ok_or_else(|| CatalogError::not_found(format!("variant {spec:?} of family {family_id}")))?;

    variant_from_row(&row).map_err(|e| catalog_storage_error("find_variant", e))
}

pub async fn list_by_family(
    conn: &mut SqliteConnection,
    family_id: FamilyId,
) -> CatalogResult<Vec<Variant>> {
    let rows = sqlx::query(LIST_BY_FAMILY)
        .bind(family_id.get())
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| catalog_storage_error("list_variants", e))?;

    rows.iter()
        .map(variant_from_row)
        .collect::<Result<_, _>>()
        .map_err(|e| catalog_storage_error("list_variants", e))
}

fn variant_from_row(row: &SqliteRow) -> Result<Variant, sqlx::Error> {
    Ok(Variant {
        id: VariantId::new(row.try_get("id")?),
        family_id: FamilyId::new(row.try_get("family_id")?),
        spec: row.try_get("spec")?,
        price: row.try_get("price")?,
        stock: row.try_get("stock")?,
        created_at: row.try_get("created_at")?,
    })
}
