//! `attributes` table.

use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::Row;
use tracing::instrument;

use storefront_catalog::{CatalogError, CatalogResult, SpecificationAttribute};
use storefront_core::{AttributeId, FamilyId};

use super::catalog_storage_error;

const INSERT_ATTRIBUTE: &str = "INSERT INTO attributes (family_id, kind, value) VALUES (?, ?, ?)";

const LIST_BY_FAMILY: &str = r#"
SELECT id, family_id, kind, value
FROM attributes
WHERE family_id = ?
ORDER BY id ASC
"#;

#[instrument(skip(conn, value), fields(family_id = family_id.get()), err)]
pub async fn insert(
    conn: &mut SqliteConnection,
    family_id: FamilyId,
    kind: &str,
    value: &str,
) -> CatalogResult<()> {
    let result = sqlx::query(INSERT_ATTRIBUTE)
        .bind(family_id.get())
        .bind(kind)
        .bind(value)
        .execute(&mut *conn)
        .await
        .map_err(|e| catalog_storage_error("insert_attribute", e))?;

    if result.rows_affected() == 0 {
        return Err(CatalogError::no_rows_affected("insert_attribute"));
    }
    Ok(())
}

pub async fn list_by_family(
    conn: &mut SqliteConnection,
    family_id: FamilyId,
) -> CatalogResult<Vec<SpecificationAttribute>> {
    let rows = sqlx::query(LIST_BY_FAMILY)
        .bind(family_id.get())
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| catalog_storage_error("list_attributes", e))?;

    rows.iter()
        .map(attribute_from_row)
        .collect::<Result<_, _>>()
        .map_err(|e| catalog_storage_error("list_attributes", e))
}

fn attribute_from_row(row: &SqliteRow) -> Result<SpecificationAttribute, sqlx::Error> {
    Ok(SpecificationAttribute {
        id: AttributeId::new(row.try_get("id")?),
        family_id: FamilyId::new(row.try_get("family_id")?),
        kind: row.try_get("kind")?,
        value: row.try_get("value")?,
    })
}
