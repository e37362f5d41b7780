//! SQLite implementation of the catalog storage boundary.

use async_trait::async_trait;
use sqlx::sqlite::{Sqlite, SqlitePool};
use sqlx::Transaction;

use storefront_catalog::{
    CatalogResult, CatalogStorage, CatalogTx, Category, FamilySummary, NewFamily, NewVariant,
    ProductFamily, SpecificationAttribute, Variant,
};
use storefront_core::{CategoryId, FamilyId, VariantId};

use super::{attribute, catalog_storage_error, category, family, variant};

#[derive(Debug, Clone)]
pub struct SqliteCatalogStore {
    pool: SqlitePool,
}

impl SqliteCatalogStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Open catalog transaction. Dropping it without `commit` rolls it back.
pub struct SqliteCatalogTx {
    tx: Transaction<'static, Sqlite>,
}

#[async_trait]
impl CatalogTx for SqliteCatalogTx {
    async fn insert_family(&mut self, new: &NewFamily) -> CatalogResult<FamilyId> {
        family::insert(&mut self.tx, new).await
    }

    async fn get_family(&mut self, family_id: FamilyId) -> CatalogResult<ProductFamily> {
        family::get(&mut self.tx, family_id).await
    }

    async fn insert_attribute(
        &mut self,
        family_id: FamilyId,
        kind: &str,
        value: &str,
    ) -> CatalogResult<()> {
        attribute::insert(&mut self.tx, family_id, kind, value).await
    }

    async fn list_attributes(
        &mut self,
        family_id: FamilyId,
    ) -> CatalogResult<Vec<SpecificationAttribute>> {
        attribute::list_by_family(&mut self.tx, family_id).await
    }

    async fn insert_variant(
        &mut self,
        family_id: FamilyId,
        new: &NewVariant,
    ) -> CatalogResult<VariantId> {
        variant::insert(&mut self.tx, family_id, new).await
    }

    async fn list_variants(&mut self, family_id: FamilyId) -> CatalogResult<Vec<Variant>> {
        variant::list_by_family(&mut self.tx, family_id).await
    }

    async fn commit(self) -> CatalogResult<()> {
        self.tx
            .commit()
            .await
            .map_err(|e| catalog_storage_error("commit_transaction", e))
    }

    async fn rollback(self) -> CatalogResult<()> {
        self.tx
            .rollback()
            .await
            .map_err(|e| catalog_storage_error("rollback", e))
    }
}

#[async_trait]
impl CatalogStorage for SqliteCatalogStore {
    type Tx = SqliteCatalogTx;

    async fn begin(&self) -> CatalogResult<SqliteCatalogTx> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| catalog_storage_error("begin_transaction", e))?;
        Ok(SqliteCatalogTx { tx })
    }

    async fn list_families_by_category(
        &self,
        category_id: CategoryId,
    ) -> CatalogResult<Vec<FamilySummary>> {
        let mut conn = self.acquire("list_families_by_category").await?;
        family::list_by_category(&mut conn, category_id).await
    }

    async fn list_recommended_families(&self) -> CatalogResult<Vec<FamilySummary>> {
        let mut conn = self.acquire("list_recommended_families").await?;
        family::list_recommended(&mut conn).await
    }

    async fn find_variant(&self, family_id: FamilyId, spec: &str) -> CatalogResult<Variant> {
        let mut conn = self.acquire("find_variant").await?;
        variant::find(&mut conn, family_id, spec).await
    }

    async fn set_family_active(&self, family_id: FamilyId, active: bool) -> CatalogResult<()> {
        let mut conn = self.acquire("set_family_active").await?;
        family::set_active(&mut conn, family_id, active).await
    }

    async fn insert_category(&self, name: &str) -> CatalogResult<CategoryId> {
        let mut conn = self.acquire("insert_category").await?;
        category::insert(&mut conn, name).await
    }

    async fn list_categories(&self) -> CatalogResult<Vec<Category>> {
        let mut conn = self.acquire("list_categories").await?;
        category::list(&mut conn).await
    }
}

impl SqliteCatalogStore {
    async fn acquire(
        &self,
        operation: &str,
    ) -> CatalogResult<sqlx::pool::PoolConnection<Sqlite>> {
        self.pool
            .acquire()
            .await
            .map_err(|e| catalog_storage_error(operation, e))
    }
}
