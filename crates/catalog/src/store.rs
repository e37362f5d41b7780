//! Catalog storage boundary.
//!
//! The catalog needs exactly one thing from its backing store: a transaction
//! handle through which the family, attribute and variant tables can be read
//! and written as one unit. Single-statement operations that need no
//! transaction (listings, point lookups, flag flips) live on the storage
//! handle itself.
//!
//! ## Transaction semantics
//!
//! - Writes made through a `CatalogTx` are invisible to other readers until
//!   `commit` returns `Ok`.
//! - `rollback` discards every write of the transaction. Dropping an
//!   uncommitted transaction must have the same effect.
//! - Reads through a `CatalogTx` observe the transaction's own writes.

use std::sync::Arc;

use async_trait::async_trait;

use storefront_core::{CategoryId, FamilyId, VariantId};

use crate::error::CatalogResult;
use crate::model::{
    Category, FamilySummary, NewFamily, NewVariant, ProductFamily, SpecificationAttribute, Variant,
};

/// One open catalog transaction.
#[async_trait]
pub trait CatalogTx: Send {
    /// Insert a family row and return its store-assigned id.
    ///
    /// Fails with `Encoding` if a metadata blob cannot be encoded, `Storage` if
    /// the insert is rejected and `Integrity` if it affected no row.
    async fn insert_family(&mut self, family: &NewFamily) -> CatalogResult<FamilyId>;

    /// Point lookup by primary key (`NotFound` if absent).
    async fn get_family(&mut self, family_id: FamilyId) -> CatalogResult<ProductFamily>;

    async fn insert_attribute(
        &mut self,
        family_id: FamilyId,
        kind: &str,
        value: &str,
    ) -> CatalogResult<()>;

    /// All attributes of a family, in insertion order.
    async fn list_attributes(
        &mut self,
        family_id: FamilyId,
    ) -> CatalogResult<Vec<SpecificationAttribute>>;

    async fn insert_variant(
        &mut self,
        family_id: FamilyId,
        variant: &NewVariant,
    ) -> CatalogResult<VariantId>;

    /// All variants of a family, in insertion order.
    async fn list_variants(&mut self, family_id: FamilyId) -> CatalogResult<Vec<Variant>>;

    async fn commit(self) -> CatalogResult<()>;

    async fn rollback(self) -> CatalogResult<()>;
}

/// Transaction-capable catalog storage handle.
#[async_trait]
pub trait CatalogStorage: Send + Sync {
    type Tx: CatalogTx;

    async fn begin(&self) -> CatalogResult<Self::Tx>;

    /// Active families filed under `category_id`.
    async fn list_families_by_category(
        &self,
        category_id: CategoryId,
    ) -> CatalogResult<Vec<FamilySummary>>;

    /// Active families flagged as recommended.
    async fn list_recommended_families(&self) -> CatalogResult<Vec<FamilySummary>>;

    /// Variant of `family_id` whose specification string equals `spec`.
    ///
    /// Both values are always part of the match; `NotFound` if no row matches.
    async fn find_variant(&self, family_id: FamilyId, spec: &str) -> CatalogResult<Variant>;

    /// Flip the active flag (`NotFound` if the family does not exist).
    async fn set_family_active(&self, family_id: FamilyId, active: bool) -> CatalogResult<()>;

    async fn insert_category(&self, name: &str) -> CatalogResult<CategoryId>;

    async fn list_categories(&self) -> CatalogResult<Vec<Category>>;
}

#[async_trait]
impl<S> CatalogStorage for Arc<S>
where
    S: CatalogStorage + ?Sized,
{
    type Tx = S::Tx;

    async fn begin(&self) -> CatalogResult<Self::Tx> {
        (**self).begin().await
    }

    async fn list_families_by_category(
        &self,
        category_id: CategoryId,
    ) -> CatalogResult<Vec<FamilySummary>> {
        (**self).list_families_by_category(category_id).await
    }

    async fn list_recommended_families(&self) -> CatalogResult<Vec<FamilySummary>> {
        (**self).list_recommended_families().await
    }

    async fn find_variant(&self, family_id: FamilyId, spec: &str) -> CatalogResult<Variant> {
        (**self).find_variant(family_id, spec).await
    }

    async fn set_family_active(&self, family_id: FamilyId, active: bool) -> CatalogResult<()> {
        (**self).set_family_active(family_id, active).await
    }

    async fn insert_category(&self, name: &str) -> CatalogResult<CategoryId> {
        (**self).insert_category(name).await
    }

    async fn list_categories(&self) -> CatalogResult<Vec<Category>> {
        (**self).list_categories().await
    }
}
