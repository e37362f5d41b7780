//! Catalog aggregate service.
//!
//! `CatalogService` composes the family, attribute and variant stores behind
//! one transaction boundary:
//!
//! ```text
//! create_family(request)
//!   begin
//!   insert family          -> family_id
//!   insert attribute *     (request order)
//!   insert variant *       (request order)
//!   commit | rollback      (first error returned unchanged)
//! ```
//!
//! Readers never observe a family without its attributes, or attributes and
//! variants without their family.

use tracing::{Span, instrument, warn};

use storefront_core::{CategoryId, FamilyId, VariantId};

use crate::error::{CatalogError, CatalogResult};
use crate::model::{Category, CreateFamilyRequest, FamilyDetail, FamilySummary, NewVariant, Variant};
use crate::store::{CatalogStorage, CatalogTx};

#[derive(Debug, Clone)]
pub struct CatalogService<S> {
    store: S,
}

impl<S> CatalogService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

/// Roll back `tx` and hand back the error that caused it.
///
/// A rollback failure is logged; the caller always sees the original error.
async fn abort<Tx, T>(tx: Tx, operation: &'static str, err: CatalogError) -> CatalogResult<T>
where
    Tx: CatalogTx,
{
    if let Err(rollback_err) = tx.rollback().await {
        warn!(operation, error = %rollback_err, "rollback failed");
    }
    Err(err)
}

impl<S> CatalogService<S>
where
    S: CatalogStorage,
{
    /// Create a family with its attributes and variants as one unit.
    #[instrument(
        skip(self, request),
        fields(attributes = request.spec.len(), variants = request.sku.len(), family_id),
        err
    )]
    pub async fn create_family(&self, request: &CreateFamilyRequest) -> CatalogResult<FamilyId> {
        let mut tx = self.store.begin().await?;

        let family_id = match tx.insert_family(&request.family).await {
            Ok(id) => id,
            Err(e) => return abort(tx, "create_family", e).await,
        };
        Span::current().record("family_id", family_id.get());

        for attribute in &request.spec {
            if let Err(e) = tx
                .insert_attribute(family_id, &attribute.kind, &attribute.value)
                .await
            {
                return abort(tx, "create_family", e).await;
            }
        }

        for variant in &request.sku {
            if let Err(e) = tx.insert_variant(family_id, variant).await {
                return abort(tx, "create_family", e).await;
            }
        }

        tx.commit().await?;
        Ok(family_id)
    }

    /// Family with its attributes and variants, read inside one transaction.
    #[instrument(skip(self), fields(family_id = family_id.get()), err)]
    pub async fn get_family_detail(&self, family_id: FamilyId) -> CatalogResult<FamilyDetail> {
        let mut tx = self.store.begin().await?;

        let family = match tx.get_family(family_id).await {
            Ok(f) => f,
            Err(e) => return abort(tx, "get_family_detail", e).await,
        };
        let spec = match tx.list_attributes(family_id).await {
            Ok(a) => a,
            Err(e) => return abort(tx, "get_family_detail", e).await,
        };
        let sku = match tx.list_variants(family_id).await {
            Ok(v) => v,
            Err(e) => return abort(tx, "get_family_detail", e).await,
        };

        tx.commit().await?;
        Ok(FamilyDetail { family, spec, sku })
    }

    /// Attach variants to an existing family, all or nothing.
    #[instrument(skip(self, variants), fields(family_id = family_id.get(), variants = variants.len()), err)]
    pub async fn add_variants(
        &self,
        family_id: FamilyId,
        variants: &[NewVariant],
    ) -> CatalogResult<Vec<VariantId>> {
        let mut tx = self.store.begin().await?;

        if let Err(e) = tx.get_family(family_id).await {
            return abort(tx, "add_variants", e).await;
        }

        let mut ids = Vec::with_capacity(variants.len());
        for variant in variants {
            match tx.insert_variant(family_id, variant).await {
                Ok(id) => ids.push(id),
                Err(e) => return abort(tx, "add_variants", e).await,
            }
        }

        tx.commit().await?;
        Ok(ids)
    }

    pub async fn list_families_by_category(
        &self,
        category_id: CategoryId,
    ) -> CatalogResult<Vec<FamilySummary>> {
        self.store.list_families_by_category(category_id).await
    }

    pub async fn list_recommended_families(&self) -> CatalogResult<Vec<FamilySummary>> {
        self.store.list_recommended_families().await
    }

    pub async fn find_variant(&self, family_id: FamilyId, spec: &str) -> CatalogResult<Variant> {
        self.store.find_variant(family_id, spec).await
    }

    #[instrument(skip(self), fields(family_id = family_id.get()), err)]
    pub async fn set_family_active(&self, family_id: FamilyId, active: bool) -> CatalogResult<()> {
        self.store.set_family_active(family_id, active).await
    }

    #[instrument(skip(self), err)]
    pub async fn create_category(&self, name: &str) -> CatalogResult<CategoryId> {
        self.store.insert_category(name).await
    }

    pub async fn list_categories(&self) -> CatalogResult<Vec<Category>> {
        self.store.list_categories().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::Utc;

    use super::*;
    use crate::model::{NewFamily, ProductFamily, SpecificationAttribute};
    use crate::blob::MetadataBlob;

    /// Records the calls a transaction receives; fails the attribute insert at
    /// `fail_attribute_at` (0-based) and any variant whose spec equals
    /// `reject_variant` when set.
    #[derive(Default)]
    struct Journal {
        calls: Vec<String>,
        fail_attribute_at: Option<usize>,
        reject_variant: Option<String>,
        family_exists: bool,
    }

    #[derive(Clone, Default)]
    struct RecordingStore {
        journal: Arc<Mutex<Journal>>,
    }

    struct RecordingTx {
        journal: Arc<Mutex<Journal>>,
        attributes_seen: usize,
    }

    impl RecordingStore {
        fn calls(&self) -> Vec<String> {
            self.journal.lock().unwrap().calls.clone()
        }
    }

    impl RecordingTx {
        fn log(&self, call: impl Into<String>) {
            self.journal.lock().unwrap().calls.push(call.into());
        }
    }

    fn family_row(id: FamilyId) -> ProductFamily {
        let null = MetadataBlob::encode(&serde_json::Value::Null).unwrap();
        ProductFamily {
            id,
            category_id: None,
            title: "Mug".into(),
            production_code: String::new(),
            standard_code: String::new(),
            inventory: 0,
            price: 1.0,
            shelf_life: null.clone(),
            images: null.clone(),
            detail_images: null,
            recommend: false,
            active: true,
            created_at: Utc::now(),
        }
    }

    #[async_trait]
    impl CatalogTx for RecordingTx {
        async fn insert_family(&mut self, _family: &NewFamily) -> CatalogResult<FamilyId> {
            self.log("insert_family");
            Ok(FamilyId::new(7))
        }

        async fn get_family(&mut self, family_id: FamilyId) -> CatalogResult<ProductFamily> {
            self.log("get_family");
            if self.journal.lock().unwrap().family_exists {
                Ok(family_row(family_id))
            } else {
                Err(CatalogError::not_found(format!("family {family_id}")))
            }
        }

        async fn insert_attribute(
            &mut self,
            _family_id: FamilyId,
            kind: &str,
            value: &str,
        ) -> CatalogResult<()> {
            let index = self.attributes_seen;
            self.attributes_seen += 1;
            self.log(format!("insert_attribute {kind}={value}"));
            if self.journal.lock().unwrap().fail_attribute_at == Some(index) {
                return Err(CatalogError::storage("insert_attribute: rejected"));
            }
            Ok(())
        }

        async fn list_attributes(
            &mut self,
            _family_id: FamilyId,
        ) -> CatalogResult<Vec<SpecificationAttribute>> {
            self.log("list_attributes");
            Ok(Vec::new())
        }

        async fn insert_variant(
            &mut self,
            _family_id: FamilyId,
            variant: &NewVariant,
        ) -> CatalogResult<VariantId> {
            self.log(format!("insert_variant {}", variant.spec));
            if self.journal.lock().unwrap().reject_variant.as_deref() == Some(variant.spec.as_str()) {
                return Err(CatalogError::storage("insert_variant: rejected"));
            }
            Ok(VariantId::new(1))
        }

        async fn list_variants(&mut self, _family_id: FamilyId) -> CatalogResult<Vec<Variant>> {
            self.log("list_variants");
            Ok(Vec::new())
        }

        async fn commit(self) -> CatalogResult<()> {
            self.log("commit");
            Ok(())
        }

        async fn rollback(self) -> CatalogResult<()> {
            self.log("rollback");
            Ok(())
        }
    }

    #[async_trait]
    impl CatalogStorage for RecordingStore {
        type Tx = RecordingTx;

        async fn begin(&self) -> CatalogResult<RecordingTx> {
            self.journal.lock().unwrap().calls.push("begin".into());
            Ok(RecordingTx {
                journal: self.journal.clone(),
                attributes_seen: 0,
            })
        }

        async fn list_families_by_category(
            &self,
            _category_id: CategoryId,
        ) -> CatalogResult<Vec<FamilySummary>> {
            Ok(Vec::new())
        }

        async fn list_recommended_families(&self) -> CatalogResult<Vec<FamilySummary>> {
            Ok(Vec::new())
        }

        async fn find_variant(&self, family_id: FamilyId, spec: &str) -> CatalogResult<Variant> {
            Err(CatalogError::not_found(format!("variant {family_id}/{spec}")))
        }

        async fn set_family_active(&self, _family_id: FamilyId, _active: bool) -> CatalogResult<()> {
            Ok(())
        }

        async fn insert_category(&self, _name: &str) -> CatalogResult<CategoryId> {
            Ok(CategoryId::new(1))
        }

        async fn list_categories(&self) -> CatalogResult<Vec<Category>> {
            Ok(Vec::new())
        }
    }

    fn tshirt() -> CreateFamilyRequest {
        CreateFamilyRequest::new(NewFamily::titled("T-Shirt").priced(19.99))
            .with_attribute("color", "red")
            .with_attribute("size", "M")
            .with_variant(NewVariant::new("red-M", 19.99, 5))
    }

    #[tokio::test]
    async fn create_family_inserts_in_request_order_then_commits() {
        let store = RecordingStore::default();
        let service = CatalogService::new(store.clone());

        let id = service.create_family(&tshirt()).await.unwrap();

        assert_eq!(id, FamilyId::new(7));
        assert_eq!(
            store.calls(),
            vec![
                "begin",
                "insert_family",
                "insert_attribute color=red",
                "insert_attribute size=M",
                "insert_variant red-M",
                "commit",
            ]
        );
    }

    #[tokio::test]
    async fn failed_attribute_rolls_back_and_returns_original_error() {
        let store = RecordingStore::default();
        store.journal.lock().unwrap().fail_attribute_at = Some(1);
        let service = CatalogService::new(store.clone());

        let err = service.create_family(&tshirt()).await.unwrap_err();

        assert_eq!(err, CatalogError::storage("insert_attribute: rejected"));
        let calls = store.calls();
        assert_eq!(calls.last().map(String::as_str), Some("rollback"));
        assert!(!calls.iter().any(|c| c == "commit"));
        assert!(!calls.iter().any(|c| c.starts_with("insert_variant")));
    }

    #[tokio::test]
    async fn failed_variant_rolls_back_create() {
        let store = RecordingStore::default();
        store.journal.lock().unwrap().reject_variant = Some("bad".into());
        let service = CatalogService::new(store.clone());

        let request = tshirt().with_variant(NewVariant::new("bad", 1.0, 1));
        let err = service.create_family(&request).await.unwrap_err();

        assert_eq!(err, CatalogError::storage("insert_variant: rejected"));
        let calls = store.calls();
        assert_eq!(&calls[calls.len() - 2..], ["insert_variant bad", "rollback"]);
        assert!(!calls.iter().any(|c| c == "commit"));
    }

    #[tokio::test]
    async fn failed_variant_rolls_back_whole_batch() {
        let store = RecordingStore::default();
        {
            let mut journal = store.journal.lock().unwrap();
            journal.family_exists = true;
            journal.reject_variant = Some("bad".into());
        }
        let service = CatalogService::new(store.clone());

        let err = service
            .add_variants(
                FamilyId::new(4),
                &[NewVariant::new("blue", 2.0, 1), NewVariant::new("bad", 2.0, 1)],
            )
            .await
            .unwrap_err();

        assert_eq!(err, CatalogError::storage("insert_variant: rejected"));
        assert_eq!(
            store.calls(),
            vec![
                "begin",
                "get_family",
                "insert_variant blue",
                "insert_variant bad",
                "rollback",
            ]
        );
    }

    #[tokio::test]
    async fn detail_of_missing_family_is_not_found() {
        let store = RecordingStore::default();
        let service = CatalogService::new(store.clone());

        let err = service.get_family_detail(FamilyId::new(3)).await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(store.calls(), vec!["begin", "get_family", "rollback"]);
    }

    #[tokio::test]
    async fn detail_reads_family_attributes_and_variants_in_one_tx() {
        let store = RecordingStore::default();
        store.journal.lock().unwrap().family_exists = true;
        let service = CatalogService::new(store.clone());

        let detail = service.get_family_detail(FamilyId::new(3)).await.unwrap();

        assert_eq!(detail.family.id, FamilyId::new(3));
        assert!(detail.spec.is_empty());
        assert!(detail.sku.is_empty());
        assert_eq!(
            store.calls(),
            vec!["begin", "get_family", "list_attributes", "list_variants", "commit"]
        );
    }

    #[tokio::test]
    async fn add_variants_requires_existing_family() {
        let store = RecordingStore::default();
        let service = CatalogService::new(store.clone());

        let err = service
            .add_variants(FamilyId::new(9), &[NewVariant::new("blue", 2.0, 1)])
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert!(!store.calls().iter().any(|c| c.starts_with("insert_variant")));
    }
}
