//! Catalog behaviour shared by every storage backend.
//!
//! Each scenario is generic over `CatalogStorage`; the backend test files call
//! them with a fresh store.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use storefront_catalog::{
    CatalogError, CatalogResult, CatalogService, CatalogStorage, CatalogTx, Category,
    CreateFamilyRequest, FamilySummary, NewFamily, NewVariant, ProductFamily,
    SpecificationAttribute, Variant,
};
use storefront_core::{CategoryId, FamilyId, VariantId};

/// Storage wrapper that records the family ids its transactions assign and can
/// reject the n-th attribute insert of a transaction.
#[derive(Clone)]
pub struct RecordingStore<S> {
    inner: S,
    assigned: Arc<Mutex<Vec<FamilyId>>>,
    fail_attribute_at: Option<usize>,
}

impl<S> RecordingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            assigned: Arc::default(),
            fail_attribute_at: None,
        }
    }

    pub fn failing_attribute(mut self, index: usize) -> Self {
        self.fail_attribute_at = Some(index);
        self
    }

    pub fn assigned(&self) -> Vec<FamilyId> {
        self.assigned.lock().unwrap().clone()
    }
}

pub struct RecordingTx<T> {
    inner: T,
    assigned: Arc<Mutex<Vec<FamilyId>>>,
    fail_attribute_at: Option<usize>,
    attributes_seen: usize,
}

#[async_trait]
impl<T: CatalogTx> CatalogTx for RecordingTx<T> {
    async fn insert_family(&mut self, family: &NewFamily) -> CatalogResult<FamilyId> {
        let id = self.inner.insert_family(family).await?;
        self.assigned.lock().unwrap().push(id);
        Ok(id)
    }

    async fn get_family(&mut self, family_id: FamilyId) -> CatalogResult<ProductFamily> {
        self.inner.get_family(family_id).await
    }

    async fn insert_attribute(
        &mut self,
        family_id: FamilyId,
        kind: &str,
        value: &str,
    ) -> CatalogResult<()> {
        let index = self.attributes_seen;
        self.attributes_seen += 1;
        if self.fail_attribute_at == Some(index) {
            return Err(CatalogError::storage("insert_attribute: forced failure"));
        }
        self.inner.insert_attribute(family_id, kind, value).await
    }

    async fn list_attributes(
        &mut self,
        family_id: FamilyId,
    ) -> CatalogResult<Vec<SpecificationAttribute>> {
        self.inner.list_attributes(family_id).await
    }

    async fn insert_variant(
        &mut self,
        family_id: FamilyId,
        variant: &NewVariant,
    ) -> CatalogResult<VariantId> {
        self.inner.insert_variant(family_id, variant).await
    }

    async fn list_variants(&mut self, family_id: FamilyId) -> CatalogResult<Vec<Variant>> {
        self.inner.list_variants(family_id).await
    }

    async fn commit(self) -> CatalogResult<()> {
        self.inner.commit().await
    }

    async fn rollback(self) -> CatalogResult<()> {
        self.inner.rollback().await
    }
}

#[async_trait]
impl<S: CatalogStorage> CatalogStorage for RecordingStore<S> {
    type Tx = RecordingTx<S::Tx>;

    async fn begin(&self) -> CatalogResult<Self::Tx> {
        Ok(RecordingTx {
            inner: self.inner.begin().await?,
            assigned: self.assigned.clone(),
            fail_attribute_at: self.fail_attribute_at,
            attributes_seen: 0,
        })
    }

    async fn list_families_by_category(
        &self,
        category_id: CategoryId,
    ) -> CatalogResult<Vec<FamilySummary>> {
        self.inner.list_families_by_category(category_id).await
    }

    async fn list_recommended_families(&self) -> CatalogResult<Vec<FamilySummary>> {
        self.inner.list_recommended_families().await
    }

    async fn find_variant(&self, family_id: FamilyId, spec: &str) -> CatalogResult<Variant> {
        self.inner.find_variant(family_id, spec).await
    }

    async fn set_family_active(&self, family_id: FamilyId, active: bool) -> CatalogResult<()> {
        self.inner.set_family_active(family_id, active).await
    }

    async fn insert_category(&self, name: &str) -> CatalogResult<CategoryId> {
        self.inner.insert_category(name).await
    }

    async fn list_categories(&self) -> CatalogResult<Vec<Category>> {
        self.inner.list_categories().await
    }
}

pub fn tshirt(category_id: Option<CategoryId>) -> CreateFamilyRequest {
    let mut family = NewFamily::titled("T-Shirt").priced(19.99);
    family.category_id = category_id;
    CreateFamilyRequest::new(family)
        .with_attribute("color", "red")
        .with_attribute("size", "M")
}

fn kinds_and_values(attrs: &[SpecificationAttribute]) -> Vec<(String, String)> {
    attrs
        .iter()
        .map(|a| (a.kind.clone(), a.value.clone()))
        .collect()
}

/// Create then read back a family with two attributes.
pub async fn create_and_read_back<S: CatalogStorage>(store: S) {
    let service = CatalogService::new(store);

    let id = service.create_family(&tshirt(None)).await.unwrap();
    assert!(id.get() > 0);

    let detail = service.get_family_detail(id).await.unwrap();
    assert_eq!(detail.family.id, id);
    assert_eq!(detail.family.title, "T-Shirt");
    assert_eq!(detail.family.price, 19.99);
    assert!(detail.family.active);
    assert!(!detail.family.recommend);
    assert_eq!(
        kinds_and_values(&detail.spec),
        vec![
            ("color".to_string(), "red".to_string()),
            ("size".to_string(), "M".to_string())
        ]
    );
    assert!(detail.spec.iter().all(|a| a.family_id == id));
    assert!(detail.sku.is_empty());
}

/// A rejected second attribute leaves nothing behind.
pub async fn failed_attribute_leaves_no_family<S: CatalogStorage + Clone>(store: S) {
    let recording = RecordingStore::new(store.clone()).failing_attribute(1);
    let category = store.insert_category("Tops").await.unwrap();

    let err = CatalogService::new(recording.clone())
        .create_family(&tshirt(Some(category)))
        .await
        .unwrap_err();
    assert_eq!(err, CatalogError::storage("insert_attribute: forced failure"));

    let assigned = recording.assigned();
    assert_eq!(assigned.len(), 1);

    let service = CatalogService::new(store);
    let lookup = service.get_family_detail(assigned[0]).await.unwrap_err();
    assert!(lookup.is_not_found());
    assert!(service
        .list_families_by_category(category)
        .await
        .unwrap()
        .is_empty());
}

/// The store itself rejects an over-long attribute value; the family goes too.
pub async fn oversized_attribute_rolls_back<S: CatalogStorage + Clone>(store: S) {
    let recording = RecordingStore::new(store.clone());
    let request = CreateFamilyRequest::new(NewFamily::titled("Poster"))
        .with_attribute("size", "A2")
        .with_attribute("note", "x".repeat(101));

    let err = CatalogService::new(recording.clone())
        .create_family(&request)
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Storage(_)));

    let service = CatalogService::new(store);
    for id in recording.assigned() {
        assert!(service.get_family_detail(id).await.unwrap_err().is_not_found());
    }
}

/// An over-long variant spec aborts the whole create: no family, no variant.
pub async fn oversized_variant_rolls_back_create<S: CatalogStorage + Clone>(store: S) {
    let recording = RecordingStore::new(store.clone());
    let request = tshirt(None)
        .with_variant(NewVariant::new("red-M", 19.99, 3))
        .with_variant(NewVariant::new("x".repeat(513), 19.99, 1));

    let err = CatalogService::new(recording.clone())
        .create_family(&request)
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Storage(_)));

    let assigned = recording.assigned();
    assert_eq!(assigned.len(), 1);

    let service = CatalogService::new(store);
    assert!(service
        .get_family_detail(assigned[0])
        .await
        .unwrap_err()
        .is_not_found());
    assert!(service
        .find_variant(assigned[0], "red-M")
        .await
        .unwrap_err()
        .is_not_found());
}

/// A rejected variant in a batch discards the valid ones inserted before it.
pub async fn oversized_variant_rolls_back_batch<S: CatalogStorage>(store: S) {
    let service = CatalogService::new(store);
    let id = service
        .create_family(&tshirt(None).with_variant(NewVariant::new("red-M", 19.99, 3)))
        .await
        .unwrap();

    let err = service
        .add_variants(
            id,
            &[
                NewVariant::new("blue-L", 21.0, 2),
                NewVariant::new("x".repeat(513), 21.0, 1),
            ],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Storage(_)));

    assert!(service
        .find_variant(id, "blue-L")
        .await
        .unwrap_err()
        .is_not_found());
    let detail = service.get_family_detail(id).await.unwrap();
    let specs: Vec<&str> = detail.sku.iter().map(|v| v.spec.as_str()).collect();
    assert_eq!(specs, vec!["red-M"]);
    assert_eq!(detail.spec.len(), 2);
}

pub async fn missing_variant_is_not_found<S: CatalogStorage>(store: S) {
    let service = CatalogService::new(store);
    let err = service
        .find_variant(FamilyId::new(42), "red-M")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

/// Lookup binds both the family and the spec string.
pub async fn variant_lookup_matches_family_and_spec<S: CatalogStorage>(store: S) {
    let service = CatalogService::new(store);
    let a = service
        .create_family(
            &CreateFamilyRequest::new(NewFamily::titled("Mug"))
                .with_variant(NewVariant::new("blue", 5.0, 3)),
        )
        .await
        .unwrap();
    let b = service
        .create_family(
            &CreateFamilyRequest::new(NewFamily::titled("Cup"))
                .with_variant(NewVariant::new("blue", 7.0, 1)),
        )
        .await
        .unwrap();

    let va = service.find_variant(a, "blue").await.unwrap();
    let vb = service.find_variant(b, "blue").await.unwrap();
    assert_eq!((va.family_id, va.price, va.stock), (a, 5.0, 3));
    assert_eq!((vb.family_id, vb.price), (b, 7.0));
    assert!(service.find_variant(a, "green").await.unwrap_err().is_not_found());
}

/// Duplicate specs are accepted; the oldest row answers the lookup.
pub async fn duplicate_variant_specs_resolve_to_oldest<S: CatalogStorage>(store: S) {
    let service = CatalogService::new(store);
    let id = service
        .create_family(&CreateFamilyRequest::new(NewFamily::titled("Sock")))
        .await
        .unwrap();

    let ids = service
        .add_variants(
            id,
            &[NewVariant::new("L", 1.0, 1), NewVariant::new("L", 2.0, 2)],
        )
        .await
        .unwrap();
    assert_eq!(ids.len(), 2);

    let found = service.find_variant(id, "L").await.unwrap();
    assert_eq!(found.id, ids[0]);
    assert_eq!(service.get_family_detail(id).await.unwrap().sku.len(), 2);
}

pub async fn add_variants_to_missing_family_is_not_found<S: CatalogStorage>(store: S) {
    let service = CatalogService::new(store);
    let err = service
        .add_variants(FamilyId::new(999), &[NewVariant::new("S", 1.0, 1)])
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(service
        .find_variant(FamilyId::new(999), "S")
        .await
        .unwrap_err()
        .is_not_found());
}

/// Deactivation hides a family from listings; reactivation restores it.
pub async fn active_flag_drives_listings<S: CatalogStorage>(store: S) {
    let service = CatalogService::new(store);
    let category = service.create_category("Tops").await.unwrap();

    let mut request = tshirt(Some(category));
    request.family.recommend = true;
    let id = service.create_family(&request).await.unwrap();

    let listed = service.list_families_by_category(category).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, id);
    assert_eq!(listed[0].category_name, "Tops");
    assert_eq!(service.list_recommended_families().await.unwrap().len(), 1);

    service.set_family_active(id, false).await.unwrap();
    assert!(service
        .list_families_by_category(category)
        .await
        .unwrap()
        .is_empty());
    assert!(service.list_recommended_families().await.unwrap().is_empty());
    // Detail reads are by key and still see the row.
    assert!(!service.get_family_detail(id).await.unwrap().family.active);

    service.set_family_active(id, true).await.unwrap();
    assert_eq!(
        service.list_families_by_category(category).await.unwrap().len(),
        1
    );
}

pub async fn set_active_on_missing_family_is_not_found<S: CatalogStorage>(store: S) {
    let service = CatalogService::new(store);
    let err = service
        .set_family_active(FamilyId::new(77), false)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

/// A family filed under a category that does not exist still lists.
pub async fn orphaned_category_lists_with_empty_name<S: CatalogStorage>(store: S) {
    let service = CatalogService::new(store);
    let ghost = CategoryId::new(404);
    let id = service.create_family(&tshirt(Some(ghost))).await.unwrap();

    let listed = service.list_families_by_category(ghost).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, id);
    assert_eq!(listed[0].category_name, "");
}

pub async fn detail_reads_are_repeatable<S: CatalogStorage>(store: S) {
    let service = CatalogService::new(store);
    let id = service
        .create_family(&tshirt(None).with_variant(NewVariant::new("red-M", 19.99, 4)))
        .await
        .unwrap();

    let first = service.get_family_detail(id).await.unwrap();
    let second = service.get_family_detail(id).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first.sku.len(), 1);
    assert_eq!(first.sku[0].family_id, id);
}

pub async fn duplicate_attribute_kinds_are_kept<S: CatalogStorage>(store: S) {
    let service = CatalogService::new(store);
    let request = CreateFamilyRequest::new(NewFamily::titled("Scarf"))
        .with_attribute("color", "red")
        .with_attribute("color", "red");
    let id = service.create_family(&request).await.unwrap();
    assert_eq!(service.get_family_detail(id).await.unwrap().spec.len(), 2);
}

/// Blobs round-trip through storage and decode lazily.
pub async fn metadata_blobs_survive_storage<S: CatalogStorage>(store: S) {
    let service = CatalogService::new(store);
    let mut family = NewFamily::titled("Tea");
    family.images = serde_json::json!(["front.png", "back.png"]);
    family.shelf_life = serde_json::json!({"days": 365});
    let id = service
        .create_family(&CreateFamilyRequest::new(family))
        .await
        .unwrap();

    let detail = service.get_family_detail(id).await.unwrap();
    let images: Vec<String> = detail.family.images.decode().unwrap();
    assert_eq!(images, vec!["front.png".to_string(), "back.png".to_string()]);
    assert_eq!(
        detail.family.shelf_life.to_json().unwrap(),
        serde_json::json!({"days": 365})
    );
    assert_eq!(detail.family.detail_images.to_json().unwrap(), serde_json::Value::Null);
}

pub async fn categories_are_unique_and_listed<S: CatalogStorage>(store: S) {
    let service = CatalogService::new(store);
    let tops = service.create_category("Tops").await.unwrap();
    let shoes = service.create_category("Shoes").await.unwrap();
    assert!(matches!(
        service.create_category("Tops").await,
        Err(CatalogError::Storage(_))
    ));

    let listed: Vec<_> = service
        .list_categories()
        .await
        .unwrap()
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();
    assert_eq!(
        listed,
        vec![(tops, "Tops".to_string()), (shoes, "Shoes".to_string())]
    );
}

/// Attribute order after commit equals request order.
pub async fn attribute_order_is_preserved<S: CatalogStorage>(store: S, pairs: &[(String, String)]) {
    let service = CatalogService::new(store);
    let mut request = CreateFamilyRequest::new(NewFamily::titled("Prop"));
    for (kind, value) in pairs {
        request = request.with_attribute(kind.clone(), value.clone());
    }
    let id = service.create_family(&request).await.unwrap();

    let detail = service.get_family_detail(id).await.unwrap();
    assert_eq!(kinds_and_values(&detail.spec), pairs.to_vec());
}
