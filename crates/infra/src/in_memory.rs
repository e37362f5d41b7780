//! In-memory catalog store.
//!
//! Intended for tests/dev. Committed rows live behind one `RwLock`; a
//! transaction stages its writes privately and applies them in one write-lock
//! section on commit. Ids come from per-table sequences, so ids handed out by
//! a rolled-back transaction are never reused.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard};

use async_trait::async_trait;
use chrono::Utc;

use storefront_catalog::{
    CatalogError, CatalogResult, CatalogStorage, CatalogTx, Category, FamilySummary,
    MAX_ATTRIBUTE_LEN, MAX_CATEGORY_NAME_LEN, MAX_VARIANT_SPEC_LEN, NewFamily, NewVariant,
    ProductFamily, SpecificationAttribute, Variant,
};
use storefront_core::{AttributeId, CategoryId, FamilyId, VariantId};

#[derive(Debug, Default)]
struct Tables {
    families: BTreeMap<FamilyId, ProductFamily>,
    attributes: Vec<SpecificationAttribute>,
    variants: Vec<Variant>,
    categories: Vec<Category>,
}

#[derive(Debug, Default)]
struct Sequence(AtomicI64);

impl Sequence {
    fn next(&self) -> i64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[derive(Debug, Default)]
struct Shared {
    tables: RwLock<Tables>,
    family_ids: Sequence,
    attribute_ids: Sequence,
    variant_ids: Sequence,
    category_ids: Sequence,
}

impl Shared {
    fn read(&self) -> CatalogResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| CatalogError::storage("lock poisoned"))
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogStore {
    shared: Arc<Shared>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn summaries<F>(&self, filter: F) -> CatalogResult<Vec<FamilySummary>>
    where
        F: Fn(&ProductFamily) -> bool,
    {
        let tables = self.shared.read()?;
        Ok(tables
            .families
            .values()
            .filter(|f| f.active && filter(f))
            .map(|f| FamilySummary {
                id: f.id,
                category_id: f.category_id,
                category_name: f
                    .category_id
                    .and_then(|cid| tables.categories.iter().find(|c| c.id == cid))
                    .map(|c| c.name.clone())
                    .unwrap_or_default(),
                title: f.title.clone(),
                images: f.images.clone(),
                price: f.price,
            })
            .collect())
    }
}

/// Staged writes of one transaction. Dropping it discards them.
#[derive(Debug)]
pub struct InMemoryCatalogTx {
    shared: Arc<Shared>,
    staged: Tables,
}

fn check_len(operation: &str, field: &str, value: &str, max: usize) -> CatalogResult<()> {
    if value.chars().count() > max {
        return Err(CatalogError::storage(format!(
            "{operation}: {field} exceeds {max} characters"
        )));
    }
    Ok(())
}

#[async_trait]
impl CatalogTx for InMemoryCatalogTx {
    async fn insert_family(&mut self, new: &NewFamily) -> CatalogResult<FamilyId> {
        let blobs = new.encode_blobs()?;
        let id = FamilyId::new(self.shared.family_ids.next());
        self.staged.families.insert(
            id,
            ProductFamily {
                id,
                category_id: new.category_id,
                title: new.title.clone(),
                production_code: new.production_code.clone(),
                standard_code: new.standard_code.clone(),
                inventory: new.inventory,
                price: new.price,
                shelf_life: blobs.shelf_life,
                images: blobs.images,
                detail_images: blobs.detail_images,
                recommend: new.recommend,
                active: true,
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn get_family(&mut self, family_id: FamilyId) -> CatalogResult<ProductFamily> {
        if let Some(f) = self.staged.families.get(&family_id) {
            return Ok(f.clone());
        }
        self.shared
            .read()?
            .families
            .get(&family_id)
            .cloned()
            .ok_or_else(|| CatalogError::not_found(format!("family {family_id}")))
    }

    async fn insert_attribute(
        &mut self,
        family_id: FamilyId,
        kind: &str,
        value: &str,
    ) -> CatalogResult<()> {
        check_len("insert_attribute", "kind", kind, MAX_ATTRIBUTE_LEN)?;
        check_len("insert_attribute", "value", value, MAX_ATTRIBUTE_LEN)?;
        self.staged.attributes.push(SpecificationAttribute {
            id: AttributeId::new(self.shared.attribute_ids.next()),
            family_id,
            kind: kind.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    async fn list_attributes(
        &mut self,
        family_id: FamilyId,
    ) -> CatalogResult<Vec<SpecificationAttribute>> {
        let tables = self.shared.read()?;
        let mut out: Vec<_> = tables
            .attributes
            .iter()
            .chain(self.staged.attributes.iter())
            .filter(|a| a.family_id == family_id)
            .cloned()
            .collect();
        out.sort_by_key(|a| a.id);
        Ok(out)
    }

    async fn insert_variant(
        &mut self,
        family_id: FamilyId,
        new: &NewVariant,
    ) -> CatalogResult<VariantId> {
        check_len("insert_variant", "spec", &new.spec, MAX_VARIANT_SPEC_LEN)?;
        let id = VariantId::new(self.shared.variant_ids.next());
        self.staged.variants.push(Variant {
            id,
            family_id,
            spec: new.spec.clone(),
            price: new.price,
            stock: new.stock,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn list_variants(&mut self, family_id: FamilyId) -> CatalogResult<Vec<Variant>> {
        let tables = self.shared.read()?;
        let mut out: Vec<_> = tables
            .variants
            .iter()
            .chain(self.staged.variants.iter())
            .filter(|v| v.family_id == family_id)
            .cloned()
            .collect();
        out.sort_by_key(|v| v.id);
        Ok(out)
    }

    async fn commit(self) -> CatalogResult<()> {
        let mut tables = self
            .shared
            .tables
            .write()
            .map_err(|_| CatalogError::storage("lock poisoned"))?;
        let staged = self.staged;
        tables.families.extend(staged.families);
        tables.attributes.extend(staged.attributes);
        tables.variants.extend(staged.variants);
        Ok(())
    }

    async fn rollback(self) -> CatalogResult<()> {
        Ok(())
    }
}

#[async_trait]
impl CatalogStorage for InMemoryCatalogStore {
    type Tx = InMemoryCatalogTx;

    async fn begin(&self) -> CatalogResult<InMemoryCatalogTx> {
        Ok(InMemoryCatalogTx {
            shared: self.shared.clone(),
            staged: Tables::default(),
        })
    }

    async fn list_families_by_category(
        &self,
        category_id: CategoryId,
    ) -> CatalogResult<Vec<FamilySummary>> {
        self.summaries(|f| f.category_id == Some(category_id))
    }

    async fn list_recommended_families(&self) -> CatalogResult<Vec<FamilySummary>> {
        self.summaries(|f| f.recommend)
    }

    async fn find_variant(&self, family_id: FamilyId, spec: &str) -> CatalogResult<Variant> {
        self.shared
            .read()?
            .variants
            .iter()
            .filter(|v| v.family_id == family_id && v.spec == spec)
            .min_by_key(|v| v.id)
            .cloned()
            .ok_or_else(|| CatalogError::not_found(format!("variant {spec:?} of family {family_id}")))
    }

    async fn set_family_active(&self, family_id: FamilyId, active: bool) -> CatalogResult<()> {
        let mut tables = self
            .shared
            .tables
            .write()
            .map_err(|_| CatalogError::storage("lock poisoned"))?;
        let family = tables
            .families
            .get_mut(&family_id)
            .ok_or_else(|| CatalogError::not_found(format!("family {family_id}")))?;
        family.active = active;
        Ok(())
    }

    async fn insert_category(&self, name: &str) -> CatalogResult<CategoryId> {
        check_len("insert_category", "name", name, MAX_CATEGORY_NAME_LEN)?;
        let mut tables = self
            .shared
            .tables
            .write()
            .map_err(|_| CatalogError::storage("lock poisoned"))?;
        if tables.categories.iter().any(|c| c.name == name) {
            return Err(CatalogError::storage(format!(
                "insert_category: duplicate name {name:?}"
            )));
        }
        let id = CategoryId::new(self.shared.category_ids.next());
        tables.categories.push(Category {
            id,
            name: name.to_string(),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn list_categories(&self) -> CatalogResult<Vec<Category>> {
        Ok(self.shared.read()?.categories.clone())
    }
}
