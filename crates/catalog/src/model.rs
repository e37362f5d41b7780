//! Catalog records and write requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use storefront_core::{AttributeId, CategoryId, FamilyId, VariantId};

use crate::blob::MetadataBlob;
use crate::error::CatalogResult;

/// Sentinel price stored when a family or variant is created without one.
pub const DEFAULT_PRICE: f64 = 9999.99;

/// Longest attribute kind or value a store accepts, in characters.
pub const MAX_ATTRIBUTE_LEN: usize = 100;

/// Longest variant specification string a store accepts, in characters.
pub const MAX_VARIANT_SPEC_LEN: usize = 512;

/// Longest category name a store accepts, in characters.
pub const MAX_CATEGORY_NAME_LEN: usize = 100;

fn default_price() -> f64 {
    DEFAULT_PRICE
}

/// A product family as stored.
///
/// `id` is assigned by the store and never changes. Families are never
/// deleted; `active = false` hides them from every listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductFamily {
    pub id: FamilyId,
    pub category_id: Option<CategoryId>,
    pub title: String,
    pub production_code: String,
    pub standard_code: String,
    pub inventory: u32,
    pub price: f64,
    pub shelf_life: MetadataBlob,
    pub images: MetadataBlob,
    pub detail_images: MetadataBlob,
    pub recommend: bool,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Family fields supplied on creation (the store assigns id, flags and timestamp).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFamily {
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    pub title: String,
    #[serde(default)]
    pub production_code: String,
    #[serde(default)]
    pub standard_code: String,
    #[serde(default)]
    pub inventory: u32,
    #[serde(default = "default_price")]
    pub price: f64,
    #[serde(default)]
    pub shelf_life: JsonValue,
    #[serde(default)]
    pub images: JsonValue,
    #[serde(default)]
    pub detail_images: JsonValue,
    #[serde(default)]
    pub recommend: bool,
}

/// The three metadata blobs of a family, encoded for storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBlobs {
    pub shelf_life: MetadataBlob,
    pub images: MetadataBlob,
    pub detail_images: MetadataBlob,
}

impl NewFamily {
    /// A family with only a title; everything else takes its default.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            category_id: None,
            title: title.into(),
            production_code: String::new(),
            standard_code: String::new(),
            inventory: 0,
            price: DEFAULT_PRICE,
            shelf_life: JsonValue::Null,
            images: JsonValue::Null,
            detail_images: JsonValue::Null,
            recommend: false,
        }
    }

    pub fn in_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn priced(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    pub fn recommended(mut self) -> Self {
        self.recommend = true;
        self
    }

    /// Encode shelf-life, images and detail images. Stores call this before insert.
    pub fn encode_blobs(&self) -> CatalogResult<EncodedBlobs> {
        Ok(EncodedBlobs {
            shelf_life: MetadataBlob::encode(&self.shelf_life)?,
            images: MetadataBlob::encode(&self.images)?,
            detail_images: MetadataBlob::encode(&self.detail_images)?,
        })
    }
}

/// One `{kind, value}` pair of a create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeInput {
    pub kind: String,
    pub value: String,
}

impl AttributeInput {
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
        }
    }
}

/// Variant fields supplied on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewVariant {
    pub spec: String,
    #[serde(default = "default_price")]
    pub price: f64,
    #[serde(default)]
    pub stock: u32,
}

impl NewVariant {
    pub fn new(spec: impl Into<String>, price: f64, stock: u32) -> Self {
        Self {
            spec: spec.into(),
            price,
            stock,
        }
    }
}

/// Request for `CatalogService::create_family`.
///
/// Attributes and variants are inserted in the order given, inside the same
/// transaction as the family row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateFamilyRequest {
    #[serde(flatten)]
    pub family: NewFamily,
    #[serde(default)]
    pub spec: Vec<AttributeInput>,
    #[serde(default)]
    pub sku: Vec<NewVariant>,
}

impl CreateFamilyRequest {
    pub fn new(family: NewFamily) -> Self {
        Self {
            family,
            spec: Vec::new(),
            sku: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, kind: impl Into<String>, value: impl Into<String>) -> Self {
        self.spec.push(AttributeInput::new(kind, value));
        self
    }

    pub fn with_variant(mut self, variant: NewVariant) -> Self {
        self.sku.push(variant);
        self
    }
}

/// A descriptive key/value tag attached to a family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecificationAttribute {
    pub id: AttributeId,
    pub family_id: FamilyId,
    pub kind: String,
    pub value: String,
}

/// A purchasable unit of a family, keyed by its specification string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variant {
    pub id: VariantId,
    pub family_id: FamilyId,
    pub spec: String,
    pub price: f64,
    pub stock: u32,
    pub created_at: DateTime<Utc>,
}

/// Listing row: an active family with its resolved category name.
///
/// `category_name` is empty when the family has no category or the category row
/// no longer exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FamilySummary {
    pub id: FamilyId,
    pub category_id: Option<CategoryId>,
    pub category_name: String,
    pub title: String,
    pub images: MetadataBlob,
    pub price: f64,
}

/// A family reassembled with its attributes and variants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FamilyDetail {
    #[serde(flatten)]
    pub family: ProductFamily,
    pub spec: Vec<SpecificationAttribute>,
    pub sku: Vec<Variant>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
