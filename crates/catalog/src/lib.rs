//! Catalog domain module.
//!
//! Product families, their specification attributes and purchasable variants,
//! plus the categories families are filed under. The module defines the data
//! model, the storage boundary (`CatalogStorage` / `CatalogTx`) and the
//! `CatalogService` that owns the transaction boundary for multi-row writes.
//! Concrete stores live in `storefront-infra`.

pub mod blob;
pub mod error;
pub mod model;
pub mod service;
pub mod store;

pub use blob::{BLOB_SCHEMA_VERSION, MetadataBlob};
pub use error::{CatalogError, CatalogResult};
pub use model::{
    AttributeInput, Category, CreateFamilyRequest, DEFAULT_PRICE, EncodedBlobs, FamilyDetail,
    FamilySummary, MAX_ATTRIBUTE_LEN, MAX_CATEGORY_NAME_LEN, MAX_VARIANT_SPEC_LEN, NewFamily,
    NewVariant, ProductFamily, SpecificationAttribute, Variant,
};
pub use service::CatalogService;
pub use store::{CatalogStorage, CatalogTx};
