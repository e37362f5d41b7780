//! `storefront-core`: identifiers and domain errors shared by every storefront crate.
//!
//! This crate has no infrastructure concerns.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{AttributeId, CartLineId, CategoryId, FamilyId, UserId, VariantId};
