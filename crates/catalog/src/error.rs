//! Catalog error taxonomy.

use thiserror::Error;

/// Result type used by catalog stores and the catalog service.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog operation error.
///
/// Every store-level error propagates unchanged through `CatalogService` to the
/// caller; the HTTP layer decides how each variant is rendered.
///
/// - **Encoding**: a metadata blob could not be serialized or decoded
/// - **Storage**: the backing store rejected an operation
/// - **Integrity**: a write reported zero affected rows
/// - **NotFound**: a point lookup matched no row
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("metadata encoding failed: {0}")]
    Encoding(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("integrity check failed: {0}")]
    Integrity(String),

    #[error("not found: {0}")]
    NotFound(String),
}

impl CatalogError {
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Zero-rows-affected failure for the named write.
    pub fn no_rows_affected(operation: &str) -> Self {
        Self::Integrity(format!("{operation} affected 0 rows"))
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
