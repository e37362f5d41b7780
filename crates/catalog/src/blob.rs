//! Versioned opaque metadata blobs.
//!
//! Shelf-life info, image lists and detail-image lists are free-form JSON
//! supplied by the storefront admin. They are encoded once at the write
//! boundary into the envelope `{"v":1,"value":<payload>}` and kept as text from
//! then on. Decoding happens only where a caller actually consumes the payload.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{CatalogError, CatalogResult};

/// Envelope version written by `MetadataBlob::encode`.
pub const BLOB_SCHEMA_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a, T: ?Sized> {
    v: u32,
    value: &'a T,
}

#[derive(Deserialize)]
struct EnvelopeHeader {
    v: u32,
}

#[derive(Deserialize)]
struct Envelope<T> {
    value: T,
}

/// Encoded metadata blob (envelope text, never re-encoded once built).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataBlob {
    encoded: String,
}

impl MetadataBlob {
    /// Encode `value` into a versioned envelope.
    pub fn encode<T>(value: &T) -> CatalogResult<Self>
    where
        T: Serialize + ?Sized,
    {
        let encoded = serde_json::to_string(&EnvelopeRef {
            v: BLOB_SCHEMA_VERSION,
            value,
        })
        .map_err(|e| CatalogError::encoding(e.to_string()))?;
        Ok(Self { encoded })
    }

    /// Wrap envelope text exactly as it was read back from storage.
    pub fn from_stored(encoded: impl Into<String>) -> Self {
        Self {
            encoded: encoded.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.encoded
    }

    pub fn into_inner(self) -> String {
        self.encoded
    }

    /// Envelope version without decoding the payload.
    pub fn version(&self) -> CatalogResult<u32> {
        let header: EnvelopeHeader = serde_json::from_str(&self.encoded)
            .map_err(|e| CatalogError::encoding(format!("malformed blob envelope: {e}")))?;
        Ok(header.v)
    }

    /// Decode the payload as `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> CatalogResult<T> {
        let version = self.version()?;
        if version != BLOB_SCHEMA_VERSION {
            return Err(CatalogError::encoding(format!(
                "unsupported blob version {version} (expected {BLOB_SCHEMA_VERSION})"
            )));
        }
        let envelope: Envelope<T> = serde_json::from_str(&self.encoded)
            .map_err(|e| CatalogError::encoding(format!("blob payload: {e}")))?;
        Ok(envelope.value)
    }

    /// Decode the payload as untyped JSON.
    pub fn to_json(&self) -> CatalogResult<serde_json::Value> {
        self.decode()
    }
}

/// Wire form is the bare payload, not the envelope.
impl Serialize for MetadataBlob {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value = self.to_json().map_err(serde::ser::Error::custom)?;
        value.serialize(serializer)
    }
}
