use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{CartLineId, DomainError, DomainResult, FamilyId, UserId, VariantId};

fn default_count() -> u32 {
    1
}

/// A stored cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    pub id: CartLineId,
    pub user_id: UserId,
    #[serde(rename = "sku_id")]
    pub variant_id: VariantId,
    #[serde(rename = "spu_id")]
    pub family_id: FamilyId,
    pub count: u32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Line fields supplied by the caller. The owning user comes from the session,
/// never from the request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCartLine {
    #[serde(rename = "sku_id")]
    pub variant_id: VariantId,
    #[serde(rename = "spu_id")]
    pub family_id: FamilyId,
    #[serde(default = "default_count")]
    pub count: u32,
}

impl NewCartLine {
    pub fn new(variant_id: VariantId, family_id: FamilyId, count: u32) -> Self {
        Self {
            variant_id,
            family_id,
            count,
        }
    }

    /// Reject lines that could never be fulfilled.
    pub fn validate(&self) -> DomainResult<()> {
        if self.count == 0 {
            return Err(DomainError::validation("count must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_names_map_to_variant_and_family() {
        let line: NewCartLine = serde_json::from_value(json!({"sku_id": 4, "spu_id": 2})).unwrap();
        assert_eq!(line.variant_id, VariantId::new(4));
        assert_eq!(line.family_id, FamilyId::new(2));
        assert_eq!(line.count, 1);
        assert!(line.validate().is_ok());
    }

    #[test]
    fn zero_count_is_invalid() {
        let line = NewCartLine::new(VariantId::new(1), FamilyId::new(1), 0);
        assert!(matches!(line.validate(), Err(DomainError::Validation(_))));
    }
}
