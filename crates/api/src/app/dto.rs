//! Request/response DTOs for routes whose payloads are not domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_auth::{Account, Gender};
use storefront_catalog::NewVariant;
use storefront_core::{CategoryId, FamilyId, UserId};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct ModifyUserActiveRequest {
    pub check_id: UserId,
    #[serde(default)]
    pub check_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct ModifyFamilyActiveRequest {
    pub family_id: FamilyId,
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Deserialize)]
pub struct InsertVariantsRequest {
    pub family_id: FamilyId,
    pub sku: Vec<NewVariant>,
}

#[derive(Debug, Deserialize)]
pub struct InsertCategoryRequest {
    pub category_name: String,
}

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub category_id: CategoryId,
}

#[derive(Debug, Deserialize)]
pub struct FamilyQuery {
    pub family_id: FamilyId,
}

#[derive(Debug, Deserialize)]
pub struct VariantQuery {
    pub family_id: FamilyId,
    pub spec: String,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct IdResponse<T> {
    pub id: T,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: UserId,
    pub nick_name: String,
    pub avatar: String,
    pub gender: Gender,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for UserInfo {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            nick_name: account.profile.nick_name,
            avatar: account.profile.avatar,
            gender: account.profile.gender,
            active: account.active,
            created_at: account.created_at,
        }
    }
}
