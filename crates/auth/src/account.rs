//! Storefront user accounts.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use storefront_core::{DomainError, UserId};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Gender {
    #[default]
    Unknown,
    Male,
    Female,
}

impl From<Gender> for u8 {
    fn from(value: Gender) -> Self {
        match value {
            Gender::Unknown => 0,
            Gender::Male => 1,
            Gender::Female => 2,
        }
    }
}

impl TryFrom<u8> for Gender {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Gender::Unknown),
            1 => Ok(Gender::Male),
            2 => Ok(Gender::Female),
            other => Err(DomainError::validation(format!("unknown gender code {other}"))),
        }
    }
}

/// Editable part of an account.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub nick_name: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub gender: Gender,
}

/// A stored account, keyed by the identity provider's open id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: UserId,
    pub open_id: String,
    pub session_key: String,
    pub profile: Profile,
    pub admin: bool,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

pub type AccountResult<T> = Result<T, AccountError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error("storage error: {0}")]
    Storage(String),

    #[error("integrity check failed: {0}")]
    Integrity(String),

    #[error("not found: {0}")]
    NotFound(String),
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_open_id(&self, open_id: &str) -> AccountResult<Option<Account>>;

    /// Create an active, non-admin account.
    async fn create(&self, open_id: &str, session_key: &str) -> AccountResult<UserId>;

    async fn update_session_key(&self, user_id: UserId, session_key: &str) -> AccountResult<()>;

    async fn get(&self, user_id: UserId) -> AccountResult<Account>;

    /// Whether the account may use protected routes.
    ///
    /// Fail-closed: an unknown id reads as inactive rather than `NotFound`.
    async fn is_active(&self, user_id: UserId) -> AccountResult<bool>;

    async fn set_active(&self, user_id: UserId, active: bool) -> AccountResult<()>;

    async fn set_admin(&self, user_id: UserId, admin: bool) -> AccountResult<()>;

    async fn update_profile(&self, user_id: UserId, profile: &Profile) -> AccountResult<()>;
}

#[async_trait]
impl<S> AccountStore for Arc<S>
where
    S: AccountStore + ?Sized,
{
    async fn find_by_open_id(&self, open_id: &str) -> AccountResult<Option<Account>> {
        (**self).find_by_open_id(open_id).await
    }

    async fn create(&self, open_id: &str, session_key: &str) -> AccountResult<UserId> {
        (**self).create(open_id, session_key).await
    }

    async fn update_session_key(&self, user_id: UserId, session_key: &str) -> AccountResult<()> {
        (**self).update_session_key(user_id, session_key).await
    }

    async fn get(&self, user_id: UserId) -> AccountResult<Account> {
        (**self).get(user_id).await
    }

    async fn is_active(&self, user_id: UserId) -> AccountResult<bool> {
        (**self).is_active(user_id).await
    }

    async fn set_active(&self, user_id: UserId, active: bool) -> AccountResult<()> {
        (**self).set_active(user_id, active).await
    }

    async fn set_admin(&self, user_id: UserId, admin: bool) -> AccountResult<()> {
        (**self).set_admin(user_id, admin).await
    }

    async fn update_profile(&self, user_id: UserId, profile: &Profile) -> AccountResult<()> {
        (**self).update_profile(user_id, profile).await
    }
}
