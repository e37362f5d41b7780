use thiserror::Error;

use storefront_core::UserId;

use crate::Role;

/// Authenticated caller of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    pub roles: Vec<Role>,
}

impl Principal {
    pub fn new(user_id: UserId, roles: Vec<Role>) -> Self {
        Self { user_id, roles }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: missing role '{0}'")]
    Forbidden(String),
}

/// Require `required` among the principal's roles. Pure check, no IO.
pub fn authorize(principal: &Principal, required: &Role) -> Result<(), AuthzError> {
    if principal.roles.iter().any(|r| r == required) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required.as_str().to_string()))
    }
}
