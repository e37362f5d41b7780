use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role carried in session tokens.
///
/// Every account holds `user`; accounts with the admin flag also hold `admin`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub const USER: Role = Role(Cow::Borrowed("user"));
    pub const ADMIN: Role = Role(Cow::Borrowed("admin"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Roles granted to an account with the given admin flag.
    pub fn for_account(admin: bool) -> Vec<Role> {
        if admin {
            vec![Role::USER, Role::ADMIN]
        } else {
            vec![Role::USER]
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
