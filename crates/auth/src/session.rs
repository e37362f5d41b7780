//! Login and token refresh.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, instrument};

use crate::account::{AccountError, AccountStore};
use crate::identity::{IdentityError, IdentityProvider};
use crate::jwt::{Hs256TokenService, IssuedToken, TokenError};
use crate::Role;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoginError {
    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Account(#[from] AccountError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Turns identity-provider login codes into session tokens.
#[derive(Clone)]
pub struct SessionService {
    accounts: Arc<dyn AccountStore>,
    identity: Arc<dyn IdentityProvider>,
    tokens: Hs256TokenService,
    admin_open_ids: HashSet<String>,
}

impl SessionService {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        identity: Arc<dyn IdentityProvider>,
        tokens: Hs256TokenService,
    ) -> Self {
        Self {
            accounts,
            identity,
            tokens,
            admin_open_ids: HashSet::new(),
        }
    }

    /// Open ids whose accounts are promoted to admin on login.
    pub fn with_admins(mut self, open_ids: impl IntoIterator<Item = String>) -> Self {
        self.admin_open_ids = open_ids.into_iter().collect();
        self
    }

    pub fn tokens(&self) -> &Hs256TokenService {
        &self.tokens
    }

    /// Exchange `code`, create or refresh the account, and sign a token.
    #[instrument(skip(self, code), fields(user_id), err)]
    pub async fn login(&self, code: &str, now: DateTime<Utc>) -> Result<IssuedToken, LoginError> {
        let identity = self.identity.exchange(code).await?;

        let (user_id, mut admin) = match self.accounts.find_by_open_id(&identity.open_id).await? {
            Some(account) => {
                self.accounts
                    .update_session_key(account.id, &identity.session_key)
                    .await?;
                (account.id, account.admin)
            }
            None => {
                let id = self
                    .accounts
                    .create(&identity.open_id, &identity.session_key)
                    .await?;
                info!(user_id = id.get(), "account created");
                (id, false)
            }
        };
        tracing::Span::current().record("user_id", user_id.get());

        if !admin && self.admin_open_ids.contains(&identity.open_id) {
            self.accounts.set_admin(user_id, true).await?;
            admin = true;
        }

        Ok(self.tokens.issue(user_id, Role::for_account(admin), now)?)
    }

    pub fn refresh(&self, token: &str, now: DateTime<Utc>) -> Result<IssuedToken, TokenError> {
        self.tokens.refresh(token, now)
    }
}
