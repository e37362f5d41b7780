use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Result of exchanging a mini-program login code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub open_id: String,
    pub session_key: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("identity provider unreachable: {0}")]
    Transport(String),

    /// The provider answered with an error payload (bad or reused code).
    #[error("identity provider rejected code ({code}): {message}")]
    Rejected { code: i64, message: String },
}

/// External identity exchange (login code -> stable open id).
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn exchange(&self, code: &str) -> Result<Identity, IdentityError>;
}

#[async_trait]
impl<P> IdentityProvider for Arc<P>
where
    P: IdentityProvider + ?Sized,
{
    async fn exchange(&self, code: &str) -> Result<Identity, IdentityError> {
        (**self).exchange(code).await
    }
}
