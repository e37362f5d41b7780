use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use storefront_core::{CartLineId, UserId};

use crate::line::{CartLine, NewCartLine};

pub type CartResult<T> = Result<T, CartError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    #[error("storage error: {0}")]
    Storage(String),

    #[error("integrity check failed: {0}")]
    Integrity(String),
}

#[async_trait]
pub trait CartStore: Send + Sync {
    /// Append a line to `user_id`'s cart (`Integrity` on zero affected rows).
    async fn add_line(&self, user_id: UserId, line: &NewCartLine) -> CartResult<CartLineId>;

    /// Active lines of `user_id`, in insertion order.
    async fn list_lines(&self, user_id: UserId) -> CartResult<Vec<CartLine>>;
}

#[async_trait]
impl<S> CartStore for Arc<S>
where
    S: CartStore + ?Sized,
{
    async fn add_line(&self, user_id: UserId, line: &NewCartLine) -> CartResult<CartLineId> {
        (**self).add_line(user_id, line).await
    }

    async fn list_lines(&self, user_id: UserId) -> CartResult<Vec<CartLine>> {
        (**self).list_lines(user_id).await
    }
}
