//! Shopping cart module.
//!
//! A cart is the set of active lines a user has added. Each line points at one
//! variant (and its owning family) with a quantity. Lines are append-only at
//! this layer; the SQL store lives in `storefront-infra`.

pub mod line;
pub mod store;

pub use line::{CartLine, NewCartLine};
pub use store::{CartError, CartResult, CartStore};
