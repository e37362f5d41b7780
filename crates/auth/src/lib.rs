//! `storefront-auth`: accounts, sessions and role checks.
//!
//! This crate is decoupled from HTTP and storage: account persistence and the
//! identity exchange are traits implemented in `storefront-infra`.

pub mod account;
pub mod authorize;
pub mod claims;
pub mod identity;
pub mod jwt;
pub mod roles;
pub mod session;

pub use account::{Account, AccountError, AccountResult, AccountStore, Gender, Profile};
pub use authorize::{AuthzError, Principal, authorize};
pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use identity::{Identity, IdentityError, IdentityProvider};
pub use jwt::{Hs256TokenService, IssuedToken, JwtValidator, TokenError};
pub use roles::Role;
pub use session::{LoginError, SessionService};
