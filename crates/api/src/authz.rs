//! API-side role guard for administrative routes.

use axum::http::StatusCode;
use axum::response::Response;

use storefront_auth::{Role, authorize};

use crate::app::errors;
use crate::context::PrincipalContext;

/// Reject the request with 403 unless the caller holds `admin`.
pub fn require_admin(principal: &PrincipalContext) -> Result<(), Response> {
    authorize(&principal.to_principal(), &Role::ADMIN)
        .map_err(|e| errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string()))
}
