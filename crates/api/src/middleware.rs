use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::warn;

use storefront_auth::{AccountStore, JwtValidator};

use crate::app::errors;
use crate::context::PrincipalContext;

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<dyn JwtValidator>,
}

/// Validate the bearer token and attach the caller's `PrincipalContext`.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(token) = extract_bearer(req.headers()) else {
        return errors::json_error(StatusCode::UNAUTHORIZED, "unauthorized", "missing bearer token");
    };

    let claims = match state.jwt.validate(token, Utc::now()) {
        Ok(c) => c,
        Err(e) => return errors::json_error(StatusCode::UNAUTHORIZED, "unauthorized", e.to_string()),
    };

    req.extensions_mut()
        .insert(PrincipalContext::new(claims.sub, claims.roles));

    next.run(req).await
}

/// Refuse callers whose account is deactivated or unknown (423 Locked).
///
/// Runs after `auth_middleware`.
pub async fn active_middleware(
    State(accounts): State<Arc<dyn AccountStore>>,
    req: Request,
    next: Next,
) -> Response {
    let Some(principal) = req.extensions().get::<PrincipalContext>() else {
        return errors::json_error(StatusCode::UNAUTHORIZED, "unauthorized", "no principal");
    };
    let user_id = principal.user_id();

    match accounts.is_active(user_id).await {
        Ok(true) => next.run(req).await,
        Ok(false) => {
            warn!(user_id = user_id.get(), "request from inactive account");
            errors::json_error(StatusCode::LOCKED, "inactive", "account is not active")
        }
        Err(e) => errors::account_error_to_response(e),
    }
}

pub(crate) fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let header = header.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}
