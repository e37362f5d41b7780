use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::rejection::JsonRejection,
    http::{HeaderMap, StatusCode},
    response::Response,
    routing::{get, post},
};
use chrono::Utc;
use tracing::info;

use storefront_auth::Profile;

use crate::app::dto::{LoginRequest, ModifyUserActiveRequest, UserInfo};
use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;
use crate::middleware::extract_bearer;

pub fn router() -> Router {
    Router::new()
        .route("/refresh_token", post(refresh_token))
        .route("/info", get(info))
        .route("/modify/info", post(modify_info))
        .route("/modify/active", post(modify_active))
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::bad_request(e.body_text()),
    };
    if body.code.trim().is_empty() {
        return errors::bad_request("code must not be empty");
    }

    match services.sessions.login(&body.code, Utc::now()).await {
        Ok(token) => errors::ok(token),
        Err(e) => errors::login_error_to_response(e),
    }
}

pub async fn refresh_token(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> Response {
    let Some(token) = extract_bearer(&headers) else {
        return errors::json_error(StatusCode::UNAUTHORIZED, "unauthorized", "missing bearer token");
    };

    match services.sessions.refresh(token, Utc::now()) {
        Ok(issued) => errors::ok(issued),
        Err(e) => errors::json_error(StatusCode::UNAUTHORIZED, "unauthorized", e.to_string()),
    }
}

pub async fn info(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> Response {
    match services.accounts.get(principal.user_id()).await {
        Ok(account) => errors::ok(UserInfo::from(account)),
        Err(e) => errors::account_error_to_response(e),
    }
}

pub async fn modify_info(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<Profile>, JsonRejection>,
) -> Response {
    let Json(profile) = match body {
        Ok(b) => b,
        Err(e) => return errors::bad_request(e.body_text()),
    };

    match services
        .accounts
        .update_profile(principal.user_id(), &profile)
        .await
    {
        Ok(()) => errors::ok_empty(),
        Err(e) => errors::account_error_to_response(e),
    }
}

pub async fn modify_active(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<ModifyUserActiveRequest>, JsonRejection>,
) -> Response {
    if let Err(resp) = crate::authz::require_admin(&principal) {
        return resp;
    }
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::bad_request(e.body_text()),
    };

    match services
        .accounts
        .set_active(body.check_id, body.check_active)
        .await
    {
        Ok(()) => {
            info!(
                admin = principal.user_id().get(),
                user_id = body.check_id.get(),
                active = body.check_active,
                "account activation changed"
            );
            errors::ok_empty()
        }
        Err(e) => errors::account_error_to_response(e),
    }
}
