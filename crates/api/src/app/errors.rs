//! Response envelope and error mapping.
//!
//! Every response body is `{"status": <http code>, "data": <payload>}`; error
//! bodies carry `error`/`message` instead of `data`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;
use tracing::warn;

use storefront_auth::{AccountError, LoginError};
use storefront_cart::CartError;
use storefront_catalog::CatalogError;

/// 200 with `data`.
pub fn ok<T: Serialize>(data: T) -> Response {
    envelope(StatusCode::OK, data)
}

/// 200 with no payload.
pub fn ok_empty() -> Response {
    (
        StatusCode::OK,
        axum::Json(json!({ "status": StatusCode::OK.as_u16() })),
    )
        .into_response()
}

/// Wrap `data` in the envelope. A payload that fails to serialize (a stored
/// blob with an unknown version, say) becomes a 502 instead of a panic.
pub fn envelope<T: Serialize>(status: StatusCode, data: T) -> Response {
    let data = match serde_json::to_value(&data) {
        Ok(v) => v,
        Err(e) => {
            return catalog_error_to_response(CatalogError::encoding(format!(
                "response payload: {e}"
            )));
        }
    };

    (
        status,
        axum::Json(json!({
            "status": status.as_u16(),
            "data": data,
        })),
    )
        .into_response()
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "status": status.as_u16(),
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn bad_request(message: impl Into<String>) -> Response {
    json_error(StatusCode::BAD_REQUEST, "bad_request", message)
}

pub fn catalog_error_to_response(err: CatalogError) -> Response {
    match err {
        CatalogError::NotFound(msg) => json_error(StatusCode::NOT_FOUND, "not_found", msg),
        other => {
            warn!(error = %other, "catalog operation failed");
            json_error(StatusCode::BAD_GATEWAY, "catalog_error", other.to_string())
        }
    }
}

pub fn cart_error_to_response(err: CartError) -> Response {
    warn!(error = %err, "cart operation failed");
    json_error(StatusCode::BAD_GATEWAY, "cart_error", err.to_string())
}

pub fn account_error_to_response(err: AccountError) -> Response {
    match err {
        AccountError::NotFound(msg) => json_error(StatusCode::NOT_FOUND, "not_found", msg),
        other => {
            warn!(error = %other, "account operation failed");
            json_error(StatusCode::BAD_GATEWAY, "account_error", other.to_string())
        }
    }
}

pub fn login_error_to_response(err: LoginError) -> Response {
    match err {
        LoginError::Identity(e) => json_error(StatusCode::UNAUTHORIZED, "login_failed", e.to_string()),
        LoginError::Account(e) => account_error_to_response(e),
        LoginError::Token(e) => {
            warn!(error = %e, "token issue failed");
            json_error(StatusCode::BAD_GATEWAY, "token_error", e.to_string())
        }
    }
}
