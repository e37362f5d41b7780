use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::rejection::JsonRejection,
    response::Response,
    routing::{get, post},
};

use storefront_cart::NewCartLine;

use crate::app::dto::IdResponse;
use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/insert", post(insert))
        .route("/info", get(list))
}

pub async fn insert(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<NewCartLine>, JsonRejection>,
) -> Response {
    let Json(line) = match body {
        Ok(b) => b,
        Err(e) => return errors::bad_request(e.body_text()),
    };
    if let Err(e) = line.validate() {
        return errors::bad_request(e.to_string());
    }

    match services.carts.add_line(principal.user_id(), &line).await {
        Ok(id) => errors::ok(IdResponse { id }),
        Err(e) => errors::cart_error_to_response(e),
    }
}

pub async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> Response {
    match services.carts.list_lines(principal.user_id()).await {
        Ok(lines) => errors::ok(lines),
        Err(e) => errors::cart_error_to_response(e),
    }
}
