use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::rejection::JsonRejection,
    response::Response,
    routing::{get, post},
};

use crate::app::dto::{IdResponse, InsertCategoryRequest};
use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/all", get(list))
        .route("/insert", post(insert))
}

pub async fn list(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.catalog.list_categories().await {
        Ok(categories) => errors::ok(categories),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn insert(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<InsertCategoryRequest>, JsonRejection>,
) -> Response {
    if let Err(resp) = crate::authz::require_admin(&principal) {
        return resp;
    }
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::bad_request(e.body_text()),
    };
    let name = body.category_name.trim();
    if name.is_empty() {
        return errors::bad_request("category_name must not be empty");
    }

    match services.catalog.create_category(name).await {
        Ok(id) => errors::ok(IdResponse { id }),
        Err(e) => errors::catalog_error_to_response(e),
    }
}
