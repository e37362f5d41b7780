use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::{
        Query,
        rejection::{JsonRejection, QueryRejection},
    },
    response::Response,
    routing::{get, post},
};
use tracing::info;

use storefront_catalog::CreateFamilyRequest;

use crate::app::dto::{
    CategoryQuery, FamilyQuery, IdResponse, InsertVariantsRequest, ModifyFamilyActiveRequest,
    VariantQuery,
};
use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/info", get(list_by_category))
        .route("/info/recommend", get(list_recommended))
        .route("/info/detail", get(detail))
        .route("/insert", post(insert))
        .route("/modify/active", post(modify_active))
        .route("/sku", get(find_variant))
        .route("/sku/insert", post(insert_variants))
}

pub async fn list_by_category(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<CategoryQuery>, QueryRejection>,
) -> Response {
    let Query(q) = match query {
        Ok(q) => q,
        Err(e) => return errors::bad_request(e.body_text()),
    };

    match services.catalog.list_families_by_category(q.category_id).await {
        Ok(families) => errors::ok(families),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn list_recommended(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.catalog.list_recommended_families().await {
        Ok(families) => errors::ok(families),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn detail(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<FamilyQuery>, QueryRejection>,
) -> Response {
    let Query(q) = match query {
        Ok(q) => q,
        Err(e) => return errors::bad_request(e.body_text()),
    };

    match services.catalog.get_family_detail(q.family_id).await {
        Ok(detail) => errors::ok(detail),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn insert(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<CreateFamilyRequest>, JsonRejection>,
) -> Response {
    if let Err(resp) = crate::authz::require_admin(&principal) {
        return resp;
    }
    let Json(request) = match body {
        Ok(b) => b,
        Err(e) => return errors::bad_request(e.body_text()),
    };

    match services.catalog.create_family(&request).await {
        Ok(id) => {
            info!(admin = principal.user_id().get(), family_id = id.get(), "family created");
            errors::ok(IdResponse { id })
        }
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn modify_active(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<ModifyFamilyActiveRequest>, JsonRejection>,
) -> Response {
    if let Err(resp) = crate::authz::require_admin(&principal) {
        return resp;
    }
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::bad_request(e.body_text()),
    };

    match services
        .catalog
        .set_family_active(body.family_id, body.active)
        .await
    {
        Ok(()) => errors::ok_empty(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn find_variant(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<VariantQuery>, QueryRejection>,
) -> Response {
    let Query(q) = match query {
        Ok(q) => q,
        Err(e) => return errors::bad_request(e.body_text()),
    };

    match services.catalog.find_variant(q.family_id, &q.spec).await {
        Ok(variant) => errors::ok(variant),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn insert_variants(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<InsertVariantsRequest>, JsonRejection>,
) -> Response {
    if let Err(resp) = crate::authz::require_admin(&principal) {
        return resp;
    }
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::bad_request(e.body_text()),
    };
    if body.sku.is_empty() {
        return errors::bad_request("sku must not be empty");
    }

    match services.catalog.add_variants(body.family_id, &body.sku).await {
        Ok(ids) => errors::ok(serde_json::json!({ "ids": ids })),
        Err(e) => errors::catalog_error_to_response(e),
    }
}
