//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store and session wiring over one SQLite pool
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: `{status, data}` envelope and error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(services: Arc<AppServices>) -> Router {
    let auth_state = middleware::AuthState {
        jwt: services.jwt_validator(),
    };

    // Protected routes: bearer token first, then the active-account check.
    let protected = routes::router()
        .layer(axum::middleware::from_fn_with_state(
            services.accounts.clone(),
            middleware::active_middleware,
        ))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api/v1", routes::public_router().merge(protected))
        .layer(ServiceBuilder::new().layer(Extension(services)))
}
