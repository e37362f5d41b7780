use axum::{
    Router,
    routing::{get, post},
};

pub mod cart;
pub mod category;
pub mod spu;
pub mod system;
pub mod user;

/// Routes reachable without a token.
pub fn public_router() -> Router {
    Router::new().route("/user/login", post(user::login))
}

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/user", user::router())
        .nest("/spu", spu::router())
        .nest("/category", category::router())
        .nest("/cart", cart::router())
}
