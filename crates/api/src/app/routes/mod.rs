use axum::Router;

pub mod approvals;
pub mod products;
pub mod system;

/// Router for all catalog and approval-queue endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/products", products::router())
        .nest("/approvals", approvals::router())
}
