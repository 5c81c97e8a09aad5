use axum::{routing::get, Router};

pub mod admin;
pub mod items;
pub mod reports;
pub mod system;

/// Router for every endpoint except `/health`.
pub fn router() -> Router {
    Router::new()
        .route("/movements", get(items::list_movements))
        .route("/reorder", get(reports::reorder_all))
        .route("/verify", get(reports::verify_all))
        .nest("/items", items::router())
        .nest("/admin", admin::router())
}
