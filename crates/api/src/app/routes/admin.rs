use std::sync::Arc;

use axum::{
    extract::Extension, http::StatusCode, response::IntoResponse, routing::post, Router,
};
use tracing::warn;

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/reset", post(reset))
}

/// Restore the seed catalog and drop all recorded movements.
pub async fn reset(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    warn!("catalog reset requested");
    match services.ledger.reset_catalog() {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
