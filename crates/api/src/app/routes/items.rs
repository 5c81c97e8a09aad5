use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use crate::app::routes::reports;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_items))
        .route("/:key", get(get_item))
        .route("/:key/movements", post(apply_movement))
        .route("/:key/forecast", get(reports::forecast))
        .route("/:key/reorder", get(reports::reorder))
        .route("/:key/verify", get(reports::verify))
}

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.ledger.list_items() {
        Ok(items) => Json(items).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(key): Path<String>,
) -> axum::response::Response {
    let key = match errors::parse_item_key(&key) {
        Ok(k) => k,
        Err(resp) => return resp,
    };

    match services.ledger.get_item(&key) {
        Ok(item) => Json(item).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn apply_movement(
    Extension(services): Extension<Arc<AppServices>>,
    Path(key): Path<String>,
    body: Result<Json<dto::MovementRequest>, JsonRejection>,
) -> axum::response::Response {
    let key = match errors::parse_item_key(&key) {
        Ok(k) => k,
        Err(resp) => return resp,
    };
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "validation_error",
                rejection.body_text(),
            );
        }
    };

    match services
        .ledger
        .apply_movement(&key, body.magnitude, body.kind, body.reason)
    {
        Ok(receipt) => Json(receipt).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn list_movements(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<dto::HistoryQuery>, QueryRejection>,
) -> axum::response::Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(rejection) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "validation_error",
                rejection.body_text(),
            );
        }
    };
    let filter = match query.item.as_deref().map(errors::parse_item_key).transpose() {
        Ok(f) => f,
        Err(resp) => return resp,
    };

    match services.ledger.movement_history(filter.as_ref()) {
        Ok(movements) => Json(movements).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
