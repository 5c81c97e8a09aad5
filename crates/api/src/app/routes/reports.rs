//! Read-only reports: demand forecast, reorder advice and integrity checks.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn forecast(
    Extension(services): Extension<Arc<AppServices>>,
    Path(key): Path<String>,
    query: Result<Query<dto::ForecastQuery>, QueryRejection>,
) -> axum::response::Response {
    let key = match errors::parse_item_key(&key) {
        Ok(k) => k,
        Err(resp) => return resp,
    };
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
    let horizon_days = query.horizon_days();

    match services.advisor.forecast_demand(&key, horizon_days) {
        Ok(forecast) => Json(json!({
            "item_key": key,
            "horizon_days": horizon_days,
            "forecast": forecast,
        }))
        .into_response(),
        Err(e) => errors::advisor_error_to_response(e),
    }
}

pub async fn reorder(
    Extension(services): Extension<Arc<AppServices>>,
    Path(key): Path<String>,
) -> axum::response::Response {
    let key = match errors::parse_item_key(&key) {
        Ok(k) => k,
        Err(resp) => return resp,
    };

    match services.advisor.recommend_reorder(&key) {
        Ok(rec) => Json(rec).into_response(),
        Err(e) => errors::advisor_error_to_response(e),
    }
}

pub async fn reorder_all(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.advisor.recommend_all() {
        Ok(recs) => Json(recs).into_response(),
        Err(e) => errors::advisor_error_to_response(e),
    }
}

pub async fn verify(
    Extension(services): Extension<Arc<AppServices>>,
    Path(key): Path<String>,
) -> axum::response::Response {
    let key = match errors::parse_item_key(&key) {
        Ok(k) => k,
        Err(resp) => return resp,
    };

    match services.verifier.verify(&key) {
        Ok(report) => Json(report).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn verify_all(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.verifier.verify_all() {
        Ok(reports) => Json(reports).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
