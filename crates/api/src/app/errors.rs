use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stockguard_advisor::AdvisorError;
use stockguard_core::ItemKey;
use stockguard_inventory::LedgerError;

pub fn ledger_error_to_response(err: LedgerError) -> axum::response::Response {
    let code = err.code();
    match err {
        LedgerError::NotFound(_) => json_error(StatusCode::NOT_FOUND, code, err.to_string()),
        LedgerError::InsufficientStock {
            ref item_key,
            available,
            requested,
        } => (
            StatusCode::CONFLICT,
            axum::Json(json!({
                "error": code,
                "message": err.to_string(),
                "item_key": item_key,
                "available": available,
                "requested": requested,
            })),
        )
            .into_response(),
        LedgerError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, code, msg),
        LedgerError::Conflict(msg) => json_error(StatusCode::CONFLICT, code, msg),
        LedgerError::InvariantViolation(_) | LedgerError::Poisoned => {
            tracing::error!(error = %err, "ledger failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, code, err.to_string())
        }
    }
}

pub fn advisor_error_to_response(err: AdvisorError) -> axum::response::Response {
    match err {
        AdvisorError::Ledger(e) => ledger_error_to_response(e),
        AdvisorError::InvalidConfig(msg) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "invalid_config", msg)
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn parse_item_key(raw: &str) -> Result<ItemKey, axum::response::Response> {
    ItemKey::parse(raw).map_err(|e| json_error(StatusCode::BAD_REQUEST, "invalid_id", e.to_string()))
}
