use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

/// Structured error body: `{"error": "<message>"}`.
///
/// Every public endpoint returns this shape on failure; storage detail never
/// leaks past here.
pub fn json_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (status, axum::Json(json!({ "error": message.into() }))).into_response()
}

/// Informational non-error body: `{"message": "<message>"}`.
pub fn json_message(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (status, axum::Json(json!({ "message": message.into() }))).into_response()
}
