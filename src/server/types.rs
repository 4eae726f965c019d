//! Shared response types for the API surface.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// A JSON API error: status code, a short message, and an optional detail
/// string for diagnostics.
pub struct ApiErrorType {
    pub status: StatusCode,
    pub message: String,
    pub detail: Option<String>,
}

impl From<(StatusCode, &str, Option<String>)> for ApiErrorType {
    fn from((status, message, detail): (StatusCode, &str, Option<String>)) -> Self {
        Self {
            status,
            message: message.to_string(),
            detail,
        }
    }
}

impl IntoResponse for ApiErrorType {
    fn into_response(self) -> Response {
        let mut body = json!({ "error": self.message });
        if let Some(detail) = self.detail {
            body["detail"] = json!(detail);
        }
        (self.status, Json(body)).into_response()
    }
}
