//! User identity extraction.
//!
//! Authentication terminates upstream; requests arrive with a trusted
//! `x-user-email` header identifying the student. Handlers that need the
//! caller's identity take `UserIdentity`; handlers where enrichment is
//! optional take `Option<UserIdentity>`.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub const IDENTITY_HEADER: &str = "x-user-email";

/// The authenticated user, as asserted by the upstream proxy.
#[derive(Debug, Clone)]
pub struct UserIdentity {
    pub email: String,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for UserIdentity
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let email = parts
            .headers
            .get(IDENTITY_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .unwrap_or("");

        if email.is_empty() {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Missing x-user-email header" })),
            )
                .into_response());
        }

        Ok(UserIdentity {
            email: email.to_string(),
        })
    }
}
