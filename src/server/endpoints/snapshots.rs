//! Saved-schedule snapshot endpoints under `/schedule/snapshots`.

use axum::{
    extract::rejection::JsonRejection,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

use crate::db::{SnapshotError, SnapshotPatch};
use crate::server::identity::UserIdentity;
use crate::server::types::ApiErrorType;
use crate::types::AppState;

/// Converts a snapshot store error to an API response.
fn snapshot_error_to_response(error: SnapshotError) -> Response {
    let (status, message) = match &error {
        SnapshotError::EmptyName => (StatusCode::BAD_REQUEST, "Snapshot name cannot be empty"),
        SnapshotError::DuplicateName { .. } => {
            (StatusCode::CONFLICT, "A snapshot with this name already exists")
        }
        SnapshotError::NotFound => (StatusCode::NOT_FOUND, "Snapshot not found"),
        SnapshotError::Database(_) => {
            error!("Snapshot store failure: {}", error);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to access snapshot storage")
        }
    };
    ApiErrorType::from((status, message, Some(error.to_string()))).into_response()
}

/// Request body for creating a snapshot.
#[derive(Debug, Deserialize)]
pub struct CreateSnapshotRequest {
    pub name: String,
    #[serde(default)]
    pub class_ids: Vec<String>,
    #[serde(default)]
    pub total_credits: f64,
}

/// Partial update body; absent fields keep their stored values.
#[derive(Debug, Deserialize)]
pub struct UpdateSnapshotRequest {
    pub name: Option<String>,
    pub class_ids: Option<Vec<String>>,
    pub total_credits: Option<f64>,
}

fn bad_body(rejection: JsonRejection) -> Response {
    ApiErrorType::from((
        StatusCode::BAD_REQUEST,
        "Invalid request body",
        Some(rejection.body_text()),
    ))
    .into_response()
}

/// POST /schedule/snapshots
pub async fn post_snapshot(
    user: UserIdentity,
    State(s): State<Arc<AppState>>,
    payload: Result<Json<CreateSnapshotRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => return bad_body(rejection),
    };

    info!(user = %user.email, name = %request.name, "POST /schedule/snapshots");

    match s.snapshots.save(
        &user.email,
        &request.name,
        &request.class_ids,
        request.total_credits,
    ) {
        Ok(snapshot) => (StatusCode::CREATED, Json(snapshot.to_json())).into_response(),
        Err(e) => snapshot_error_to_response(e),
    }
}

/// GET /schedule/snapshots
pub async fn get_snapshots(user: UserIdentity, State(s): State<Arc<AppState>>) -> Response {
    match s.snapshots.list(&user.email) {
        Ok(snapshots) => {
            let snapshots: Vec<_> = snapshots.iter().map(|snap| snap.to_json()).collect();
            (StatusCode::OK, Json(json!({ "snapshots": snapshots }))).into_response()
        }
        Err(e) => snapshot_error_to_response(e),
    }
}

/// GET /schedule/snapshots/:snapshot_id
pub async fn get_snapshot(
    user: UserIdentity,
    Path(snapshot_id): Path<String>,
    State(s): State<Arc<AppState>>,
) -> Response {
    match s.snapshots.get(&user.email, &snapshot_id) {
        Ok(Some(snapshot)) => (StatusCode::OK, Json(snapshot.to_json())).into_response(),
        Ok(None) => snapshot_error_to_response(SnapshotError::NotFound),
        Err(e) => snapshot_error_to_response(e),
    }
}

/// PATCH /schedule/snapshots/:snapshot_id
pub async fn patch_snapshot(
    user: UserIdentity,
    Path(snapshot_id): Path<String>,
    State(s): State<Arc<AppState>>,
    payload: Result<Json<UpdateSnapshotRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => return bad_body(rejection),
    };

    info!(user = %user.email, snapshot = %snapshot_id, "PATCH /schedule/snapshots");

    let patch = SnapshotPatch {
        name: request.name,
        class_ids: request.class_ids,
        total_credits: request.total_credits,
    };

    match s.snapshots.update(&user.email, &snapshot_id, patch) {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot.to_json())).into_response(),
        Err(e) => snapshot_error_to_response(e),
    }
}

/// DELETE /schedule/snapshots/:snapshot_id
pub async fn delete_snapshot(
    user: UserIdentity,
    Path(snapshot_id): Path<String>,
    State(s): State<Arc<AppState>>,
) -> Response {
    info!(user = %user.email, snapshot = %snapshot_id, "DELETE /schedule/snapshots");

    match s.snapshots.delete(&user.email, &snapshot_id) {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => snapshot_error_to_response(SnapshotError::NotFound),
        Err(e) => snapshot_error_to_response(e),
    }
}
