use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::server::endpoints::{schedule, snapshots, status};
use crate::types::AppState;

mod endpoints;
mod identity;
mod types;

/// Creates a router that can be used by `axum`.
///
/// # Parameters
/// - `app_state`: The app server state.
///
/// # Returns
/// The router.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    // Student-facing schedule construction endpoints.
    let schedule_router = Router::new()
        .route("/classes", get(schedule::get_classes))
        .route("/classes/:class_id", get(schedule::get_class_by_id))
        .route("/validate", post(schedule::post_validate))
        .route(
            "/user-requirements",
            get(schedule::get_user_requirements),
        )
        .route("/subjects", get(schedule::get_subjects))
        .route("/stats", get(schedule::get_stats))
        .route("/generate", post(schedule::post_generate))
        .route(
            "/snapshots",
            post(snapshots::post_snapshot).get(snapshots::get_snapshots),
        )
        .route(
            "/snapshots/:snapshot_id",
            get(snapshots::get_snapshot)
                .patch(snapshots::patch_snapshot)
                .delete(snapshots::delete_snapshot),
        )
        // Cache management endpoint
        .route(
            "/catalog/invalidate",
            post(schedule::post_invalidate_catalog),
        );

    Router::new()
        .route("/health", get(status::get_health))
        .nest("/schedule", schedule_router)
        .with_state(app_state)
}
