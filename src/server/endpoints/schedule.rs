//! Catalog and generation endpoints under `/schedule`.

use axum::{
    extract::rejection::JsonRejection,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::catalog::{
    search, validate_schedule, ClassSection, SearchFilters, DEFAULT_LIMIT, MAX_LIMIT,
};
use crate::evaluation::ParsedEvaluation;
use crate::generate;
use crate::requirements::{enrich_classes, extract_user_requirements, is_eecs_program};
use crate::server::identity::UserIdentity;
use crate::server::types::ApiErrorType;
use crate::types::AppState;

fn default_include_requirements() -> bool {
    true
}

/// Query parameters for class search.
#[derive(Debug, Deserialize)]
pub struct ClassQueryParams {
    pub search: Option<String>,
    /// Comma-separated day codes, e.g. "M,W,F".
    pub days: Option<String>,
    pub time_start: Option<u32>,
    pub time_end: Option<u32>,
    pub credits_min: Option<f64>,
    pub credits_max: Option<f64>,
    pub subject: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    #[serde(default = "default_include_requirements")]
    pub include_requirements: bool,
}

/// Fetches the user's evaluation, degrading to `None` on provider failure.
async fn evaluation_for(state: &Arc<AppState>, user_id: &str) -> Option<ParsedEvaluation> {
    match state.evaluations.get_evaluation(user_id).await {
        Ok(evaluation) => evaluation,
        Err(e) => {
            warn!(user = %user_id, error = %e, "Evaluation lookup failed, skipping enrichment");
            None
        }
    }
}

/// Annotates classes with the user's requirement badges. Enrichment is
/// best-effort; a missing evaluation returns the classes untouched.
async fn enrich_for_user(
    state: &Arc<AppState>,
    user_id: &str,
    classes: Vec<ClassSection>,
) -> Vec<ClassSection> {
    let Some(evaluation) = evaluation_for(state, user_id).await else {
        return classes;
    };

    let requirements = extract_user_requirements(&evaluation);
    let mut enriched = enrich_classes(&classes, &requirements);
    state
        .programs
        .apply_eecs_badges(&mut enriched, evaluation.program_name());
    enriched
}

/// GET /schedule/classes
/// Searches the catalog with optional requirement enrichment.
pub async fn get_classes(
    identity: Option<UserIdentity>,
    Query(params): Query<ClassQueryParams>,
    State(s): State<Arc<AppState>>,
) -> Response {
    let filters = SearchFilters {
        query: params.search,
        days: params.days.map(|d| {
            d.split(',')
                .map(|day| day.trim().to_string())
                .filter(|day| !day.is_empty())
                .collect()
        }),
        time_start: params.time_start,
        time_end: params.time_end,
        credits_min: params.credits_min,
        credits_max: params.credits_max,
        subject: params.subject,
        limit: params.limit,
        offset: params.offset,
    };

    let catalog = s.catalog.load_all();
    let (page, total) = search(&catalog, &filters);

    let limit = filters.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let offset = filters.offset.unwrap_or(0);
    info!(total = total, returned = page.len(), "GET /schedule/classes");

    let classes = match (&identity, params.include_requirements) {
        (Some(user), true) => enrich_for_user(&s, &user.email, page).await,
        _ => page,
    };

    (
        StatusCode::OK,
        Json(json!({
            "classes": classes,
            "total": total,
            "limit": limit,
            "offset": offset,
        })),
    )
        .into_response()
}

/// GET /schedule/classes/:class_id
pub async fn get_class_by_id(
    identity: Option<UserIdentity>,
    Path(class_id): Path<String>,
    State(s): State<Arc<AppState>>,
) -> Response {
    info!("GET /schedule/classes/{}", class_id);

    let Some(class) = s.catalog.get_by_id(&class_id) else {
        return ApiErrorType::from((StatusCode::NOT_FOUND, "Class not found", None))
            .into_response();
    };

    let class = match &identity {
        Some(user) => {
            let mut enriched = enrich_for_user(&s, &user.email, vec![class]).await;
            enriched.remove(0)
        }
        None => class,
    };

    (StatusCode::OK, Json(class)).into_response()
}

/// Request body for schedule validation.
#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    #[serde(default)]
    pub classes: Vec<String>,
}

/// POST /schedule/validate
/// Checks a proposed schedule for time conflicts and credit-load warnings.
pub async fn post_validate(
    State(s): State<Arc<AppState>>,
    payload: Result<Json<ValidateRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => {
            return ApiErrorType::from((
                StatusCode::BAD_REQUEST,
                "Invalid request body",
                Some(rejection.body_text()),
            ))
            .into_response();
        }
    };

    info!(classes = request.classes.len(), "POST /schedule/validate");
    let classes = s.catalog.get_by_ids(&request.classes);
    let validation = validate_schedule(&classes);

    (StatusCode::OK, Json(validation)).into_response()
}

/// GET /schedule/user-requirements
/// The user's remaining degree requirements, grouped by type.
pub async fn get_user_requirements(
    user: UserIdentity,
    State(s): State<Arc<AppState>>,
) -> Response {
    info!(user = %user.email, "GET /schedule/user-requirements");

    let mut requirements = Vec::new();
    if let Some(evaluation) = evaluation_for(&s, &user.email).await {
        requirements = extract_user_requirements(&evaluation);

        // Curriculum-derived requirements supplement the evaluation for
        // EECS students; existing labels win.
        if is_eecs_program(evaluation.program_name()) {
            for req in s.programs.eecs_degree_requirements() {
                if !requirements.iter().any(|r| r.label == req.label) {
                    requirements.push(req);
                }
            }
        }
    }

    let mut by_type: BTreeMap<&str, usize> = BTreeMap::new();
    for req in &requirements {
        *by_type.entry(req.requirement_type.as_str()).or_default() += 1;
    }

    (
        StatusCode::OK,
        Json(json!({
            "total": requirements.len(),
            "byType": by_type,
            "requirements": requirements,
        })),
    )
        .into_response()
}

/// GET /schedule/subjects
pub async fn get_subjects(State(s): State<Arc<AppState>>) -> Response {
    (
        StatusCode::OK,
        Json(json!({ "subjects": s.catalog.subjects() })),
    )
        .into_response()
}

/// GET /schedule/stats
pub async fn get_stats(State(s): State<Arc<AppState>>) -> Response {
    let stats = s.catalog.stats();
    (
        StatusCode::OK,
        Json(json!({
            "totalClasses": stats.total_classes,
            "subjects": stats.subject_count,
            "avgCredits": stats.avg_credits,
        })),
    )
        .into_response()
}

/// POST /schedule/generate
/// Builds a conflict-free schedule for the user. Generation failures are
/// reported in-band; only a fully empty outcome becomes a 500.
pub async fn post_generate(user: UserIdentity, State(s): State<Arc<AppState>>) -> Response {
    info!(user = %user.email, "POST /schedule/generate");

    let preferences = s.evaluations.get_preferences(&user.email).await;
    let evaluation = evaluation_for(&s, &user.email).await;

    let outcome = generate::generate_schedule(
        &s.oracle,
        &s.programs,
        &s.catalog,
        &preferences,
        evaluation.as_ref(),
    )
    .await;

    if outcome.class_ids.is_empty() {
        let message = outcome
            .error
            .unwrap_or_else(|| "Schedule generation failed".to_string());
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": message, "class_ids": [] })),
        )
            .into_response();
    }

    (
        StatusCode::OK,
        Json(json!({
            "class_ids": outcome.class_ids,
            "message": outcome.error,
        })),
    )
        .into_response()
}

/// POST /schedule/catalog/invalidate
/// Drops the memoized catalog so the next request reloads from disk.
pub async fn post_invalidate_catalog(State(s): State<Arc<AppState>>) -> Response {
    info!("POST /schedule/catalog/invalidate");
    s.catalog.invalidate();
    (
        StatusCode::OK,
        Json(json!({ "message": "Catalog cache invalidated" })),
    )
        .into_response()
}
