//! Endpoints for the generation workflow: preview (allocate only) and
//! generate (allocate, then submit to the backend).

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

use crate::api::{self, ApiError, SubmissionParams};
use crate::calendar;
use crate::model::{GenerateRequest, TrainingClass};
use crate::planner::{self, PlanOutcome, PlannerInput};
use crate::runs::RunId;
use crate::server::types::ApiErrorType;
use crate::types::PlannerState;

/// POST /preview
///
/// Runs the allocator without touching the backend; returns the would-be
/// assignments and the summary so the wizard can show the grid first.
pub async fn post_preview(
    State(s): State<Arc<PlannerState>>,
    Json(request): Json<GenerateRequest>,
) -> Response {
    info!(
        department_id = request.department_id,
        courses = request.courses.len(),
        "POST /preview"
    );

    let outcome = match build_plan(&s, &request).await {
        Ok(outcome) => outcome,
        Err((_, response)) => return response,
    };

    (
        StatusCode::OK,
        Json(json!({
            "summary": outcome.summary,
            "assignments": outcome.assignments,
        })),
    )
        .into_response()
}

/// POST /generate
///
/// The full workflow: allocate, then submit the assignment list to the
/// backend (batched when large), recording the run in the registry.
pub async fn post_generate(
    State(s): State<Arc<PlannerState>>,
    Json(request): Json<GenerateRequest>,
) -> Response {
    let run_id = match serde_json::to_vec(&request) {
        Ok(bytes) => RunId::from_request_bytes(&bytes),
        Err(e) => {
            return ApiErrorType::from((
                StatusCode::BAD_REQUEST,
                "Could not serialize request",
                Some(e.to_string()),
            ))
            .into_response()
        }
    };

    info!(
        run_id = %run_id,
        department_id = request.department_id,
        courses = request.courses.len(),
        "POST /generate"
    );
    s.runs.start(run_id.clone(), request.department_id);

    let outcome = match build_plan(&s, &request).await {
        Ok(outcome) => outcome,
        Err((reason, response)) => {
            s.runs.fail(&run_id, reason);
            return response;
        }
    };

    if outcome.assignments.is_empty() {
        // Nothing to persist; report the (empty) summary without a
        // backend round trip.
        s.runs.complete(&run_id, outcome.summary.clone(), false);
        return (
            StatusCode::OK,
            Json(json!({
                "run_id": run_id,
                "summary": outcome.summary,
                "submitted": false,
            })),
        )
            .into_response();
    }

    let params = SubmissionParams {
        department_id: request.department_id,
        semester_start: request.semester_start,
        total_weeks: request.total_weeks,
        generation_run_id: run_id.as_str().to_string(),
        notes: request.notes.clone(),
    };

    match api::submit_schedule(&s.api, &params, &outcome.assignments).await {
        Ok(backend_response) => {
            s.runs.complete(&run_id, outcome.summary.clone(), true);
            (
                StatusCode::OK,
                Json(json!({
                    "run_id": run_id,
                    "summary": outcome.summary,
                    "submitted": true,
                    "backend": backend_response,
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(run_id = %run_id, error = %e, "Schedule submission failed");
            s.runs.fail(&run_id, e.to_string());
            submit_error_to_response(e)
        }
    }
}

/// Validates a request and runs the planning pass over it.
///
/// Classes omitted from the request are loaded from the backend; events
/// are narrowed to the department before the planner sees them.
///
/// Failures carry the reason alongside the HTTP response so the run
/// registry can record what actually went wrong.
async fn build_plan(
    s: &Arc<PlannerState>,
    request: &GenerateRequest,
) -> Result<PlanOutcome, (String, Response)> {
    if let Err(message) = validate(request) {
        return Err((
            message.to_string(),
            ApiErrorType::from((StatusCode::UNPROCESSABLE_ENTITY, message, None)).into_response(),
        ));
    }

    let classes: Vec<TrainingClass> = if request.classes.is_empty() {
        s.api
            .classes_by_department(request.department_id)
            .await
            .map_err(|e| {
                (
                    format!("Failed to load reference data: {e}"),
                    load_error_to_response(&e),
                )
            })?
    } else {
        request.classes.clone()
    };

    let events = calendar::applicable_events(&request.events, request.department_id);

    Ok(planner::plan(&PlannerInput {
        courses: &request.courses,
        classes: &classes,
        events: &events,
        semester_start: request.semester_start,
        total_weeks: request.total_weeks,
        prioritize_morning: request.prioritize_morning,
    }))
}

fn validate(request: &GenerateRequest) -> Result<(), &'static str> {
    if request.department_id <= 0 {
        return Err("A department must be selected");
    }
    if request.total_weeks == 0 {
        return Err("total_weeks must be at least 1");
    }
    if request.courses.is_empty() {
        return Err("At least one course must be configured");
    }
    Ok(())
}

fn load_error_to_response(error: &ApiError) -> Response {
    ApiErrorType::from((
        StatusCode::BAD_GATEWAY,
        "Failed to load reference data",
        Some(error.to_string()),
    ))
    .into_response()
}

/// Maps a submission failure to an HTTP response.
fn submit_error_to_response(error: ApiError) -> Response {
    let (status, message) = match &error {
        ApiError::PayloadTooLarge { .. } => (
            StatusCode::PAYLOAD_TOO_LARGE,
            "Generated schedule is too large to submit",
        ),
        ApiError::BatchFailed { .. } => (
            StatusCode::BAD_GATEWAY,
            "Batch submission failed; earlier batches were not rolled back",
        ),
        ApiError::Rejected { .. } => (StatusCode::BAD_GATEWAY, "Backend rejected the schedule"),
        ApiError::Network { .. } | ApiError::UnexpectedStatus { .. } => {
            (StatusCode::BAD_GATEWAY, "Backend request failed")
        }
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Schedule submission failed",
        ),
    };

    ApiErrorType::from((status, message, Some(error.to_string()))).into_response()
}
