//! Health and run-status endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::sync::Arc;

use crate::runs::RunId;
use crate::server::types::ApiErrorType;
use crate::types::PlannerState;

/// GET /health
pub async fn get_health(State(s): State<Arc<PlannerState>>) -> Response {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "backend_url": s.config.backend_url,
            "runs_tracked": s.runs.len(),
        })),
    )
        .into_response()
}

/// GET /runs/:run_id
pub async fn get_run(
    Path(run_id): Path<String>,
    State(s): State<Arc<PlannerState>>,
) -> Response {
    match s.runs.get(&RunId::new(run_id)) {
        Some(record) => (StatusCode::OK, Json(record)).into_response(),
        None => ApiErrorType::from((StatusCode::NOT_FOUND, "Unknown run id", None)).into_response(),
    }
}
