//! Reference-data proxy endpoints backing the wizard's dropdowns.
//!
//! These forward to the backend's list endpoints through the API client,
//! which masks backend failures with sample data when configured to.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;
use tracing::info;

use crate::api::ApiError;
use crate::model::SpecialEvent;
use crate::server::types::ApiErrorType;
use crate::types::PlannerState;

/// GET /reference/departments
pub async fn get_departments(State(s): State<Arc<PlannerState>>) -> Response {
    info!("GET /reference/departments");
    match s.api.departments().await {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(e) => load_error(e),
    }
}

/// GET /reference/classes
pub async fn get_all_classes(State(s): State<Arc<PlannerState>>) -> Response {
    info!("GET /reference/classes");
    match s.api.classes().await {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(e) => load_error(e),
    }
}

/// GET /reference/courses
pub async fn get_all_courses(State(s): State<Arc<PlannerState>>) -> Response {
    info!("GET /reference/courses");
    match s.api.courses().await {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(e) => load_error(e),
    }
}

/// GET /reference/events
pub async fn get_all_events(State(s): State<Arc<PlannerState>>) -> Response {
    info!("GET /reference/events");
    match s.api.events().await {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(e) => load_error(e),
    }
}

/// GET /reference/constraints
pub async fn get_all_constraints(State(s): State<Arc<PlannerState>>) -> Response {
    info!("GET /reference/constraints");
    match s.api.constraints().await {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(e) => load_error(e),
    }
}

/// GET /reference/classes/:department_id
pub async fn get_classes(
    Path(department_id): Path<i64>,
    State(s): State<Arc<PlannerState>>,
) -> Response {
    info!("GET /reference/classes/{}", department_id);
    match s.api.classes_by_department(department_id).await {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(e) => load_error(e),
    }
}

/// GET /reference/courses/:department_id
pub async fn get_courses(
    Path(department_id): Path<i64>,
    State(s): State<Arc<PlannerState>>,
) -> Response {
    info!("GET /reference/courses/{}", department_id);
    match s.api.courses_by_department(department_id).await {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(e) => load_error(e),
    }
}

/// GET /reference/events/:department_id
pub async fn get_events(
    Path(department_id): Path<i64>,
    State(s): State<Arc<PlannerState>>,
) -> Response {
    info!("GET /reference/events/{}", department_id);
    match s.api.events_by_department(department_id).await {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(e) => load_error(e),
    }
}

/// GET /reference/constraints/:department_id
pub async fn get_constraints(
    Path(department_id): Path<i64>,
    State(s): State<Arc<PlannerState>>,
) -> Response {
    info!("GET /reference/constraints/{}", department_id);
    match s.api.constraints_by_department(department_id).await {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(e) => load_error(e),
    }
}

/// POST /reference/events
///
/// Persists a custom event the user defined before generation. Unlike the
/// loaders this has no fallback: a failed write is surfaced.
pub async fn post_event(
    State(s): State<Arc<PlannerState>>,
    Json(event): Json<SpecialEvent>,
) -> Response {
    info!(name = %event.name, "POST /reference/events");
    match s.api.create_event(&event).await {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(e) => ApiErrorType::from((
            StatusCode::BAD_GATEWAY,
            "Failed to create event",
            Some(e.to_string()),
        ))
        .into_response(),
    }
}

fn load_error(error: ApiError) -> Response {
    ApiErrorType::from((
        StatusCode::BAD_GATEWAY,
        "Failed to load reference data",
        Some(error.to_string()),
    ))
    .into_response()
}
