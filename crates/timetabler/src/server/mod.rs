use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::server::endpoints::{generate, reference, status};
use crate::types::PlannerState;

mod endpoints;
mod types;

/// Creates a router that can be used by `axum`.
///
/// # Parameters
/// - `app_state`: The app server state.
///
/// # Returns
/// The router.
pub fn create_router(app_state: Arc<PlannerState>) -> Router {
    // Reference-data proxies backing the wizard's dropdowns.
    let reference_router = Router::new()
        .route("/departments", get(reference::get_departments))
        .route("/classes", get(reference::get_all_classes))
        .route("/classes/:department_id", get(reference::get_classes))
        .route("/courses", get(reference::get_all_courses))
        .route("/courses/:department_id", get(reference::get_courses))
        .route(
            "/events",
            get(reference::get_all_events).post(reference::post_event),
        )
        .route("/events/:department_id", get(reference::get_events))
        .route("/constraints", get(reference::get_all_constraints))
        .route(
            "/constraints/:department_id",
            get(reference::get_constraints),
        );

    Router::new()
        .route("/health", get(status::get_health))
        .route("/preview", post(generate::post_preview))
        .route("/generate", post(generate::post_generate))
        .route("/runs/:run_id", get(status::get_run))
        .nest("/reference", reference_router)
        .with_state(app_state)
}
