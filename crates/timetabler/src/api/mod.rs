//! Backend API module: reference-data loaders and schedule submission.

mod client;
mod error;
mod fallback;
mod submit;

pub use client::{ApiClient, BackendConfig};
pub use error::ApiError;
pub use submit::{submit_schedule, SubmissionParams};
