//! Error types for backend API operations.

use thiserror::Error;

/// Errors that can occur while talking to the schedule backend.
#[derive(Debug, Error, Clone)]
pub enum ApiError {
    /// Network/HTTP request failed
    #[error("Network error: {message}")]
    Network { message: String },

    /// Backend returned a non-success status
    #[error("Backend returned status {status}: {message}")]
    UnexpectedStatus { status: u16, message: String },

    /// Response body could not be decoded
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// Request body exceeds the allowed ceiling
    #[error("Payload too large: {size_mb:.2} MB exceeds the {limit_mb} MB ceiling")]
    PayloadTooLarge { size_mb: f64, limit_mb: u64 },

    /// Backend reported a submission as unsuccessful
    #[error("Submission rejected: {message}")]
    Rejected { message: String },

    /// A batch in a chunked submission failed; earlier batches are not
    /// rolled back
    #[error("Batch {batch}/{total} failed: {message}")]
    BatchFailed {
        batch: usize,
        total: usize,
        message: String,
    },

    /// Service configuration is invalid
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl ApiError {
    /// Returns true if this error indicates the request body was too big
    /// for the backend, meaning a chunked retry may succeed.
    pub fn is_payload_too_large(&self) -> bool {
        match self {
            ApiError::PayloadTooLarge { .. } => true,
            ApiError::UnexpectedStatus { status, message } => {
                *status == 413 || message_indicates_payload_too_large(message)
            }
            ApiError::Network { message } | ApiError::Rejected { message } => {
                message_indicates_payload_too_large(message)
            }
            _ => false,
        }
    }

    /// Returns true if this error is potentially transient and retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ApiError::Network { .. } | ApiError::UnexpectedStatus { .. }
        )
    }
}

/// Checks an error message for the markers the backend (or a proxy in
/// front of it) emits when a request body is over the limit.
pub fn message_indicates_payload_too_large(message: &str) -> bool {
    let lower = message.to_lowercase();
    message.contains("413")
        || lower.contains("payload too large")
        || lower.contains("request entity too large")
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            ApiError::UnexpectedStatus {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            ApiError::Network {
                message: err.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode {
            message: err.to_string(),
        }
    }
}
