//! HTTP client for the schedule backend.
//!
//! All reference data (departments, classes, courses, events, constraints)
//! lives behind conventional list endpoints; each loader degrades to the
//! bundled sample data when the backend is unreachable so the planning
//! workflow stays usable offline. Submission goes through
//! [`super::submit`], which reuses this client's long-timeout handle.

use super::error::ApiError;
use super::fallback;
use crate::model::{Constraint, Course, Department, SpecialEvent, TrainingClass};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Configuration for the backend client.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL of the schedule backend, e.g. `http://localhost:8080/api`.
    pub base_url: String,
    /// Connect timeout for every request.
    pub connect_timeout: Duration,
    /// Total timeout for reference-data requests. Submission requests set
    /// their own per-request timeouts.
    pub request_timeout: Duration,
    /// When false, loader failures surface as errors instead of sample data.
    pub fallback_data: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            fallback_data: true,
        }
    }
}

/// Client for the institution's schedule backend.
pub struct ApiClient {
    /// Client with a bounded timeout, for reference loads
    client: Client,
    /// Client without a default timeout; submission sets one per request
    submit_client: Client,
    config: BackendConfig,
}

impl ApiClient {
    /// Creates a client with default configuration.
    pub fn new() -> Result<Self, ApiError> {
        Self::with_config(BackendConfig::default())
    }

    /// Creates a client with custom configuration.
    pub fn with_config(config: BackendConfig) -> Result<Self, ApiError> {
        // Fail fast on an unparseable base URL rather than on first use.
        Url::parse(&config.base_url).map_err(|e| ApiError::Config {
            message: format!("Invalid backend base URL {:?}: {}", config.base_url, e),
        })?;

        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::Network {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        let submit_client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| ApiError::Network {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            submit_client,
            config,
        })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// The no-default-timeout client used by the submission path.
    pub(crate) fn submit_client(&self) -> &Client {
        &self.submit_client
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Fetches a list endpoint and decodes its array response.
    async fn fetch_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let url = self.endpoint(path);
        debug!(url = %url, "Fetching reference data");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::UnexpectedStatus {
                status: status.as_u16(),
                message: body,
            });
        }

        let items: Vec<T> = response.json().await.map_err(|e| ApiError::Decode {
            message: e.to_string(),
        })?;
        Ok(items)
    }

    /// Runs a loader and masks failure with sample data when configured to.
    async fn load_or_fallback<T: DeserializeOwned>(
        &self,
        path: &str,
        sample: impl FnOnce() -> Vec<T>,
    ) -> Result<Vec<T>, ApiError> {
        match self.fetch_list(path).await {
            Ok(items) => Ok(items),
            Err(e) if self.config.fallback_data => {
                warn!(
                    path = %path,
                    error = %e,
                    retryable = e.is_retryable(),
                    "Reference load failed, serving sample data"
                );
                Ok(sample())
            }
            Err(e) => Err(e),
        }
    }

    pub async fn departments(&self) -> Result<Vec<Department>, ApiError> {
        self.load_or_fallback("departments", fallback::departments)
            .await
    }

    pub async fn classes(&self) -> Result<Vec<TrainingClass>, ApiError> {
        self.load_or_fallback("classes", || fallback::classes(None))
            .await
    }

    pub async fn classes_by_department(
        &self,
        department_id: i64,
    ) -> Result<Vec<TrainingClass>, ApiError> {
        self.load_or_fallback(&format!("classes/department/{department_id}"), || {
            fallback::classes(Some(department_id))
        })
        .await
    }

    pub async fn courses(&self) -> Result<Vec<Course>, ApiError> {
        self.load_or_fallback("courses", || fallback::courses(None))
            .await
    }

    pub async fn courses_by_department(
        &self,
        department_id: i64,
    ) -> Result<Vec<Course>, ApiError> {
        self.load_or_fallback(&format!("courses/department/{department_id}"), || {
            fallback::courses(Some(department_id))
        })
        .await
    }

    pub async fn events(&self) -> Result<Vec<SpecialEvent>, ApiError> {
        self.load_or_fallback("events", || fallback::events(None))
            .await
    }

    pub async fn events_by_department(
        &self,
        department_id: i64,
    ) -> Result<Vec<SpecialEvent>, ApiError> {
        self.load_or_fallback(&format!("events/department/{department_id}"), || {
            fallback::events(Some(department_id))
        })
        .await
    }

    pub async fn constraints(&self) -> Result<Vec<Constraint>, ApiError> {
        self.load_or_fallback("constraints", || fallback::constraints(None))
            .await
    }

    pub async fn constraints_by_department(
        &self,
        department_id: i64,
    ) -> Result<Vec<Constraint>, ApiError> {
        self.load_or_fallback(&format!("constraints/department/{department_id}"), || {
            fallback::constraints(Some(department_id))
        })
        .await
    }

    /// Persists a user-created custom event before generation.
    ///
    /// This is the only write the wizard performs outside schedule
    /// submission; there is no fallback, a failure here is surfaced.
    pub async fn create_event(&self, event: &SpecialEvent) -> Result<SpecialEvent, ApiError> {
        let url = self.endpoint("events");
        info!(name = %event.name, "Creating custom event");

        let response = self.client.post(&url).json(event).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::UnexpectedStatus {
                status: status.as_u16(),
                message: body,
            });
        }

        let created: SpecialEvent = response.json().await.map_err(|e| ApiError::Decode {
            message: e.to_string(),
        })?;
        Ok(created)
    }
}
