/// Service configuration
use crate::api::BackendConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Top-level planner service configuration.
///
/// Loaded from a JSON file, with environment overrides for the two values
/// that differ between deployments (`TIMETABLER_BIND`,
/// `TIMETABLER_BACKEND_URL`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Address the service listens on.
    pub bind_address: String,
    /// Base URL of the schedule backend.
    pub backend_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// Serve bundled sample data when a reference load fails.
    pub fallback_data: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            backend_url: "http://localhost:8080/api".to_string(),
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            fallback_data: true,
        }
    }
}

impl PlannerConfig {
    /// Loads configuration from a JSON file.
    pub fn load_from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let config: PlannerConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Applies environment-variable overrides on top of the loaded values.
    pub fn apply_env_overrides(mut self) -> Self {
        if let Ok(bind) = std::env::var("TIMETABLER_BIND") {
            self.bind_address = bind;
        }
        if let Ok(url) = std::env::var("TIMETABLER_BACKEND_URL") {
            self.backend_url = url;
        }
        self
    }

    /// The backend-client view of this configuration.
    pub fn backend(&self) -> BackendConfig {
        BackendConfig {
            base_url: self.backend_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            fallback_data: self.fallback_data,
        }
    }
}
