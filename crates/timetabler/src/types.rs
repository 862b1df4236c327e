//! Shared application state.

use crate::api::ApiClient;
use crate::config::PlannerConfig;
use crate::runs::RunRegistry;

/// State shared by every endpoint: configuration, the backend client, and
/// the registry of recent generation runs.
pub struct PlannerState {
    pub config: PlannerConfig,
    pub api: ApiClient,
    pub runs: RunRegistry,
}

impl PlannerState {
    pub fn new(config: PlannerConfig) -> Result<Self, crate::api::ApiError> {
        let api = ApiClient::with_config(config.backend())?;
        Ok(Self {
            config,
            api,
            runs: RunRegistry::with_default_ttl(),
        })
    }
}
