//! Session tuning and project configuration.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Tuning knobs for a generation session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Hard deadline for one attempt.
    pub timeout: Duration,
    /// Simulated progress tick interval.
    pub tick_interval: Duration,
    /// Pause between the completion message and revealing the image.
    pub reveal_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(40),
            tick_interval: crate::progress::TICK_INTERVAL,
            reveal_delay: Duration::from_millis(500),
        }
    }
}

impl SessionConfig {
    /// Sets the attempt deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Fixed project configuration for the companion account/sync service.
///
/// The generation path never reads this; it only feeds
/// [`AccountClient::init`](crate::account::AccountClient::init) at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project identifier.
    pub project_id: String,
    /// API key for the service.
    pub api_key: String,
    /// Hostname the service authenticates against.
    pub auth_domain: String,
    /// Storage bucket, when the project has one.
    #[serde(default)]
    pub storage_bucket: Option<String>,
    /// Registered application id.
    #[serde(default)]
    pub app_id: Option<String>,
}

impl ProjectConfig {
    /// Loads the configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Reads the configuration from `ANTIGEN_*` environment variables.
    ///
    /// Returns `None` when no project is configured, which is the normal
    /// case for standalone generation.
    pub fn from_env() -> Option<Self> {
        let project_id = std::env::var("ANTIGEN_PROJECT_ID").ok()?;
        let api_key = std::env::var("ANTIGEN_API_KEY").ok()?;
        let auth_domain = std::env::var("ANTIGEN_AUTH_DOMAIN")
            .unwrap_or_else(|_| format!("{project_id}.firebaseapp.com"));
        Some(Self {
            project_id,
            api_key,
            auth_domain,
            storage_bucket: std::env::var("ANTIGEN_STORAGE_BUCKET").ok(),
            app_id: std::env::var("ANTIGEN_APP_ID").ok(),
        })
    }
}
