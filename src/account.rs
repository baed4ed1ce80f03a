//! Opaque client for the companion account/sync service.
//!
//! Initialized once at startup when a project is configured. The generation
//! path never calls into it.

use crate::config::ProjectConfig;
use crate::error::{AntiGenError, Result};

/// Handle to the account/sync service.
pub struct AccountClient {
    client: reqwest::Client,
    project: ProjectConfig,
    offline_cache: bool,
}

impl AccountClient {
    /// Initializes the client from a fixed project configuration.
    ///
    /// The offline response cache stays disabled: concurrent clients sharing
    /// a cache directory corrupt each other's state.
    pub fn init(project: ProjectConfig) -> Result<Self> {
        if project.project_id.is_empty() {
            return Err(AntiGenError::Validation("project_id must not be empty".into()));
        }
        if project.api_key.is_empty() {
            return Err(AntiGenError::Validation("api_key must not be empty".into()));
        }

        tracing::info!(project_id = %project.project_id, "account service initialized");

        Ok(Self {
            client: reqwest::Client::new(),
            project,
            offline_cache: false,
        })
    }

    /// The configured project identifier.
    pub fn project_id(&self) -> &str {
        &self.project.project_id
    }

    /// Whether offline response caching is enabled.
    pub fn offline_cache(&self) -> bool {
        self.offline_cache
    }

    /// Checks that the service's auth domain is reachable.
    pub async fn health_check(&self) -> Result<()> {
        let url = format!("https://{}/", self.project.auth_domain);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status.is_server_error() {
            return Err(AntiGenError::Api {
                status: status.as_u16(),
                message: "account service unavailable".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> ProjectConfig {
        ProjectConfig {
            project_id: "demo".into(),
            api_key: "key".into(),
            auth_domain: "demo.firebaseapp.com".into(),
            storage_bucket: None,
            app_id: None,
        }
    }

    #[test]
    fn test_init_keeps_offline_cache_disabled() {
        let client = AccountClient::init(project()).unwrap();
        assert_eq!(client.project_id(), "demo");
        assert!(!client.offline_cache());
    }

    #[test]
    fn test_init_rejects_blank_config() {
        let mut bad = project();
        bad.project_id.clear();
        assert!(matches!(
            AccountClient::init(bad),
            Err(AntiGenError::Validation(_))
        ));
    }
}
