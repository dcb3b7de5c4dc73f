//! Hosting REST API client for preview URL lookup.
//!
//! A deploy reported as a version name (structured CLI output) does not
//! carry the public URL; this client resolves it by fetching the version
//! record from the hosting provider's API.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use easel_core::config::HostingConfig;
use easel_core::{Error, Result};

/// Version record returned by the hosting API.
#[derive(Debug, Deserialize)]
pub struct VersionResponse {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub config: Option<VersionConfig>,
}

/// The `config` block of a version record, carrying the preview URL.
#[derive(Debug, Deserialize)]
pub struct VersionConfig {
    #[serde(rename = "previewUrl", default)]
    pub preview_url: Option<String>,
}

/// Authenticated client for hosting version lookups.
pub struct HostingApiClient {
    client: Client,
    base_url: String,
    token: String,
    project: String,
    site: String,
}

impl HostingApiClient {
    /// Build a client from hosting configuration.
    ///
    /// Returns `None` when no API token is configured, which disables
    /// preview URL lookup.
    pub fn from_config(config: &HostingConfig) -> Result<Option<Self>> {
        let token = match &config.api_token {
            Some(token) => token.clone(),
            None => return Ok(None),
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .build()
            .map_err(|e| Error::Deployment(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Some(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token,
            project: config.project.clone(),
            site: config.site.clone(),
        }))
    }

    /// Fetch the preview URL for a deployed version.
    pub async fn preview_url(&self, version: &str) -> Result<String> {
        let url = format!(
            "{}/v1beta1/projects/{}/sites/{}/versions/{}",
            self.base_url, self.project, self.site, version
        );
        debug!(%url, "Fetching preview URL for deployed version");

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::Deployment(format!(
                "Hosting API returned {}: {}",
                status,
                body.trim()
            )));
        }

        let version_info: VersionResponse = response.json().await?;
        version_info
            .config
            .and_then(|config| config.preview_url)
            .ok_or_else(|| {
                Error::Deployment("Hosting API response has no preview URL".to_string())
            })
    }
}
