//! Application configuration.
//!
//! All runtime settings live in one [`AppConfig`] built once at startup and
//! handed to the server state. Nothing below the composition root reads the
//! process environment.

use std::path::PathBuf;

use crate::{defaults, Error, Result};

/// Settings for the transient upload store.
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    /// Directory transient uploads are written to.
    pub upload_dir: PathBuf,
    /// Maximum accepted image size in bytes.
    pub max_upload_bytes: usize,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from(defaults::UPLOAD_DIR),
            max_upload_bytes: defaults::MAX_UPLOAD_SIZE_BYTES,
        }
    }
}

/// Settings for the critique inference backend.
#[derive(Debug, Clone)]
pub struct CritiqueConfig {
    /// Base URL for the OpenAI-compatible API endpoint.
    pub base_url: String,
    /// API key for authentication.
    pub api_key: String,
    /// Vision-capable model used for critique.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Upper bound on generated tokens per critique.
    pub max_tokens: u32,
}

impl Default for CritiqueConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::OPENAI_URL.to_string(),
            api_key: String::new(),
            model: defaults::CRITIQUE_MODEL.to_string(),
            timeout_secs: defaults::CRITIQUE_TIMEOUT_SECS,
            max_tokens: defaults::CRITIQUE_MAX_TOKENS,
        }
    }
}

/// Settings for page generation and site deployment.
#[derive(Debug, Clone)]
pub struct HostingConfig {
    /// Directory the student page is written to and deployed from.
    pub site_dir: PathBuf,
    /// Deploy command, whitespace-separated (program first).
    pub deploy_command: String,
    /// Deploy command timeout in seconds.
    pub deploy_timeout_secs: u64,
    /// Hosting project identifier.
    pub project: String,
    /// Hosting site identifier.
    pub site: String,
    /// Hosting REST API base URL.
    pub api_url: String,
    /// Bearer token for the hosting REST API. Preview URL lookup is
    /// disabled when `None`.
    pub api_token: Option<String>,
    /// Hosting API request timeout in seconds.
    pub api_timeout_secs: u64,
}

impl Default for HostingConfig {
    fn default() -> Self {
        Self {
            site_dir: PathBuf::from(defaults::SITE_DIR),
            deploy_command: defaults::DEPLOY_COMMAND.to_string(),
            deploy_timeout_secs: defaults::DEPLOY_TIMEOUT_SECS,
            project: defaults::HOSTING_PROJECT.to_string(),
            site: defaults::HOSTING_PROJECT.to_string(),
            api_url: defaults::HOSTING_API_URL.to_string(),
            api_token: None,
            api_timeout_secs: defaults::HOSTING_API_TIMEOUT_SECS,
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub intake: IntakeConfig,
    pub critique: CritiqueConfig,
    pub hosting: HostingConfig,
}

/// HTTP server bind settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::SERVER_HOST.to_string(),
            port: defaults::SERVER_PORT,
        }
    }
}

/// Read an env var and parse it, warning and falling back to the default on
/// malformed values.
fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                tracing::warn!(var = name, value = %val, "Invalid value, using default");
                default
            }
        },
        Err(_) => default,
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to
    /// defaults.
    ///
    /// The API key is the only required variable; everything else has a
    /// working default.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(defaults::ENV_OPENAI_API_KEY)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                Error::Config(format!("{} is not set", defaults::ENV_OPENAI_API_KEY))
            })?;

        let server = ServerConfig {
            host: std::env::var(defaults::ENV_HOST)
                .unwrap_or_else(|_| defaults::SERVER_HOST.to_string()),
            port: env_parse(defaults::ENV_PORT, defaults::SERVER_PORT),
        };

        let intake = IntakeConfig {
            upload_dir: std::env::var(defaults::ENV_UPLOAD_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(defaults::UPLOAD_DIR)),
            max_upload_bytes: env_parse(
                defaults::ENV_MAX_UPLOAD_SIZE_BYTES,
                defaults::MAX_UPLOAD_SIZE_BYTES,
            ),
        };

        let critique = CritiqueConfig {
            base_url: std::env::var(defaults::ENV_OPENAI_BASE_URL)
                .unwrap_or_else(|_| defaults::OPENAI_URL.to_string()),
            api_key,
            model: std::env::var(defaults::ENV_CRITIQUE_MODEL)
                .unwrap_or_else(|_| defaults::CRITIQUE_MODEL.to_string()),
            timeout_secs: env_parse(
                defaults::ENV_CRITIQUE_TIMEOUT,
                defaults::CRITIQUE_TIMEOUT_SECS,
            ),
            max_tokens: defaults::CRITIQUE_MAX_TOKENS,
        };

        let project = std::env::var(defaults::ENV_HOSTING_PROJECT)
            .unwrap_or_else(|_| defaults::HOSTING_PROJECT.to_string());
        let site =
            std::env::var(defaults::ENV_HOSTING_SITE).unwrap_or_else(|_| project.clone());

        let hosting = HostingConfig {
            site_dir: std::env::var(defaults::ENV_SITE_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(defaults::SITE_DIR)),
            deploy_command: std::env::var(defaults::ENV_DEPLOY_COMMAND)
                .unwrap_or_else(|_| defaults::DEPLOY_COMMAND.to_string()),
            deploy_timeout_secs: env_parse(
                defaults::ENV_DEPLOY_TIMEOUT,
                defaults::DEPLOY_TIMEOUT_SECS,
            ),
            project,
            site,
            api_url: std::env::var(defaults::ENV_HOSTING_API_URL)
                .unwrap_or_else(|_| defaults::HOSTING_API_URL.to_string()),
            api_token: std::env::var(defaults::ENV_HOSTING_API_TOKEN)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            api_timeout_secs: defaults::HOSTING_API_TIMEOUT_SECS,
        };

        Ok(Self {
            server,
            intake,
            critique,
            hosting,
        })
    }

    /// Socket address string for the HTTP listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
