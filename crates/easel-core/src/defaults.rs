//! Centralized default constants for the easel system.
//!
//! **This module is the single source of truth** for all shared default values.
//! All crates should reference these constants instead of defining their own
//! magic numbers.
//!
//! Organized by domain area. When adding new constants, place them in the
//! appropriate section and document the rationale for the chosen value.

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 3000;

/// Default HTTP server bind host.
pub const SERVER_HOST: &str = "0.0.0.0";

/// Default CORS max-age in seconds (1 hour).
pub const CORS_MAX_AGE_SECS: u64 = 3600;

// =============================================================================
// UPLOAD INTAKE
// =============================================================================

/// Default directory for transient artwork uploads.
pub const UPLOAD_DIR: &str = "uploads";

/// Maximum artwork upload size in bytes (10 MB).
/// Configurable via `MAX_UPLOAD_SIZE_BYTES` env var.
/// This limit is enforced at two layers:
/// 1. `RequestBodyLimitLayer` on the router (plus multipart overhead)
/// 2. `validate_upload()` size check in the analyze handler
pub const MAX_UPLOAD_SIZE_BYTES: usize = 10 * 1024 * 1024;

/// Slack added to the request body limit on top of the image cap, covering
/// multipart boundaries and the optional text fields of the form.
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

// =============================================================================
// CRITIQUE INFERENCE
// =============================================================================

/// Default OpenAI-compatible API endpoint.
pub const OPENAI_URL: &str = "https://api.openai.com/v1";

/// Default vision-capable model for artwork critique.
pub const CRITIQUE_MODEL: &str = "gpt-4o-mini";

/// Timeout for critique requests in seconds.
pub const CRITIQUE_TIMEOUT_SECS: u64 = 120;

/// Upper bound on generated critique length in tokens.
pub const CRITIQUE_MAX_TOKENS: u32 = 1024;

/// System instruction framing every critique request.
pub const CRITIQUE_INSTRUCTION: &str = "You are an art teacher reviewing a \
    student's artwork. Give brief, encouraging feedback on composition, color, \
    and technique, in language suitable for a young student.";

/// User-turn text sent when the request carries no custom prompt.
pub const CRITIQUE_DEFAULT_PROMPT: &str = "Please analyze this student's artwork.";

// =============================================================================
// SITE DEPLOYMENT
// =============================================================================

/// Default directory the student page is written to and deployed from.
pub const SITE_DIR: &str = "public";

/// Filename of the generated student page inside the site directory.
pub const STUDENT_PAGE_FILENAME: &str = "student.html";

/// Default deploy command. Split on whitespace; the first token is the
/// program, the rest are arguments.
pub const DEPLOY_COMMAND: &str = "firebase deploy --only hosting --json";

/// Timeout for a deploy command run in seconds (5 minutes).
pub const DEPLOY_TIMEOUT_SECS: u64 = 300;

/// Default hosting project identifier.
pub const HOSTING_PROJECT: &str = "vision-app-maker";

/// Default hosting REST API endpoint.
pub const HOSTING_API_URL: &str = "https://firebasehosting.googleapis.com";

/// Timeout for hosting API version lookups in seconds.
pub const HOSTING_API_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// SERVICE CONFIGURATION (environment variable names)
// =============================================================================

/// Environment variable for the HTTP bind host.
pub const ENV_HOST: &str = "HOST";

/// Environment variable for the HTTP port.
pub const ENV_PORT: &str = "PORT";

/// Environment variable for the OpenAI-compatible API key (required).
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// Environment variable for the OpenAI-compatible base URL.
pub const ENV_OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";

/// Environment variable for the critique model name.
pub const ENV_CRITIQUE_MODEL: &str = "CRITIQUE_MODEL";

/// Environment variable for the critique request timeout in seconds.
pub const ENV_CRITIQUE_TIMEOUT: &str = "CRITIQUE_TIMEOUT";

/// Environment variable for the transient upload directory.
pub const ENV_UPLOAD_DIR: &str = "UPLOAD_DIR";

/// Environment variable for the upload size cap in bytes.
pub const ENV_MAX_UPLOAD_SIZE_BYTES: &str = "MAX_UPLOAD_SIZE_BYTES";

/// Environment variable for the site output directory.
pub const ENV_SITE_DIR: &str = "SITE_DIR";

/// Environment variable overriding the deploy command.
pub const ENV_DEPLOY_COMMAND: &str = "DEPLOY_COMMAND";

/// Environment variable for the deploy command timeout in seconds.
pub const ENV_DEPLOY_TIMEOUT: &str = "DEPLOY_TIMEOUT";

/// Environment variable for the hosting project identifier.
pub const ENV_HOSTING_PROJECT: &str = "HOSTING_PROJECT";

/// Environment variable for the hosting site identifier (defaults to the
/// project identifier when unset).
pub const ENV_HOSTING_SITE: &str = "HOSTING_SITE";

/// Environment variable for the hosting API base URL.
pub const ENV_HOSTING_API_URL: &str = "HOSTING_API_URL";

/// Environment variable for the hosting API bearer token. Preview URL lookup
/// is disabled when unset.
pub const ENV_HOSTING_API_TOKEN: &str = "HOSTING_API_TOKEN";
