//! Student page publishing HTTP handler.
//!
//! Renders the student page from the assignment prompt, writes it into the
//! site directory, runs the deploy command, and resolves the hosted URL from
//! the deploy output. A deploy reported as a bare version name needs one
//! extra hosting API lookup for its preview URL.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use easel_hosting::{parse_deploy_output, render_student_page, write_site, DeployTarget};

use crate::{ApiError, AppState};

/// Request body for publishing a student page.
#[derive(Debug, Deserialize)]
pub struct CreateAppRequest {
    /// Assignment prompt embedded into the generated page (required).
    pub prompt: Option<String>,
}

/// Response from publishing a student page.
#[derive(Debug, Serialize)]
pub struct CreateAppResponse {
    /// Public URL of the deployed page.
    pub url: String,
}

/// Generate and deploy a student page for an assignment prompt.
///
/// # Request Body
/// - `prompt`: Assignment text shown on the page and forwarded with each
///   analysis request (required, non-blank)
///
/// # Returns
/// - 200 OK with the deployed page URL
/// - 400 Bad Request if the prompt is missing or blank
/// - 500 Internal Server Error if rendering, deployment, or the URL lookup
///   fails
#[utoipa::path(post, path = "/create-app", tag = "Publishing",
    responses(
        (status = 200, description = "Deployed page URL"),
        (status = 400, description = "Missing prompt"),
        (status = 500, description = "Deployment failure"),
    ))]
pub async fn create_app(
    State(state): State<AppState>,
    Json(req): Json<CreateAppRequest>,
) -> Result<Json<CreateAppResponse>, ApiError> {
    let prompt = req.prompt.as_deref().map(str::trim).unwrap_or_default();
    if prompt.is_empty() {
        return Err(ApiError::BadRequest("Missing prompt".to_string()));
    }

    info!(prompt_len = prompt.len(), "Publishing student page");

    let html = render_student_page(prompt)?;
    write_site(&state.config.hosting.site_dir, &html)
        .await
        .map_err(|e| ApiError::Deployment(format!("Failed to write student page: {}", e)))?;

    let stdout = state.deployer.deploy().await?;
    let url = match parse_deploy_output(&stdout)? {
        DeployTarget::HostedUrl(url) => url,
        DeployTarget::Version(version) => {
            let api = state.hosting_api.as_ref().ok_or_else(|| {
                ApiError::Deployment(
                    "Deploy reported a version but no hosting API token is configured"
                        .to_string(),
                )
            })?;
            api.preview_url(&version).await.map_err(|e| match e {
                easel_core::Error::Deployment(msg) => ApiError::Deployment(msg),
                other => ApiError::Deployment(other.to_string()),
            })?
        }
    };

    info!(%url, "Student page deployed");
    Ok(Json(CreateAppResponse { url }))
}
