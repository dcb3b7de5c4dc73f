//! Artwork analysis HTTP handler.
//!
//! Accepts a multipart artwork upload, stores it transiently, dispatches it
//! to the critique backend, and removes the stored file before responding,
//! on success and on failure alike.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tracing::{info, warn};

use easel_inference::Critique;

use crate::uploads::TransientUpload;
use crate::{ApiError, AppState};

/// Response from artwork analysis.
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    /// Critique text: a string, or a list of strings when the model answers
    /// with itemized feedback.
    pub analysis: Critique,
}

/// Analyze a student's artwork using the configured critique backend.
///
/// Accepts multipart/form-data with an image file and returns critique text.
///
/// # Multipart Fields
/// - `image`: Artwork image file (required)
/// - `prompt`: Assignment prompt forwarded to the critique model (optional)
///
/// # Returns
/// - 200 OK with critique text
/// - 400 Bad Request if the image is missing, empty, oversized, or not a
///   supported image format
/// - 500 Internal Server Error if the critique call fails
#[utoipa::path(post, path = "/analyze", tag = "Analysis",
    responses(
        (status = 200, description = "Artwork critique"),
        (status = 400, description = "Missing or invalid image"),
        (status = 500, description = "Critique backend failure"),
    ))]
pub async fn analyze_artwork(
    State(state): State<AppState>,
    mut multipart: axum::extract::Multipart,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let mut image_data: Option<Vec<u8>> = None;
    let mut prompt: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Multipart error: {}", e)))?
    {
        let field_name = field.name().map(|n| n.to_string());
        match field_name.as_deref() {
            Some("image") => {
                image_data = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::BadRequest(format!("Read error: {}", e)))?
                        .to_vec(),
                );
            }
            Some("prompt") => {
                let val = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Read error: {}", e)))?;
                if !val.trim().is_empty() {
                    prompt = Some(val.trim().to_string());
                }
            }
            _ => {} // ignore unknown fields
        }
    }

    let image_bytes =
        image_data.ok_or_else(|| ApiError::BadRequest("No image uploaded".to_string()))?;

    let upload = state.uploads.store(&image_bytes).await?;
    info!(upload_id = %upload.id, size = upload.size, mime_type = upload.mime_type, "Analyzing artwork");

    // The upload is removed before the response leaves, whatever the
    // critique outcome.
    let outcome = critique_stored_upload(&state, &upload, prompt.as_deref()).await;

    if let Err(e) = upload.remove().await {
        warn!(error = %e, "Failed to remove transient upload");
    }

    let critique = outcome?;
    Ok(Json(AnalyzeResponse { analysis: critique }))
}

/// Read the stored upload back and dispatch it for critique.
async fn critique_stored_upload(
    state: &AppState,
    upload: &TransientUpload,
    prompt: Option<&str>,
) -> Result<Critique, ApiError> {
    let data = upload
        .read()
        .await
        .map_err(|e| ApiError::Inference(e.to_string()))?;

    state
        .critique
        .critique_image(&data, upload.mime_type, prompt)
        .await
        .map_err(|e| match e {
            easel_core::Error::Inference(msg) => ApiError::Inference(msg),
            other => ApiError::Inference(other.to_string()),
        })
}
