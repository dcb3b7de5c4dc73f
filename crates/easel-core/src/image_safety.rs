//! Image upload validation for the artwork intake path.
//!
//! Multi-layer protection:
//! 1. Magic byte detection for the real image format
//! 2. Allowlist of formats the critique model accepts
//! 3. Size cap enforcement
//!
//! Detection is magic-byte only. Binary image formats have well-defined
//! signatures, so a claimed `image/*` type without matching magic bytes means
//! the data does not match the claim. Such uploads are rejected instead of
//! being forwarded to the critique model.

use crate::{Error, Result};

/// Image MIME types accepted for critique. Matches the formats
/// OpenAI-compatible vision endpoints take as data URLs.
pub const SUPPORTED_IMAGE_TYPES: &[&str] =
    &["image/jpeg", "image/png", "image/webp", "image/gif"];

/// Detect the image MIME type from magic bytes.
///
/// Returns `None` when the data is not a recognizable image format. The
/// claimed multipart `Content-Type` is deliberately ignored; only the bytes
/// decide.
pub fn detect_image_type(data: &[u8]) -> Option<&'static str> {
    let kind = infer::get(data)?;
    let mime = kind.mime_type();
    if mime.starts_with("image/") {
        Some(mime)
    } else {
        None
    }
}

/// Returns true if the MIME type is one the critique model accepts.
pub fn is_supported_image(mime: &str) -> bool {
    SUPPORTED_IMAGE_TYPES.contains(&mime)
}

/// File extension for a supported image MIME type.
pub fn extension_for(mime: &str) -> &'static str {
    match mime {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "bin",
    }
}

/// Validate an artwork upload and return its detected MIME type.
///
/// Rejects empty data, oversized data, non-image data (including garbage
/// carrying an image extension or claimed type), and image formats outside
/// [`SUPPORTED_IMAGE_TYPES`].
pub fn validate_upload(data: &[u8], max_size_bytes: usize) -> Result<&'static str> {
    if data.is_empty() {
        return Err(Error::Validation("Uploaded image is empty".to_string()));
    }

    if data.len() > max_size_bytes {
        return Err(Error::Validation(format!(
            "Image exceeds maximum size of {} bytes",
            max_size_bytes
        )));
    }

    let mime = detect_image_type(data).ok_or_else(|| {
        Error::Validation("Upload is not a recognized image format".to_string())
    })?;

    if !is_supported_image(mime) {
        return Err(Error::Validation(format!(
            "Unsupported image format: {}",
            mime
        )));
    }

    Ok(mime)
}
