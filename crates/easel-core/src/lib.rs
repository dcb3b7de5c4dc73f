//! # easel-core
//!
//! Core types and abstractions for easel.
//!
//! This crate provides the configuration, error handling, validation, and
//! logging schema that the other easel crates depend on.

pub mod config;
pub mod defaults;
pub mod error;
pub mod image_safety;
pub mod logging;

// Re-export commonly used types at crate root
pub use config::{AppConfig, CritiqueConfig, HostingConfig, IntakeConfig, ServerConfig};
pub use error::{Error, Result};
pub use image_safety::{
    detect_image_type, extension_for, is_supported_image, validate_upload,
    SUPPORTED_IMAGE_TYPES,
};
