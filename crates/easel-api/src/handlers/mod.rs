//! Handler modules for easel-api.
//!
//! This module contains the HTTP handlers for artwork analysis and student
//! page publishing.

pub mod analyze;
pub mod create_app;
