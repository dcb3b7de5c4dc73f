//! # easel-inference
//!
//! Vision inference backend abstraction for easel.
//!
//! This crate provides:
//! - Pluggable critique backend trait
//! - OpenAI-compatible implementation (multimodal chat completions)
//! - Reply interpretation into plain-text or itemized critiques
//! - Mock backend for tests (feature `mock`)

pub mod critique;
pub mod types;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export core types
pub use easel_core::{Error, Result};

pub use critique::{Critique, CritiqueBackend, OpenAiCritiqueBackend};
