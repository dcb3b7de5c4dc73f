//! # easel-hosting
//!
//! Student page generation and site deployment for easel.
//!
//! This crate provides:
//! - Escaped rendering of the student page template
//! - Atomic page writes into the deployable site directory
//! - Pluggable deployer trait with a hosting CLI implementation
//! - Deploy output parsing (structured JSON or plain text)
//! - Hosting API client for preview URL lookup
//! - Mock deployer for tests (feature `mock`)

pub mod deploy;
pub mod preview;
pub mod site;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export core types
pub use easel_core::{Error, Result};

pub use deploy::{parse_deploy_output, DeployTarget, Deployer, HostingCliDeployer};
pub use preview::HostingApiClient;
pub use site::{render_student_page, write_site};
