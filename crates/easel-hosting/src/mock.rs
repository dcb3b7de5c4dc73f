//! Mock deployer for testing.
//!
//! Returns canned CLI output and records call counts, so handler tests can
//! assert deploy behavior without shelling out.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use easel_core::{Error, Result};

use crate::deploy::Deployer;

/// Configurable mock deploy backend.
#[derive(Debug, Clone, Default)]
pub struct MockDeployer {
    stdout: String,
    failure: Option<String>,
    calls: Arc<AtomicUsize>,
}

impl MockDeployer {
    /// Mock whose deploy succeeds with the given stdout.
    pub fn succeeding(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            ..Self::default()
        }
    }

    /// Mock whose deploy fails with a deployment error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Number of times `deploy` was called.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Deployer for MockDeployer {
    async fn deploy(&self) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.failure {
            return Err(Error::Deployment(message.clone()));
        }
        Ok(self.stdout.clone())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}
