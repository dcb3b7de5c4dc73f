//! Mock critique backend for deterministic testing.
//!
//! Implements [`CritiqueBackend`] with canned responses and a call log, so
//! handler tests can assert on what reached the backend without a live
//! inference server.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use easel_core::{Error, Result};

use crate::critique::{Critique, CritiqueBackend};

/// Mock critique backend for testing.
#[derive(Clone)]
pub struct MockCritiqueBackend {
    config: Arc<MockConfig>,
    call_log: Arc<Mutex<Vec<CritiqueCall>>>,
}

#[derive(Debug, Clone)]
struct MockConfig {
    model: String,
    response: Critique,
    fail_with: Option<String>,
    latency_ms: u64,
}

/// One recorded critique call.
#[derive(Debug, Clone)]
pub struct CritiqueCall {
    pub mime_type: String,
    pub image_len: usize,
    pub prompt: Option<String>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            model: "mock-vision".to_string(),
            response: Critique::Text("Mock critique".to_string()),
            fail_with: None,
            latency_ms: 0,
        }
    }
}

impl MockCritiqueBackend {
    /// Create a new mock backend with default configuration.
    pub fn new() -> Self {
        Self {
            config: Arc::new(MockConfig::default()),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set the critique returned by every call.
    pub fn with_response(mut self, response: Critique) -> Self {
        Arc::make_mut(&mut self.config).response = response;
        self
    }

    /// Set a plain-text critique returned by every call.
    pub fn with_text_response(self, text: impl Into<String>) -> Self {
        self.with_response(Critique::Text(text.into()))
    }

    /// Make every call fail with the given message.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).fail_with = Some(message.into());
        self
    }

    /// Set simulated latency for all operations.
    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        Arc::make_mut(&mut self.config).latency_ms = latency_ms;
        self
    }

    /// Get all logged calls for assertion.
    pub fn get_calls(&self) -> Vec<CritiqueCall> {
        self.call_log.lock().unwrap().clone()
    }

    /// Get number of critique calls.
    pub fn call_count(&self) -> usize {
        self.call_log.lock().unwrap().len()
    }
}

impl Default for MockCritiqueBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CritiqueBackend for MockCritiqueBackend {
    async fn critique_image(
        &self,
        image_data: &[u8],
        mime_type: &str,
        prompt: Option<&str>,
    ) -> Result<Critique> {
        self.call_log.lock().unwrap().push(CritiqueCall {
            mime_type: mime_type.to_string(),
            image_len: image_data.len(),
            prompt: prompt.map(str::to_string),
        });

        if self.config.latency_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(self.config.latency_ms)).await;
        }

        if let Some(message) = &self.config.fail_with {
            return Err(Error::Inference(message.clone()));
        }

        Ok(self.config.response.clone())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.config.fail_with.is_none())
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
