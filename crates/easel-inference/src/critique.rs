//! Critique backend trait and the OpenAI-compatible implementation.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};

use easel_core::{defaults, CritiqueConfig, Error, Result};

use crate::types::*;

/// Result of an artwork critique.
///
/// Serializes as a bare string or an array of strings, depending on the
/// shape of the model reply.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Critique {
    Text(String),
    List(Vec<String>),
}

impl Critique {
    /// Interpret a raw model reply.
    ///
    /// A reply whose non-empty lines all carry bullet or number markers (and
    /// there are at least two of them) becomes a [`Critique::List`] with the
    /// markers stripped. Everything else is passed through as
    /// [`Critique::Text`], trimmed.
    pub fn from_reply(raw: &str) -> Self {
        let lines: Vec<&str> = raw
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        if lines.len() >= 2 {
            let items: Vec<String> = lines
                .iter()
                .filter_map(|l| strip_list_marker(l))
                .map(str::to_string)
                .collect();
            if items.len() == lines.len() {
                return Critique::List(items);
            }
        }

        Critique::Text(raw.trim().to_string())
    }

    /// Number of feedback items (1 for plain text).
    pub fn len(&self) -> usize {
        match self {
            Critique::Text(_) => 1,
            Critique::List(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Critique::Text(text) => text.is_empty(),
            Critique::List(items) => items.is_empty(),
        }
    }
}

/// Strip a leading bullet ("- ", "* ", "• ") or number ("1. ", "2) ") marker.
/// Returns `None` when the line has no marker.
fn strip_list_marker(line: &str) -> Option<&str> {
    for prefix in ["- ", "* ", "• "] {
        if let Some(rest) = line.strip_prefix(prefix) {
            return Some(rest.trim_start());
        }
    }

    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &line[digits..];
        for prefix in [". ", ") "] {
            if let Some(rest) = rest.strip_prefix(prefix) {
                return Some(rest.trim_start());
            }
        }
    }

    None
}

/// Backend for critiquing artwork images using vision LLMs.
#[async_trait]
pub trait CritiqueBackend: Send + Sync {
    /// Critique an image, optionally with a custom prompt.
    async fn critique_image(
        &self,
        image_data: &[u8],
        mime_type: &str,
        prompt: Option<&str>,
    ) -> Result<Critique>;

    /// Check if the critique backend is available.
    async fn health_check(&self) -> Result<bool>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}

/// OpenAI-compatible critique backend.
///
/// Sends the image as a base64 data URL inside a multimodal chat completion
/// request.
pub struct OpenAiCritiqueBackend {
    client: Client,
    config: CritiqueConfig,
}

impl OpenAiCritiqueBackend {
    /// Create a new critique backend with the given configuration.
    pub fn new(config: CritiqueConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Inference(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            "Initializing critique backend: url={}, model={}",
            config.base_url, config.model
        );

        Ok(Self { client, config })
    }

    /// Get the current configuration.
    pub fn config(&self) -> &CritiqueConfig {
        &self.config
    }

    /// Build a POST request with authentication.
    fn build_request(&self, endpoint: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint);
        self.client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
    }

    /// Build a GET request with authentication.
    fn build_get_request(&self, endpoint: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint);
        self.client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
    }
}

#[async_trait]
impl CritiqueBackend for OpenAiCritiqueBackend {
    async fn critique_image(
        &self,
        image_data: &[u8],
        mime_type: &str,
        prompt: Option<&str>,
    ) -> Result<Critique> {
        debug!(
            "Requesting critique with model {}, image size: {}",
            self.config.model,
            image_data.len()
        );

        use base64::Engine;
        let image_b64 = base64::engine::general_purpose::STANDARD.encode(image_data);
        let data_url = format!("data:{};base64,{}", mime_type, image_b64);

        // Caller text extends the fixed request text verbatim, it never
        // replaces it.
        let user_text = match prompt {
            Some(p) => format!("{} {}", defaults::CRITIQUE_DEFAULT_PROMPT, p),
            None => defaults::CRITIQUE_DEFAULT_PROMPT.to_string(),
        };

        let messages = vec![
            ChatMessage {
                role: "system".to_string(),
                content: MessageContent::Text(defaults::CRITIQUE_INSTRUCTION.to_string()),
            },
            ChatMessage {
                role: "user".to_string(),
                content: MessageContent::Parts(vec![
                    ContentPart::Text { text: user_text },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl { url: data_url },
                    },
                ]),
            },
        ];

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages,
            temperature: None,
            max_tokens: Some(self.config.max_tokens),
            stream: false,
        };

        let response = self
            .build_request("/chat/completions")
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Inference(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body: OpenAIErrorResponse = response.json().await.unwrap_or(OpenAIErrorResponse {
                error: OpenAIError {
                    message: "Unknown error".to_string(),
                    error_type: "unknown".to_string(),
                    code: None,
                },
            });
            return Err(Error::Inference(format!(
                "Critique API returned {}: {}",
                status, body.error.message
            )));
        }

        let result: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Inference(format!("Failed to parse response: {}", e)))?;

        let content = result
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(Error::Inference("Model returned an empty reply".to_string()));
        }

        debug!("Critique complete, response length: {}", content.len());
        Ok(Critique::from_reply(&content))
    }

    async fn health_check(&self) -> Result<bool> {
        // For OpenAI-compatible APIs, we try a minimal models list request
        let response = self
            .build_get_request("/models")
            .timeout(Duration::from_secs(5))
            .send()
            .await;

        match response {
            Ok(resp) => {
                if resp.status().is_success() {
                    info!("Critique backend health check passed");
                    Ok(true)
                } else {
                    warn!("Critique backend health check failed: {}", resp.status());
                    Ok(false)
                }
            }
            Err(e) => {
                warn!("Critique backend health check error: {}", e);
                Ok(false)
            }
        }
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
