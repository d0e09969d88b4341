//! Ollama gateway adapter.
//!
//! Implements [`LlmGateway`] over Ollama's HTTP JSON API: the chat
//! completion endpoint (`POST /api/chat`, `stream: false`) and the model
//! listing endpoint (`GET /api/tags`). The backend is a plain
//! request/response collaborator; streaming and model lifecycle are out of
//! scope.

use async_trait::async_trait;
use foreman_application::ports::llm_gateway::{GatewayError, LlmGateway, ModelInfo};
use foreman_domain::Message;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default sampling options sent with every chat request.
const TEMPERATURE: f32 = 0.7;
const TOP_P: f32 = 0.9;
const TOP_K: u32 = 40;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f32,
    top_p: f32,
    top_k: u32,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Deserialize)]
struct TagEntry {
    name: String,
    #[serde(default)]
    size: u64,
}

/// Gateway to an Ollama-compatible inference server
pub struct OllamaGateway {
    client: reqwest::Client,
    base_url: String,
}

impl OllamaGateway {
    /// Create a gateway against `base_url` (e.g. `http://localhost:11434`).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn unavailable(&self, e: reqwest::Error) -> GatewayError {
        GatewayError::Unavailable(format!(
            "Could not reach the inference backend at {} ({}). \
             Is `ollama serve` running?",
            self.base_url, e
        ))
    }
}

#[async_trait]
impl LlmGateway for OllamaGateway {
    async fn chat(&self, model: &str, messages: &[Message]) -> Result<String, GatewayError> {
        let body = ChatRequest {
            model,
            messages: messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            stream: false,
            options: ChatOptions {
                temperature: TEMPERATURE,
                top_p: TOP_P,
                top_k: TOP_K,
            },
        };

        debug!(model, message_count = messages.len(), "Sending chat request");

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.unavailable(e))?;

        if !response.status().is_success() {
            return Err(GatewayError::RequestFailed(format!(
                "Backend answered {} for /api/chat",
                response.status()
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        Ok(parsed.message.content)
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, GatewayError> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
            .map_err(|e| self.unavailable(e))?;

        if !response.status().is_success() {
            return Err(GatewayError::RequestFailed(format!(
                "Backend answered {} for /api/tags",
                response.status()
            )));
        }

        let parsed: TagsResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        Ok(parsed
            .models
            .into_iter()
            .map(|m| ModelInfo::new(m.name, m.size))
            .collect())
    }
}
