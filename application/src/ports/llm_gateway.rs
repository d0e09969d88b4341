//! LLM Gateway port
//!
//! Defines the interface for communicating with the inference backend.
//! The backend is treated strictly as a request/response collaborator;
//! streaming and backend lifecycle are out of scope.

use async_trait::async_trait;
use foreman_domain::Message;
use thiserror::Error;

/// Errors that can occur during gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The backend could not be reached at all. Carries remediation
    /// guidance for the operator.
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// The backend answered with a failure status
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The backend answered with an unexpected payload shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// An installed model, as reported by the backend's listing endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    pub name: String,
    pub size_bytes: u64,
}

impl ModelInfo {
    pub fn new(name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            size_bytes,
        }
    }
}

/// Gateway for chat-completion style inference
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Send an ordered message sequence and return the assistant reply text.
    async fn chat(&self, model: &str, messages: &[Message]) -> Result<String, GatewayError>;

    /// List the models installed on the backend.
    async fn list_models(&self) -> Result<Vec<ModelInfo>, GatewayError>;
}
