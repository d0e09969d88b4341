//! Infrastructure layer for ollama-foreman
//!
//! Adapters implementing the application ports against the outside world:
//! the Ollama HTTP gateway, the builtin tool registry with its filesystem,
//! process, and environment handlers, and the persisted JSON configuration
//! document.

pub mod config;
pub mod providers;
pub mod tools;

pub use config::{ConfigError, ForemanConfig};
pub use providers::ollama::OllamaGateway;
pub use tools::registry::ToolRegistry;
