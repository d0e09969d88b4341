//! Persisted configuration document.
//!
//! A small JSON file holding the selected model, the backend URL, and the
//! working directory. Read once at startup through figment (defaults ←
//! file ← `FOREMAN_*` environment variables) and written back whenever one
//! of those values changes.

use figment::{
    providers::{Env, Format, Json, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// Default backend URL for a local Ollama install
const DEFAULT_BACKEND_URL: &str = "http://localhost:11434";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Failed to write configuration: {0}")]
    Write(#[from] std::io::Error),

    #[error("Failed to encode configuration: {0}")]
    Encode(#[from] serde_json::Error),
}

/// The persisted configuration document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ForemanConfig {
    /// Selected model name (empty until the operator picks one)
    pub model: String,
    /// Inference backend base URL
    pub backend_url: String,
    /// Sandbox root; None until a working directory is chosen
    pub working_dir: Option<PathBuf>,
}

impl Default for ForemanConfig {
    fn default() -> Self {
        Self {
            model: String::new(),
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            working_dir: None,
        }
    }
}

impl ForemanConfig {
    /// Load configuration: defaults, then the config file (if present),
    /// then `FOREMAN_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Self::config_path())
    }

    fn load_from(path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        if let Some(path) = path {
            if path.exists() {
                debug!(path = %path.display(), "Loading configuration file");
                figment = figment.merge(Json::file(path));
            }
        }

        figment = figment.merge(Env::prefixed("FOREMAN_"));

        figment.extract().map_err(|e| ConfigError::Load(Box::new(e)))
    }

    /// Write the document as pretty JSON, creating parent directories.
    pub fn save(&self) -> Result<(), ConfigError> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    fn save_to(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        debug!(path = %path.display(), "Configuration saved");
        Ok(())
    }

    /// The config file location under the user config dir.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("ollama-foreman").join("config.json"))
    }
}
