//! Server configuration.
//!
//! Values come from an optional TOML file named by `AUREA_CONFIG`, then
//! environment overrides:
//!
//! | Variable | Field | Default |
//! |----------|-------|---------|
//! | `AUREA_BIND` | `bind` | `127.0.0.1:3000` |
//! | `AUREA_OLLAMA_URL` | `ollama_url` | `http://localhost:11434` |
//! | `AUREA_MODEL` | `model` | `gemma3:4b` |
//! | `AUREA_KEEP_ALIVE` | `keep_alive` | unset |
//! | `AUREA_MODE` | `mode` | `stream` |

use std::fmt;
use std::net::SocketAddr;
use std::path::Path;
use std::str::FromStr;

use aurea_provider_ollama::{DEFAULT_BASE_URL, DEFAULT_MODEL, Ollama};
use serde::Deserialize;

use crate::error::ConfigError;

/// Environment variable naming the TOML config file.
pub const CONFIG_PATH_VAR: &str = "AUREA_CONFIG";

/// How `POST /api/chat` replies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    /// Relay fragments as `data:` frames while the model generates.
    #[default]
    Stream,
    /// Wait for the full reply and return `{ "response": ... }`.
    Batch,
}

impl FromStr for ChatMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stream" => Ok(Self::Stream),
            "batch" => Ok(Self::Batch),
            _ => Err("expected `stream` or `batch`".into()),
        }
    }
}

impl fmt::Display for ChatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stream => f.write_str("stream"),
            Self::Batch => f.write_str("batch"),
        }
    }
}

/// Proxy configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Address the proxy listens on.
    pub bind: SocketAddr,
    /// Base URL of the Ollama server.
    pub ollama_url: String,
    /// Model requested from Ollama.
    pub model: String,
    /// Optional Ollama `keep_alive` duration.
    pub keep_alive: Option<String>,
    /// Reply variant for `POST /api/chat`.
    pub mode: ChatMode,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            ollama_url: DEFAULT_BASE_URL.into(),
            model: DEFAULT_MODEL.into(),
            keep_alive: None,
            mode: ChatMode::Stream,
        }
    }
}

impl ServerConfig {
    /// Load from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` in place of the process environment.
    pub fn load_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = match lookup(CONFIG_PATH_VAR) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        config.apply_env(lookup)?;
        Ok(config)
    }

    /// Read a TOML config file. Missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Parse a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Apply `AUREA_*` overrides found through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(value) = lookup("AUREA_BIND") {
            self.bind = value.parse().map_err(|e: std::net::AddrParseError| {
                ConfigError::InvalidValue {
                    key: "AUREA_BIND",
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?;
        }
        if let Some(value) = lookup("AUREA_OLLAMA_URL") {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "AUREA_OLLAMA_URL",
                    value,
                    reason: "must not be empty".into(),
                });
            }
            self.ollama_url = value;
        }
        if let Some(value) = lookup("AUREA_MODEL") {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "AUREA_MODEL",
                    value,
                    reason: "must not be empty".into(),
                });
            }
            self.model = value;
        }
        if let Some(value) = lookup("AUREA_KEEP_ALIVE") {
            self.keep_alive = Some(value).filter(|v| !v.is_empty());
        }
        if let Some(value) = lookup("AUREA_MODE") {
            self.mode = value
                .parse()
                .map_err(|reason| ConfigError::InvalidValue {
                    key: "AUREA_MODE",
                    value: value.clone(),
                    reason,
                })?;
        }
        Ok(())
    }

    /// Build the Ollama provider this config describes.
    pub fn provider(&self) -> Ollama {
        let provider = Ollama::new()
            .base_url(self.ollama_url.clone())
            .model(self.model.clone());
        match &self.keep_alive {
            Some(duration) => provider.keep_alive(duration.clone()),
            None => provider,
        }
    }
}
