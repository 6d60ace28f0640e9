//! Configuration management for the `Packliste` application
//!
//! Loads settings from an optional TOML file with serde defaults, validates
//! them early, and resolves the generation backend credential with a fixed
//! precedence. Everything is carried in an explicitly constructed config
//! value; nothing lives in process-wide state.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::PacklisteError;

/// Root configuration structure for the `Packliste` application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PacklisteConfig {
    /// Generation backend configuration
    pub generation: GenerationConfig,
    /// Web server configuration
    pub server: ServerConfig,
}

/// Generation backend configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Model identifier sent with every request
    pub model: String,
    /// Sampling temperature, moderate by default for stable list style
    pub temperature: f32,
    /// Base URL of the chat completions API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Secrets TOML file checked when the environment has no key
    pub secrets_file: PathBuf,
    /// Directly injected API key, checked before all other sources
    ///
    /// Meant for tests, so credential handling is exercised without
    /// mutating the process environment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4".to_string(),
            temperature: 0.5,
            base_url: "https://api.openai.com".to_string(),
            timeout_seconds: 120,
            api_key_env: "OPENAI_API_KEY".to_string(),
            secrets_file: PathBuf::from(".secrets.toml"),
            api_key: None,
        }
    }
}

/// Web server configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port the HTTP boundary listens on
    pub port: u16,
    /// Directory served as the static frontend fallback
    pub frontend_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            frontend_dir: "frontend/dist".to_string(),
        }
    }
}

impl PacklisteConfig {
    /// Load configuration with fallback chain
    ///
    /// An explicit path must load; the default `packliste.toml` is used when
    /// present; otherwise built-in defaults apply.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()));
        }

        let local_config = Path::new("packliste.toml");
        if local_config.exists() {
            match Self::load_from_file(local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!(
                        "Failed to load config from {}: {}",
                        local_config.display(),
                        e
                    );
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = toml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Validate all configuration settings
    ///
    /// Call this early in startup to fail fast with clear error messages.
    pub fn validate(&self) -> Result<()> {
        if self.generation.model.trim().is_empty() {
            return Err(PacklisteError::config("Generation model must not be empty").into());
        }

        if !(0.0..=2.0).contains(&self.generation.temperature) {
            return Err(PacklisteError::config(
                "Generation temperature must be between 0.0 and 2.0",
            )
            .into());
        }

        if !self.generation.base_url.starts_with("http://")
            && !self.generation.base_url.starts_with("https://")
        {
            return Err(PacklisteError::config(
                "Generation base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        if self.generation.timeout_seconds == 0 || self.generation.timeout_seconds > 600 {
            return Err(PacklisteError::config(
                "Generation timeout must be between 1 and 600 seconds",
            )
            .into());
        }

        if self.generation.api_key_env.trim().is_empty() {
            return Err(PacklisteError::config(
                "API key environment variable name must not be empty",
            )
            .into());
        }

        Ok(())
    }
}

impl GenerationConfig {
    /// Resolve the backend API key
    ///
    /// Precedence: directly injected key, then the environment variable
    /// named by `api_key_env`, then the secrets file. Blank values never
    /// count as a key. Resolution happens once at process start, before
    /// any request can reach the backend.
    pub fn resolve_api_key(&self) -> crate::Result<String> {
        if let Some(key) = non_blank(self.api_key.as_deref()) {
            return Ok(key);
        }

        if let Ok(value) = std::env::var(&self.api_key_env) {
            if let Some(key) = non_blank(Some(&value)) {
                return Ok(key);
            }
        }

        if let Some(key) = self.key_from_secrets_file() {
            return Ok(key);
        }

        Err(PacklisteError::credentials(format!(
            "No API key found. Set the {} environment variable or add it to {}.",
            self.api_key_env,
            self.secrets_file.display()
        )))
    }

    /// Read the key from the secrets TOML file
    ///
    /// A missing, unreadable or malformed file counts as "no value from
    /// this source" so a broken fallback store never masks a key that the
    /// environment provides.
    fn key_from_secrets_file(&self) -> Option<String> {
        let content = match fs::read_to_string(&self.secrets_file) {
            Ok(content) => content,
            Err(_) => return None,
        };

        let secrets: toml::Value = match toml::from_str(&content) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(
                    "Ignoring malformed secrets file {}: {}",
                    self.secrets_file.display(),
                    e
                );
                return None;
            }
        };

        secrets
            .get(&self.api_key_env)
            .and_then(toml::Value::as_str)
            .and_then(|value| non_blank(Some(value)))
    }
}

/// Trim a candidate value and drop it when nothing remains
fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}
