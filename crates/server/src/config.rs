//! # Application Configuration
//!
//! Loads the server configuration from an optional `config.yml` (with
//! `${ENV}` substitution) layered under environment variables. The only
//! secrets are the AI gateway key and the JWT secret; everything else has a
//! sensible default.

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::fs;
use tracing::info;

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates a required configuration file was not found.
    NotFound(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. Loaded from `PORT` env var.
    #[serde(default = "default_port")]
    pub port: u16,
    /// The path to the SQLite database file. Loaded from `DB_URL` env var.
    #[serde(default = "default_db_url")]
    pub db_url: String,
    /// The AI gateway the summarization pipeline talks to.
    pub ai: AiConfig,
}

/// Configuration for the hosted AI gateway.
#[derive(Debug, Deserialize, Clone)]
pub struct AiConfig {
    /// The chat-completions URL of the gateway.
    pub api_url: String,
    /// Bearer token for the gateway. Loaded from `AI_API_KEY` when absent
    /// from the file.
    #[serde(default)]
    pub api_key: Option<String>,
    /// The fixed model identifier sent with every request.
    #[serde(default = "default_model_name")]
    pub model_name: String,
}

fn default_port() -> u16 {
    8080
}

fn default_db_url() -> String {
    "db/pharmalens.db".to_string()
}

fn default_model_name() -> String {
    "google/gemini-2.5-flash".to_string()
}

// Helper to read a file, substitute env vars, and return its content.
// Returns Ok(None) if the file does not exist, or an error if it fails to read.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !std::path::Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}").unwrap();
    let expanded_content = re.replace_all(&content, |caps: &regex::Captures| {
        let var_name = &caps["var"];
        env::var(var_name).unwrap_or_else(|_| "".to_string())
    });

    Ok(Some(expanded_content.to_string()))
}

/// Loads the application configuration.
///
/// Layering, lowest to highest precedence:
/// 1. An optional `config.yml` next to the crate (or the override path),
///    with `${VAR}` placeholders substituted from the environment.
/// 2. Top-level environment variables (`PORT`, `DB_URL`).
/// 3. Prefixed environment variables for nested keys, e.g.
///    `PHARMALENS_AI__API_URL`.
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = ConfigBuilder::builder();

    let config_path = match config_path_override {
        Some(path) => path.to_string(),
        None => format!("{}/config.yml", env!("CARGO_MANIFEST_DIR")),
    };

    if let Some(content) = read_and_substitute(&config_path)? {
        info!("Loading configuration from '{config_path}'.");
        builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
    } else if config_path_override.is_some() {
        return Err(ConfigError::NotFound(format!(
            "Config file not found at '{config_path}'."
        )));
    }

    let settings = builder
        .add_source(Environment::default())
        .add_source(
            Environment::with_prefix("PHARMALENS")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    let mut config: AppConfig = settings.try_deserialize()?;

    // An empty key means the ${VAR} placeholder had nothing to substitute.
    if config.ai.api_key.as_deref() == Some("") {
        config.ai.api_key = None;
    }
    // The gateway key usually arrives via the environment rather than the
    // file, so check it explicitly as a last resort.
    if config.ai.api_key.is_none() {
        if let Ok(key) = env::var("AI_API_KEY") {
            if !key.is_empty() {
                config.ai.api_key = Some(key);
            }
        }
    }

    Ok(config)
}
