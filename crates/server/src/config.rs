//! # Application Configuration
//!
//! Loads the server configuration from an optional `config.yml` plus
//! environment variables (`.env` supported via `dotenvy` in `start`).
//! The three opaque credentials — LINE channel access token, LINE channel
//! secret, and the model API key — are required; the process refuses to
//! start without them.

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use serde::Deserialize;

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    General(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
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
    /// The port for the server to listen on. Loaded from `PORT`.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Path to the FAQ knowledge-base JSON. Loaded from `FAQ_PATH`.
    #[serde(default = "default_faq_path")]
    pub faq_path: String,
    /// LINE channel access token, for dispatching replies.
    pub line_channel_access_token: String,
    /// LINE channel secret, for webhook signature verification.
    pub line_channel_secret: String,
    /// API key for the generative model.
    pub ai_api_key: String,
    /// The generateContent endpoint URL. Loaded from `AI_API_URL`.
    #[serde(default = "default_ai_api_url")]
    pub ai_api_url: String,
    /// Embeddings endpoint URL. When set, the bot matches semantically;
    /// when absent, the substring matcher runs.
    #[serde(default)]
    pub embeddings_api_url: Option<String>,
    #[serde(default = "default_embeddings_model")]
    pub embeddings_model: String,
    #[serde(default)]
    pub embeddings_api_key: Option<String>,
}

fn default_port() -> u16 {
    8080
}

fn default_faq_path() -> String {
    "faq.json".to_string()
}

fn default_ai_api_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        .to_string()
}

fn default_embeddings_model() -> String {
    "text-embedding-004".to_string()
}

/// Loads the application configuration.
///
/// Layering: an optional `config.yml` first, then environment variables,
/// so `PORT`, `FAQ_PATH`, `LINE_CHANNEL_ACCESS_TOKEN`, `LINE_CHANNEL_SECRET`
/// and `AI_API_KEY` override the file.
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = ConfigBuilder::builder();

    let config_path = config_path_override.unwrap_or("config.yml");
    if std::path::Path::new(config_path).exists() {
        builder = builder.add_source(File::new(config_path, FileFormat::Yaml));
    }

    let settings = builder.add_source(Environment::default()).build()?;

    let config: AppConfig = settings.try_deserialize()?;
    Ok(config)
}
