//! Application configuration.
//!
//! Settings merge in layers: built-in defaults, an optional YAML config file
//! (`--config`, `CONFIG_FILE`, or `./config.yaml`), `COLLOQUY_*` environment
//! variables, and finally explicit CLI flags. LLM connection settings come
//! from plain env vars (`LLM_BASE_URL`, `LLM_MODEL`, `LLM_API_KEY`) so they
//! can live in `.env` next to provider credentials.

use std::env;
use std::path::Path;
use std::time::Duration;

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::llm::LlmSettings;

/// Command-line interface.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Host to bind
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    /// Conversation expiry in minutes
    #[arg(long, env = "CONVERSATION_TIMEOUT_MINUTES")]
    pub conversation_timeout_minutes: Option<u32>,
}

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Conversation store settings.
    pub conversation: ConversationConfig,
}

/// HTTP server settings.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Port to listen on.
    pub port: u16,
    /// Host to bind.
    pub host: String,
}

/// Conversation store settings.
#[derive(Debug, Deserialize, Clone)]
pub struct ConversationConfig {
    /// Minutes of inactivity after which a conversation expires.
    pub timeout_minutes: u32,
    /// Seconds between expiry sweeps.
    pub sweep_interval_secs: u32,
}

impl ConversationConfig {
    /// Conversation expiry timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.timeout_minutes) * 60)
    }

    /// Interval between expiry sweeps.
    #[must_use]
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.sweep_interval_secs))
    }
}

impl AppConfig {
    /// Load configuration from process arguments and the environment.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(env::args())
    }

    /// Load configuration from explicit arguments (testable entry point).
    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder()
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("conversation.timeout_minutes", 30)?
            .set_default("conversation.sweep_interval_secs", 60)?;

        // Config file: explicit path first, then ./config.yaml fallback
        if let Some(path) = &cli.config {
            builder = builder.add_source(File::with_name(path));
        } else if Path::new("config.yaml").exists() {
            builder = builder.add_source(File::with_name("config.yaml"));
        }

        // Environment overrides, e.g. COLLOQUY_SERVER__PORT=8080
        builder = builder.add_source(Environment::with_prefix("COLLOQUY").separator("__"));

        // CLI overrides
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(host) = &cli.host {
            builder = builder.set_override("server.host", host.clone())?;
        }
        if let Some(minutes) = cli.conversation_timeout_minutes {
            builder = builder.set_override("conversation.timeout_minutes", i64::from(minutes))?;
        }

        builder.build()?.try_deserialize()
    }
}

/// Load LLM connection settings from the environment.
///
/// # Errors
///
/// Returns a human-readable message when a required variable is missing or
/// empty.
pub fn load_llm_settings() -> Result<LlmSettings, String> {
    let base_url = env::var("LLM_BASE_URL")
        .map_err(|_| "Missing required env var: LLM_BASE_URL".to_string())?;
    if base_url.trim().is_empty() {
        return Err("LLM_BASE_URL cannot be empty".to_string());
    }

    let model =
        env::var("LLM_MODEL").map_err(|_| "Missing required env var: LLM_MODEL".to_string())?;
    if model.trim().is_empty() {
        return Err("LLM_MODEL cannot be empty".to_string());
    }

    let api_key = env::var("LLM_API_KEY")
        .ok()
        .filter(|s| !s.trim().is_empty());

    Ok(LlmSettings {
        base_url,
        api_key,
        model,
    })
}
