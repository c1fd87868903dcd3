// Required external crates for configuration management and serialization
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default address of a locally running model server
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Connection settings for the model server
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Base URL every API path is appended to
    pub base_url: String,
}

/// Configuration for diagnostic logging
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Directory for the rolling diagnostic log
    pub directory: PathBuf,
}

/// Where chat transcripts are written
#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub directory: PathBuf,
}

/// Settings for deriving new models
#[derive(Debug, Deserialize, Clone)]
pub struct DeriveConfig {
    /// Model-creation command, invoked as `<tool> create <name> -f <file>`
    pub tool: String,
    /// Directory the generated modelfiles are written to
    pub directory: PathBuf,
}

/// Main settings struct that contains all configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub sessions: SessionConfig,
    pub derive: DeriveConfig,
}

impl Settings {
    /// Loads settings from the following sources, highest precedence first:
    /// 1. `base_url_override` (command line)
    /// 2. Environment variables prefixed with LLAMENU_ (`__` separates nested keys)
    /// 3. `<config_dir>/local.toml` if present
    /// 4. `<config_dir>/default.toml` if present
    /// 5. Built-in defaults
    pub fn load(config_dir: &Path, base_url_override: Option<String>) -> Result<Self, ConfigError> {
        let default_config = config_dir.join("default.toml");
        let local_config = config_dir.join("local.toml");

        let settings = Config::builder()
            .set_default("server.base_url", DEFAULT_BASE_URL)?
            .set_default("logging.level", "info")?
            .set_default("logging.directory", "logs")?
            .set_default("sessions.directory", "logs")?
            .set_default("derive.tool", "ollama")?
            .set_default("derive.directory", ".")?
            .add_source(File::from(default_config.as_path()).required(false))
            .add_source(File::from(local_config.as_path()).required(false))
            .add_source(
                Environment::with_prefix("LLAMENU")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_override_option("server.base_url", base_url_override)?
            .build()?
            .try_deserialize::<Settings>()?;

        settings.validate()?;

        Ok(settings)
    }

    /// Base URL without a trailing slash, ready for joining API paths
    pub fn base_url(&self) -> &str {
        self.server.base_url.trim_end_matches('/')
    }

    /// Validate configuration values
    fn validate(&self) -> Result<(), ConfigError> {
        let url = self.server.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Message(format!(
                "server.base_url must start with http:// or https://, got: '{}'",
                self.server.base_url
            )));
        }

        if self.derive.tool.trim().is_empty() {
            return Err(ConfigError::Message(
                "derive.tool must not be empty".to_string(),
            ));
        }

        match self.logging.level.to_lowercase().as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => Ok(()),
            _ => Err(ConfigError::Message(format!(
                "Invalid logging level: {}. Must be one of: error, warn, info, debug, trace",
                self.logging.level
            ))),
        }
    }
}
