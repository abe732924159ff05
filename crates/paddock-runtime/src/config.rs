//! Layered configuration loading using figment.
//!
//! Configuration priority, lowest to highest:
//!
//! 1. Built-in defaults
//! 2. `paddock.toml` in the working directory (or an explicit file)
//! 3. Environment variables (`PADDOCK_*`, `__` as section separator)
//! 4. Programmatic overrides merged onto the loader
//!
//! # Environment variable mapping
//!
//! - `PADDOCK_BOT__HOME_GUILD_ID=123` → `bot.home_guild_id = "123"`
//! - `PADDOCK_LOGGING__LEVEL=debug` → `logging.level = "debug"`

use std::path::PathBuf;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::{Figment, Provider};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Default config file searched in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "paddock.toml";

const ENV_PREFIX: &str = "PADDOCK_";

// =============================================================================
// Schema
// =============================================================================

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PaddockConfig {
    /// Bot identity settings.
    #[serde(default)]
    pub bot: BotConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PaddockConfig {
    /// Checks invariants a deserialized config can still violate.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.bot.home_guild_id.is_empty() {
            return Err(ConfigError::invalid(
                "bot.home_guild_id must be set: the authentication gate needs \
                 a home guild for display-name lookups",
            ));
        }
        Ok(())
    }
}

/// Bot identity settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BotConfig {
    /// Primary guild whose membership is consulted for display names.
    #[serde(default)]
    pub home_guild_id: String,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Base log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// When set, log to this file instead of stdout.
    #[serde(default)]
    pub file_path: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            format: LogFormat::default(),
            file_path: None,
        }
    }
}

/// Log level names accepted in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level (default).
    #[default]
    Info,
    /// Warn level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Returns the lowercase name used in filter directives.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Converts to a tracing level.
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

/// Log output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Compact single-line output (default).
    #[default]
    Compact,
    /// Full fmt output.
    Full,
    /// Multi-line pretty output.
    Pretty,
}

// =============================================================================
// Loader
// =============================================================================

/// Configuration loader with figment-based multi-source support.
///
/// ```rust,ignore
/// let config = ConfigLoader::new().file("config/paddock.toml").load()?;
/// ```
pub struct ConfigLoader {
    overrides: Figment,
    config_file: Option<PathBuf>,
    load_env: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a loader with the default search behavior.
    pub fn new() -> Self {
        Self {
            overrides: Figment::new(),
            config_file: None,
            load_env: true,
        }
    }

    /// Loads from a specific config file instead of [`DEFAULT_CONFIG_FILE`].
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Disables the environment variable layer.
    pub fn without_env(mut self) -> Self {
        self.load_env = false;
        self
    }

    /// Merges a programmatic override layer on top of everything else.
    pub fn merge(mut self, provider: impl Provider) -> Self {
        self.overrides = self.overrides.merge(provider);
        self
    }

    /// Resolves all layers into a validated [`PaddockConfig`].
    pub fn load(self) -> ConfigResult<PaddockConfig> {
        let file = self
            .config_file
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut figment =
            Figment::from(Serialized::defaults(PaddockConfig::default())).merge(Toml::file(file));
        if self.load_env {
            figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        }
        figment = figment.merge(self.overrides);

        let config: PaddockConfig = figment.extract()?;
        config.validate()?;
        Ok(config)
    }
}
