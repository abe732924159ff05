//! Logging setup over `tracing` and `tracing-subscriber`.
//!
//! # Configuration-based initialization
//!
//! ```rust,ignore
//! let config = ConfigLoader::new().load()?;
//! logging::init_from_config(&config.logging);
//! ```
//!
//! # Manual initialization
//!
//! ```rust,ignore
//! LoggingBuilder::new()
//!     .with_level(tracing::Level::DEBUG)
//!     .directive("paddock_framework=trace")
//!     .init();
//! ```

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LogFormat, LoggingConfig};

/// Initializes logging from a [`LoggingConfig`].
///
/// Safe to call when a subscriber is already installed; the attempt is then
/// silently discarded.
pub fn init_from_config(config: &LoggingConfig) {
    let _ = LoggingBuilder::from_config(config).try_init();
}

/// A builder for configuring the tracing subscriber.
#[derive(Debug, Default)]
pub struct LoggingBuilder {
    level: Option<tracing::Level>,
    directives: Vec<String>,
    format: LogFormat,
    file_path: Option<PathBuf>,
}

impl LoggingBuilder {
    /// Creates a builder with compact stdout output at the info level.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder from a [`LoggingConfig`].
    pub fn from_config(config: &LoggingConfig) -> Self {
        Self {
            level: Some(config.level.to_tracing_level()),
            directives: Vec::new(),
            format: config.format,
            file_path: config.file_path.clone(),
        }
    }

    /// Sets the base log level.
    pub fn with_level(mut self, level: tracing::Level) -> Self {
        self.level = Some(level);
        self
    }

    /// Adds a per-module filter directive, e.g. `"paddock_framework=debug"`.
    pub fn directive(mut self, directive: impl Into<String>) -> Self {
        self.directives.push(directive.into());
        self
    }

    /// Sets the output format.
    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Logs to a file instead of stdout.
    pub fn file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    fn build_filter(&self) -> EnvFilter {
        let base_level = self.level.unwrap_or(tracing::Level::INFO);
        let base_filter = base_level.to_string().to_lowercase();

        // RUST_LOG takes precedence over the configured base level.
        let mut filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&base_filter));

        for directive in &self.directives {
            if let Ok(parsed) = directive.parse() {
                filter = filter.add_directive(parsed);
            }
        }

        filter
    }

    /// Installs the subscriber, ignoring failure if one is already set.
    pub fn init(self) {
        let _ = self.try_init();
    }

    /// Installs the subscriber, reporting failure if one is already set.
    pub fn try_init(self) -> Result<(), TryInitError> {
        let filter = self.build_filter();

        macro_rules! init_with_writer {
            ($writer:expr) => {
                match self.format {
                    LogFormat::Compact => tracing_subscriber::registry()
                        .with(fmt::layer().compact().with_writer($writer))
                        .with(filter)
                        .try_init(),
                    LogFormat::Full => tracing_subscriber::registry()
                        .with(fmt::layer().with_writer($writer))
                        .with(filter)
                        .try_init(),
                    LogFormat::Pretty => tracing_subscriber::registry()
                        .with(fmt::layer().pretty().with_writer($writer))
                        .with(filter)
                        .try_init(),
                }
            };
        }

        match &self.file_path {
            None => init_with_writer!(std::io::stdout),
            Some(path) => {
                let appender = tracing_appender::rolling::never(
                    path.parent().unwrap_or_else(|| Path::new(".")),
                    path.file_name().unwrap_or_else(|| OsStr::new("paddock.log")),
                );
                init_with_writer!(appender)
            }
        }
    }
}
