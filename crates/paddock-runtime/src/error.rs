//! Runtime error types.

use thiserror::Error;

use paddock_framework::{GatewayError, RegistryError};

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration source failed to load or deserialize.
    #[error("failed to load configuration: {0}")]
    Load(#[from] figment::Error),

    /// The loaded configuration is structurally valid but unusable.
    #[error("invalid configuration: {message}")]
    Invalid {
        /// What is wrong.
        message: String,
    },
}

impl ConfigError {
    /// Creates a validation error with the given message.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while assembling or operating the runtime.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Configuration loading or validation failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A startup registration failed; fatal before the event loop starts.
    #[error("startup registration failed: {0}")]
    Registration(#[from] RegistryError),

    /// Pushing command definitions to the platform failed.
    #[error("command sync failed: {0}")]
    CommandSync(#[from] GatewayError),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
