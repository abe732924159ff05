//! # Paddock Runtime
//!
//! Orchestration layer for the paddock interaction core: configuration,
//! logging, and the inbound event loop.
//!
//! The runtime assembles the immutable registries and the dispatcher from a
//! fixed set of handler definitions, then consumes the gateway event stream,
//! handling each event on its own task:
//!
//! ```rust,ignore
//! use paddock_runtime::{ConfigLoader, Runtime, logging};
//!
//! let config = ConfigLoader::new().load()?;
//! logging::init_from_config(&config.logging);
//!
//! let runtime = Runtime::builder(&config)
//!     .command(Arc::new(PingCommand))?
//!     .component(Arc::new(ConfirmEntryButton))?
//!     .build(collaborators);
//!
//! runtime.sync_commands().await?;
//! runtime.run(gateway_events).await;
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;

pub use config::{
    BotConfig, ConfigLoader, DEFAULT_CONFIG_FILE, LogFormat, LogLevel, LoggingConfig,
    PaddockConfig,
};
pub use error::{ConfigError, ConfigResult, RuntimeError, RuntimeResult};
pub use logging::{LoggingBuilder, init_from_config};
pub use runtime::{Collaborators, Runtime, RuntimeBuilder};
