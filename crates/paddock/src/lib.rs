//! # Paddock
//!
//! The event-routing core of a race-community chat bot: everything between
//! "an interaction arrives from the gateway" and "a domain service is
//! called".
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────┐    ┌────────────┐    ┌───────────────────────────────────┐
//! │ Gateway │───▶│ Dispatcher │───▶│ handler (own task, own context)   │──▶ services
//! │ (events)│    │            │───▶│ handler (own task, own context)   │──▶ services
//! └─────────┘    └────────────┘    └───────────────────────────────────┘
//! ```
//!
//! - **Registries**: immutable-after-startup maps from name to command /
//!   permanent-component handler
//! - **Component tokens**: a button's entire persisted state — issued
//!   buttons keep resolving after a full process restart
//! - **Scoped context**: per-event task-local state, isolated between
//!   concurrently handled events
//! - **Authentication gate**: account linking that runs in front of
//!   privileged handlers
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use paddock::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::new().load()?;
//!     paddock::runtime::logging::init_from_config(&config.logging);
//!
//!     let runtime = Runtime::builder(&config)
//!         .command(Arc::new(PingCommand))?
//!         .component(Arc::new(ConfirmEntryButton))?
//!         .build(collaborators);
//!
//!     runtime.sync_commands().await?;
//!     runtime.run(gateway_events).await;
//!     Ok(())
//! }
//! ```

pub use paddock_core as core;
pub use paddock_framework as framework;
pub use paddock_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use paddock::prelude::*;
/// ```
pub mod prelude {
    // Runtime - main entry point
    pub use paddock_runtime::{Collaborators, ConfigLoader, PaddockConfig, Runtime};

    // Handler surface
    pub use paddock_framework::{
        AutocompleteField, CommandDefinition, CommandHandler, ComponentHandler, HandlerError,
        HandlerResult, OptionDefinition, OptionKind, Response,
    };

    // Ports to implement against
    pub use paddock_framework::{
        CommandSink, InteractionResponder, MemberDirectory, UserService,
    };

    // Event model and ambient context
    pub use paddock_core::{
        Account, Actor, InteractionEvent, InteractionPayload, Origin, Provider, ScopedContext,
        TokenArg,
    };
}
