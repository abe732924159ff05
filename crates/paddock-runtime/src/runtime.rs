//! Runtime orchestration.
//!
//! The [`Runtime`] owns the assembled dispatcher and drives the inbound
//! event stream: the gateway delivers a *sequential* stream, but each event
//! is handled on its own spawned task, so many interactions are in flight
//! concurrently with no ordering guarantee between actors. The runtime
//! itself performs no blocking work.
//!
//! ```rust,ignore
//! let config = ConfigLoader::new().load()?;
//! let runtime = Runtime::builder(&config)
//!     .command(Arc::new(PingCommand))?
//!     .component(Arc::new(ConfirmEntryButton))?
//!     .build(collaborators);
//!
//! runtime.sync_commands().await?;
//! runtime.run(events).await;
//! ```

use std::sync::Arc;

use futures::{Stream, StreamExt};
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use paddock_core::{InteractionEvent, Provider};
use paddock_framework::{
    AuthenticationGate, CommandHandler, CommandRegistry, CommandSink, ComponentHandler,
    ComponentRegistry, Dispatch, DispatchError, Dispatcher, InteractionResponder, MemberDirectory,
    RegistryResult, UserService,
};

use crate::config::PaddockConfig;
use crate::error::RuntimeResult;

/// External collaborators wired into the dispatcher at assembly time.
///
/// Domain services and the gateway transport live outside this workspace;
/// the runtime only holds their ports.
pub struct Collaborators {
    /// Account lookup and first-contact registration.
    pub users: Arc<dyn UserService>,
    /// Guild-membership display-name lookups.
    pub directory: Arc<dyn MemberDirectory>,
    /// Terminal response delivery.
    pub responder: Arc<dyn InteractionResponder>,
    /// Command definition sync target.
    pub command_sink: Arc<dyn CommandSink>,
}

/// Builder that assembles the registries from a fixed set of definitions.
///
/// Registration failures are fatal here, at startup — never at request time.
pub struct RuntimeBuilder {
    home_guild_id: String,
    commands: CommandRegistry,
    components: ComponentRegistry,
}

impl std::fmt::Debug for RuntimeBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeBuilder")
            .field("home_guild_id", &self.home_guild_id)
            .field("commands", &self.commands.len())
            .field("components", &self.components.len())
            .finish()
    }
}

impl RuntimeBuilder {
    /// Registers a command handler.
    pub fn command(mut self, handler: Arc<dyn CommandHandler>) -> RegistryResult<Self> {
        self.commands.register(handler)?;
        Ok(self)
    }

    /// Registers a permanent-component handler.
    ///
    /// The set of names registered here must be stable across restarts so
    /// tokens issued by earlier process lives keep resolving.
    pub fn component(mut self, handler: Arc<dyn ComponentHandler>) -> RegistryResult<Self> {
        self.components.register(handler)?;
        Ok(self)
    }

    /// Seals the registries and wires the dispatcher.
    pub fn build(self, collaborators: Collaborators) -> Runtime {
        let gate = AuthenticationGate::new(
            collaborators.users,
            collaborators.directory,
            Provider::Discord,
            self.home_guild_id,
        );
        let commands = Arc::new(self.commands);
        let dispatcher = Dispatcher::new(
            Arc::clone(&commands),
            Arc::new(self.components),
            gate,
            collaborators.responder,
        );

        Runtime {
            commands,
            dispatcher: Arc::new(dispatcher),
            command_sink: collaborators.command_sink,
            shutdown: CancellationToken::new(),
        }
    }
}

/// The assembled bot core: immutable registries, one dispatcher, one
/// inbound event loop.
pub struct Runtime {
    commands: Arc<CommandRegistry>,
    dispatcher: Arc<Dispatcher>,
    command_sink: Arc<dyn CommandSink>,
    shutdown: CancellationToken,
}

impl Runtime {
    /// Starts assembling a runtime for the given configuration.
    pub fn builder(config: &PaddockConfig) -> RuntimeBuilder {
        RuntimeBuilder {
            home_guild_id: config.bot.home_guild_id.clone(),
            commands: CommandRegistry::new(),
            components: ComponentRegistry::new(),
        }
    }

    /// Pushes every registered command definition to the platform.
    pub async fn sync_commands(&self) -> RuntimeResult<()> {
        let definitions = self.commands.definitions();
        info!(count = definitions.len(), "syncing command definitions");
        self.command_sink.push_commands(definitions).await?;
        Ok(())
    }

    /// Token observed by the event loop; cancel it to stop consuming.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Requests the event loop to stop.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Consumes the gateway event stream until it ends or shutdown is
    /// requested, then drains in-flight handlers.
    ///
    /// Every event gets its own task; an unexpected handler failure has
    /// already answered the actor by the time it surfaces here, so it is
    /// reported and the loop keeps running — fatal to the operation, not to
    /// the process.
    pub async fn run<S>(&self, events: S)
    where
        S: Stream<Item = InteractionEvent>,
    {
        futures::pin_mut!(events);
        let mut tasks = JoinSet::new();
        info!("paddock runtime ready");

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("shutdown requested, stopping event loop");
                    break;
                }
                Some(settled) = tasks.join_next(), if !tasks.is_empty() => {
                    Self::report(settled);
                }
                next = events.next() => match next {
                    Some(event) => {
                        let dispatcher = Arc::clone(&self.dispatcher);
                        let event = Arc::new(event);
                        tasks.spawn(async move { dispatcher.handle(event).await });
                    }
                    None => {
                        info!("gateway event stream ended");
                        break;
                    }
                },
            }
        }

        while let Some(settled) = tasks.join_next().await {
            Self::report(settled);
        }
    }

    /// Process-level reporting for one settled handling task.
    fn report(settled: Result<Result<Dispatch, DispatchError>, JoinError>) {
        match settled {
            Ok(Ok(_)) => {}
            Ok(Err(error)) => {
                error!(error = ?error, "an error occurred during interaction handling");
            }
            Err(join_error) => {
                error!(error = %join_error, "interaction handling task aborted");
            }
        }
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("commands", &self.commands.len())
            .finish_non_exhaustive()
    }
}
