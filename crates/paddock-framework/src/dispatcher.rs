//! The interaction dispatcher.
//!
//! One [`Dispatcher::handle`] call routes one gateway event end to end:
//!
//! ```text
//! Received ──▶ Resolved ──▶ (Authenticating) ──▶ Executing ──▶ Responded
//!     └──────────────────────── Failed ─────────────────────────┘
//! ```
//!
//! 1. **Resolve** — exhaustive match on the payload variant: commands and
//!    autocomplete queries resolve by name against the command registry,
//!    component activations by decoding their token against the component
//!    registry. Resolution failure is graceful, never a crash.
//! 2. **Authenticate** — when the resolved handler declares
//!    `login_required`, the [`AuthenticationGate`] runs first and its result
//!    lands on the scoped context.
//! 3. **Execute** — the capability matching the variant runs inside
//!    [`ScopedContext::run`], so the whole asynchronous call chain of this
//!    event sees its own isolated context.
//! 4. **Classify failure** — domain errors are absorbed with exactly one
//!    ephemeral response; anything else answers generically and re-raises
//!    to the caller for process-level reporting.
//!
//! Each event is expected to be handled on its own task; the dispatcher
//! itself performs no blocking work and holds no per-event state.

use std::sync::Arc;

use tracing::{Instrument, Level, debug, span, warn};

use paddock_core::{
    InteractionEvent, InteractionPayload, ResponseChannel, ScopedContext, TokenArg,
};

use crate::auth::AuthenticationGate;
use crate::error::{DispatchError, HandlerError, ResolutionFailure};
use crate::gateway::{InteractionResponder, Response};
use crate::handler::{CommandHandler, ComponentHandler};
use crate::registry::{CommandRegistry, ComponentRegistry};

/// Generic failure copy, shown when an error is not user-actionable.
const UNEXPECTED_ERROR_REPLY: &str = "Ocorreu um erro na execução deste comando. \
     Por favor, espere alguns minutos e tente novamente. \
     Se o erro persistir, informe um moderador.";

/// Shown when a component token no longer resolves (stale button after a
/// redeploy that renamed or removed its handler).
const STALE_COMPONENT_REPLY: &str = "Este botão não está mais disponível.";

/// How one event's handling concluded, when it concluded at this boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The handler ran to completion.
    Completed,
    /// The handler rejected the interaction with a domain error; the actor
    /// was answered and the error absorbed.
    Rejected,
    /// No handler matched; the event was answered gracefully or ignored.
    Unresolved,
}

enum Resolved {
    Command(Arc<dyn CommandHandler>),
    Autocomplete(Arc<dyn CommandHandler>),
    Component(Arc<dyn ComponentHandler>, Vec<TokenArg>),
}

impl Resolved {
    fn name(&self) -> &str {
        match self {
            Self::Command(h) | Self::Autocomplete(h) => h.name(),
            Self::Component(h, _) => h.name(),
        }
    }

    fn login_required(&self) -> bool {
        match self {
            Self::Command(h) | Self::Autocomplete(h) => h.login_required(),
            Self::Component(h, _) => h.login_required(),
        }
    }
}

/// Routes interaction events to their handlers.
pub struct Dispatcher {
    commands: Arc<CommandRegistry>,
    components: Arc<ComponentRegistry>,
    gate: AuthenticationGate,
    responder: Arc<dyn InteractionResponder>,
}

impl Dispatcher {
    /// Creates a dispatcher over immutable registries.
    pub fn new(
        commands: Arc<CommandRegistry>,
        components: Arc<ComponentRegistry>,
        gate: AuthenticationGate,
        responder: Arc<dyn InteractionResponder>,
    ) -> Self {
        Self {
            commands,
            components,
            gate,
            responder,
        }
    }

    /// Handles one event end to end.
    ///
    /// Everything except an unexpected handler failure is absorbed here with
    /// a deterministic user-visible outcome; an unexpected failure answers
    /// the actor generically and then crosses this boundary so the caller
    /// can report it.
    pub async fn handle(&self, event: Arc<InteractionEvent>) -> Result<Dispatch, DispatchError> {
        let span = span!(
            Level::DEBUG,
            "dispatch",
            event = %event.id(),
            kind = event.payload().kind(),
        );

        async {
            let resolved = match self.resolve(&event) {
                Ok(resolved) => resolved,
                Err(ResolutionFailure::UnknownCommand { name }) => {
                    warn!(command = %name, "ignoring interaction for unknown command");
                    return Ok(Dispatch::Unresolved);
                }
                Err(ResolutionFailure::Component(err)) => {
                    debug!(error = %err, "component token did not resolve");
                    self.respond(&event, Response::private_notice(STALE_COMPONENT_REPLY))
                        .await;
                    return Ok(Dispatch::Unresolved);
                }
            };

            let outcome = ScopedContext::new(Arc::clone(&event))
                .run(async {
                    if resolved.login_required() {
                        self.gate.ensure_authenticated(&event).await?;
                    }
                    match &resolved {
                        Resolved::Command(handler) => handler.execute(&event).await,
                        Resolved::Autocomplete(handler) => handler.autocomplete(&event).await,
                        Resolved::Component(handler, args) => {
                            handler.execute(&event, args).await
                        }
                    }
                })
                .await;

            match outcome {
                Ok(()) => Ok(Dispatch::Completed),
                Err(HandlerError::Domain(message)) => {
                    debug!(handler = resolved.name(), %message, "handler rejected the interaction");
                    self.respond(&event, Response::private_notice(message)).await;
                    Ok(Dispatch::Rejected)
                }
                Err(HandlerError::Unexpected(source)) => {
                    self.respond(&event, Response::private_notice(UNEXPECTED_ERROR_REPLY))
                        .await;
                    Err(DispatchError::Unexpected {
                        handler: resolved.name().to_string(),
                        source,
                    })
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Classifies the event and looks up its handler.
    fn resolve(&self, event: &InteractionEvent) -> Result<Resolved, ResolutionFailure> {
        match event.payload() {
            InteractionPayload::Command(payload) => self
                .commands
                .resolve(&payload.command)
                .map(Resolved::Command)
                .ok_or_else(|| ResolutionFailure::UnknownCommand {
                    name: payload.command.clone(),
                }),
            InteractionPayload::Autocomplete(payload) => self
                .commands
                .resolve(&payload.command)
                .map(Resolved::Autocomplete)
                .ok_or_else(|| ResolutionFailure::UnknownCommand {
                    name: payload.command.clone(),
                }),
            InteractionPayload::Component(payload) => {
                let (handler, args) = self.components.resolve(&payload.token)?;
                Ok(Resolved::Component(handler, args))
            }
        }
    }

    /// Sends the terminal failure response, branching on the acknowledgment
    /// state *at this moment* — the handler may have acknowledged before
    /// failing, in which case only the edit channel is valid.
    async fn respond(&self, event: &InteractionEvent, response: Response) {
        let result = match event.response_channel() {
            ResponseChannel::Reply => self.responder.reply(event, response).await,
            ResponseChannel::Edit => self.responder.edit_reply(event, response).await,
        };
        if let Err(error) = result {
            warn!(%error, event = %event.id(), "failed to deliver failure response");
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("commands", &self.commands.len())
            .field("components", &self.components.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HandlerResult;
    use crate::gateway::{GatewayResult, MemberDirectory};
    use crate::handler::CommandDefinition;
    use crate::services::{ServiceResult, UserService};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

    use paddock_core::{
        Account, Actor, AutocompletePayload, CommandPayload, ComponentPayload, Origin, Provider,
    };

    // ─── Gateway fixtures ────────────────────────────────────────────────────

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Channel {
        Reply,
        Edit,
    }

    #[derive(Default)]
    struct RecordingResponder {
        sent: Mutex<Vec<(Channel, Response)>>,
    }

    impl RecordingResponder {
        fn sent(&self) -> Vec<(Channel, Response)> {
            self.sent.lock().clone()
        }
    }

    #[async_trait]
    impl InteractionResponder for RecordingResponder {
        async fn reply(&self, event: &InteractionEvent, response: Response) -> GatewayResult<()> {
            event.ack().reply();
            self.sent.lock().push((Channel::Reply, response));
            Ok(())
        }

        async fn edit_reply(
            &self,
            event: &InteractionEvent,
            response: Response,
        ) -> GatewayResult<()> {
            event.ack().reply();
            self.sent.lock().push((Channel::Edit, response));
            Ok(())
        }
    }

    struct EmptyDirectory;

    #[async_trait]
    impl MemberDirectory for EmptyDirectory {
        async fn display_name(
            &self,
            _guild_id: &str,
            _external_id: &str,
        ) -> GatewayResult<Option<String>> {
            Ok(None)
        }
    }

    // ─── Domain fixtures ─────────────────────────────────────────────────────

    #[derive(Default)]
    struct CountingUsers {
        accounts: Mutex<std::collections::HashMap<String, Account>>,
        next_id: AtomicI64,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl UserService for CountingUsers {
        async fn get_from_provider(
            &self,
            _provider: Provider,
            external_id: &str,
        ) -> ServiceResult<Option<Account>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.accounts.lock().get(external_id).cloned())
        }

        async fn register(
            &self,
            _provider: Provider,
            external_id: &str,
            display_name: &str,
        ) -> ServiceResult<Account> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let account = Account {
                id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
                name: display_name.into(),
            };
            self.accounts
                .lock()
                .insert(external_id.into(), account.clone());
            Ok(account)
        }
    }

    // ─── Handler fixtures ────────────────────────────────────────────────────

    /// Scripted command handler covering every failure mode the dispatcher
    /// classifies.
    enum Script {
        Succeed,
        DomainError(&'static str),
        UnexpectedError,
        DeferThenDomainError(&'static str),
    }

    struct ScriptedCommand {
        name: &'static str,
        login_required: bool,
        script: Script,
        executions: AtomicUsize,
        autocompletes: AtomicUsize,
        saw_account: Mutex<Option<Option<Account>>>,
    }

    impl ScriptedCommand {
        fn new(name: &'static str, login_required: bool, script: Script) -> Arc<Self> {
            Arc::new(Self {
                name,
                login_required,
                script,
                executions: AtomicUsize::new(0),
                autocompletes: AtomicUsize::new(0),
                saw_account: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl CommandHandler for ScriptedCommand {
        fn name(&self) -> &str {
            self.name
        }

        fn login_required(&self) -> bool {
            self.login_required
        }

        fn definition(&self) -> CommandDefinition {
            CommandDefinition::new(self.name, "test command")
        }

        async fn execute(&self, event: &InteractionEvent) -> HandlerResult {
            self.executions.fetch_add(1, Ordering::SeqCst);
            *self.saw_account.lock() = Some(ScopedContext::current().account());
            match &self.script {
                Script::Succeed => Ok(()),
                Script::DomainError(message) => Err(HandlerError::domain(*message)),
                Script::UnexpectedError => Err(anyhow::anyhow!("backend exploded").into()),
                Script::DeferThenDomainError(message) => {
                    // Acknowledge asynchronously, then fail mid-execution.
                    event.ack().defer();
                    Err(HandlerError::domain(*message))
                }
            }
        }

        async fn autocomplete(&self, _event: &InteractionEvent) -> HandlerResult {
            self.autocompletes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[derive(Debug)]
    struct RecordingComponent {
        args: Mutex<Option<Vec<TokenArg>>>,
    }

    #[async_trait]
    impl ComponentHandler for RecordingComponent {
        fn name(&self) -> &str {
            "confirm-entry"
        }

        fn login_required(&self) -> bool {
            false
        }

        async fn execute(&self, _event: &InteractionEvent, args: &[TokenArg]) -> HandlerResult {
            *self.args.lock() = Some(args.to_vec());
            Ok(())
        }
    }

    // ─── Harness ─────────────────────────────────────────────────────────────

    struct Harness {
        dispatcher: Dispatcher,
        responder: Arc<RecordingResponder>,
        users: Arc<CountingUsers>,
    }

    fn harness(
        commands: Vec<Arc<dyn CommandHandler>>,
        components: Vec<Arc<dyn ComponentHandler>>,
    ) -> Harness {
        let mut command_registry = CommandRegistry::new();
        for handler in commands {
            command_registry.register(handler).unwrap();
        }
        let mut component_registry = ComponentRegistry::new();
        for handler in components {
            component_registry.register(handler).unwrap();
        }

        let users = Arc::new(CountingUsers::default());
        let responder = Arc::new(RecordingResponder::default());
        let gate = AuthenticationGate::new(
            Arc::clone(&users) as Arc<dyn UserService>,
            Arc::new(EmptyDirectory),
            Provider::Discord,
            "guild-main",
        );
        let dispatcher = Dispatcher::new(
            Arc::new(command_registry),
            Arc::new(component_registry),
            gate,
            Arc::clone(&responder) as Arc<dyn InteractionResponder>,
        );
        Harness {
            dispatcher,
            responder,
            users,
        }
    }

    fn command_event(command: &str) -> Arc<InteractionEvent> {
        Arc::new(InteractionEvent::new(
            "evt-1",
            Actor {
                external_id: "u42".into(),
                username: "runner42".into(),
            },
            Origin::Direct,
            InteractionPayload::Command(CommandPayload {
                command: command.into(),
                options: vec![],
            }),
        ))
    }

    fn component_event(token: &str) -> Arc<InteractionEvent> {
        Arc::new(InteractionEvent::new(
            "evt-2",
            Actor {
                external_id: "u42".into(),
                username: "runner42".into(),
            },
            Origin::Direct,
            InteractionPayload::Component(ComponentPayload {
                token: token.into(),
            }),
        ))
    }

    // ─── Tests ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn ping_executes_without_invoking_the_gate() {
        let ping = ScriptedCommand::new("ping", false, Script::Succeed);
        let h = harness(vec![ping.clone()], vec![]);

        let outcome = h.dispatcher.handle(command_event("ping")).await.unwrap();

        assert_eq!(outcome, Dispatch::Completed);
        assert_eq!(ping.executions.load(Ordering::SeqCst), 1);
        // Unauthenticated context reached the handler, no service calls made.
        assert_eq!(*ping.saw_account.lock(), Some(None));
        assert_eq!(h.users.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn login_required_command_triggers_first_contact() {
        let register = ScriptedCommand::new("register-race", true, Script::Succeed);
        let h = harness(vec![register.clone()], vec![]);

        let outcome = h
            .dispatcher
            .handle(command_event("register-race"))
            .await
            .unwrap();

        assert_eq!(outcome, Dispatch::Completed);
        let saw = h.users.accounts.lock().get("u42").cloned();
        let saw = saw.expect("first contact should have registered u42");
        assert_eq!(*register.saw_account.lock(), Some(Some(saw)));
    }

    #[tokio::test]
    async fn autocomplete_routes_to_the_autocomplete_capability() {
        let register = ScriptedCommand::new("register-race", true, Script::Succeed);
        let h = harness(vec![register.clone()], vec![]);

        let event = Arc::new(InteractionEvent::new(
            "evt-3",
            Actor {
                external_id: "u42".into(),
                username: "runner42".into(),
            },
            Origin::Direct,
            InteractionPayload::Autocomplete(AutocompletePayload {
                command: "register-race".into(),
                field: "race".into(),
                partial: "sm".into(),
                options: vec![],
            }),
        ));

        let outcome = h.dispatcher.handle(event).await.unwrap();

        assert_eq!(outcome, Dispatch::Completed);
        assert_eq!(register.autocompletes.load(Ordering::SeqCst), 1);
        assert_eq!(register.executions.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn domain_error_yields_exactly_one_ephemeral_reply() {
        let closed = ScriptedCommand::new(
            "register-race",
            false,
            Script::DomainError("Inscrições encerradas"),
        );
        let h = harness(vec![closed], vec![]);

        let outcome = h
            .dispatcher
            .handle(command_event("register-race"))
            .await
            .unwrap();

        // Absorbed, never propagated past the dispatcher.
        assert_eq!(outcome, Dispatch::Rejected);
        let sent = h.responder.sent();
        assert_eq!(sent.len(), 1);
        let (channel, response) = &sent[0];
        assert_eq!(*channel, Channel::Reply);
        assert_eq!(response.content, "Inscrições encerradas");
        assert!(response.ephemeral);
        assert!(response.clear_components);
    }

    #[tokio::test]
    async fn unexpected_error_replies_generically_and_propagates() {
        let broken = ScriptedCommand::new("ping", false, Script::UnexpectedError);
        let h = harness(vec![broken], vec![]);

        let err = h
            .dispatcher
            .handle(command_event("ping"))
            .await
            .unwrap_err();

        let DispatchError::Unexpected { handler, source } = err;
        assert_eq!(handler, "ping");
        assert_eq!(source.to_string(), "backend exploded");

        let sent = h.responder.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].1.content.starts_with("Ocorreu um erro"));
        assert!(sent[0].1.ephemeral);
    }

    #[tokio::test]
    async fn deferred_handler_failure_uses_edit_channel() {
        let deferred = ScriptedCommand::new(
            "register-race",
            false,
            Script::DeferThenDomainError("Inscrições encerradas"),
        );
        let h = harness(vec![deferred], vec![]);

        let outcome = h
            .dispatcher
            .handle(command_event("register-race"))
            .await
            .unwrap();

        assert_eq!(outcome, Dispatch::Rejected);
        let sent = h.responder.sent();
        assert_eq!(sent.len(), 1);
        // Channel chosen at respond time, after the handler deferred.
        assert_eq!(sent[0].0, Channel::Edit);
    }

    #[tokio::test]
    async fn unknown_command_is_a_silent_noop() {
        let h = harness(vec![], vec![]);

        let outcome = h.dispatcher.handle(command_event("vanished")).await.unwrap();

        assert_eq!(outcome, Dispatch::Unresolved);
        assert!(h.responder.sent().is_empty());
    }

    #[tokio::test]
    async fn stale_component_token_gets_a_graceful_notice() {
        let h = harness(vec![], vec![]);
        // Token issued by an older deployment.
        let token = paddock_core::encode("withdraw-entry", &[TokenArg::Int(9)]).unwrap();

        let outcome = h.dispatcher.handle(component_event(&token)).await.unwrap();

        assert_eq!(outcome, Dispatch::Unresolved);
        let sent = h.responder.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].1.content, "Este botão não está mais disponível.");
        assert!(sent[0].1.ephemeral);
    }

    #[tokio::test]
    async fn component_arguments_reach_the_handler() {
        let component = Arc::new(RecordingComponent {
            args: Mutex::new(None),
        });
        let h = harness(vec![], vec![component.clone()]);

        let mut registry = ComponentRegistry::new();
        registry.register(component.clone()).unwrap();
        let token = registry
            .create_token("confirm-entry", &[TokenArg::Int(7), TokenArg::Int(3)])
            .unwrap();

        let outcome = h.dispatcher.handle(component_event(&token)).await.unwrap();

        assert_eq!(outcome, Dispatch::Completed);
        assert_eq!(
            *component.args.lock(),
            Some(vec![TokenArg::Int(7), TokenArg::Int(3)])
        );
    }
}
