//! Handler descriptors.
//!
//! Handlers are registered once at startup and shared as `Arc<dyn …>` for
//! the process lifetime; the traits here are the seam between the router and
//! command/component *content*, which lives outside this workspace.

use async_trait::async_trait;
use serde::Serialize;

use paddock_core::{InteractionEvent, TokenArg};

use crate::error::HandlerResult;

// =============================================================================
// Command definitions
// =============================================================================

/// Value type of a declared command option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    /// A signed integer.
    Integer,
    /// A text value.
    Text,
    /// A boolean.
    Boolean,
}

/// Declaration of one command option.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionDefinition {
    /// Option name, unique within its command.
    pub name: String,
    /// Human-readable description shown by the platform.
    pub description: String,
    /// Value type.
    pub kind: OptionKind,
    /// Whether the option must be supplied.
    pub required: bool,
    /// Whether the platform should stream autocomplete queries for it.
    pub autocomplete: bool,
}

impl OptionDefinition {
    /// Creates a required, non-autocompleted option.
    pub fn new(name: impl Into<String>, description: impl Into<String>, kind: OptionKind) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
            required: true,
            autocomplete: false,
        }
    }

    /// Marks the option optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Enables autocomplete for the option.
    pub fn autocompleted(mut self) -> Self {
        self.autocomplete = true;
        self
    }
}

/// The declarative payload pushed to the platform when commands are synced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandDefinition {
    /// Wire name of the command.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Declared options, in display order.
    pub options: Vec<OptionDefinition>,
}

impl CommandDefinition {
    /// Creates a definition with no options.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            options: Vec::new(),
        }
    }

    /// Appends an option declaration.
    pub fn option(mut self, option: OptionDefinition) -> Self {
        self.options.push(option);
        self
    }
}

// =============================================================================
// Handler traits
// =============================================================================

/// A slash-command handler.
///
/// One instance serves both the command's invocations and its autocomplete
/// queries. Instances are immutable after registration and looked up
/// concurrently without locking.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Name unique within the command registry; also the wire name.
    fn name(&self) -> &str;

    /// Whether the authentication gate must run before execution.
    fn login_required(&self) -> bool {
        true
    }

    /// Definition pushed to the platform on command sync.
    fn definition(&self) -> CommandDefinition;

    /// Handles an invocation of this command.
    async fn execute(&self, event: &InteractionEvent) -> HandlerResult;

    /// Handles an autocomplete query for one of this command's fields.
    async fn autocomplete(&self, _event: &InteractionEvent) -> HandlerResult {
        Ok(())
    }
}

/// A permanent-component handler.
///
/// The set of registered names must be stable across restarts — previously
/// issued tokens reference a handler by name only, and the token is the
/// entire persisted state of the component.
#[async_trait]
pub trait ComponentHandler: std::fmt::Debug + Send + Sync {
    /// Name unique within the component registry.
    fn name(&self) -> &str;

    /// Whether the authentication gate must run before execution.
    fn login_required(&self) -> bool {
        true
    }

    /// Handles an activation of a component this handler issued, with the
    /// arguments recovered from its token.
    async fn execute(&self, event: &InteractionEvent, args: &[TokenArg]) -> HandlerResult;
}
