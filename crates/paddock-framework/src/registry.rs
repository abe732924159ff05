//! Handler registries.
//!
//! Both registries are built once at startup from a fixed set of
//! definitions, then moved behind `Arc` and never mutated again — concurrent
//! lookups need no locking. Registration failures are fatal at startup,
//! never at request time.
//!
//! Restart stability of permanent components follows from this: a token is
//! a pure function of (name, args), so a restarted process that re-registers
//! the same names resolves every token issued before the restart. No
//! server-side session table backs a button.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use paddock_core::{TokenArg, token};

use crate::error::{RegistryError, RegistryResult, UnresolvedToken};
use crate::handler::{CommandDefinition, CommandHandler, ComponentHandler};

// =============================================================================
// CommandRegistry
// =============================================================================

/// Mapping from command name to its handler.
#[derive(Default)]
pub struct CommandRegistry {
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
}

impl CommandRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a command handler under its own name.
    pub fn register(&mut self, handler: Arc<dyn CommandHandler>) -> RegistryResult<()> {
        let name = handler.name().to_string();
        if self.handlers.contains_key(&name) {
            return Err(RegistryError::DuplicateName { name });
        }
        debug!(command = %name, "registered command handler");
        self.handlers.insert(name, handler);
        Ok(())
    }

    /// Looks up a handler by command name.
    pub fn resolve(&self, name: &str) -> Option<Arc<dyn CommandHandler>> {
        self.handlers.get(name).cloned()
    }

    /// Collects every registered command's definition, ordered by name, for
    /// the platform sync payload.
    pub fn definitions(&self) -> Vec<CommandDefinition> {
        let mut definitions: Vec<_> = self.handlers.values().map(|h| h.definition()).collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

// =============================================================================
// ComponentRegistry
// =============================================================================

/// Mapping from permanent-component name to its handler, paired with the
/// component address codec.
#[derive(Default)]
pub struct ComponentRegistry {
    handlers: HashMap<String, Arc<dyn ComponentHandler>>,
}

impl ComponentRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a component handler under its own name.
    pub fn register(&mut self, handler: Arc<dyn ComponentHandler>) -> RegistryResult<()> {
        let name = handler.name().to_string();
        if self.handlers.contains_key(&name) {
            return Err(RegistryError::DuplicateName { name });
        }
        debug!(component = %name, "registered component handler");
        self.handlers.insert(name, handler);
        Ok(())
    }

    /// Issues a token addressing the component `name` with `args`.
    ///
    /// The name must be registered — issuing a token nothing can resolve is
    /// a programming error caught here rather than on the eventual click.
    pub fn create_token(&self, name: &str, args: &[TokenArg]) -> RegistryResult<String> {
        if !self.handlers.contains_key(name) {
            return Err(RegistryError::UnknownComponent {
                name: name.to_string(),
            });
        }
        Ok(token::encode(name, args)?)
    }

    /// Resolves an incoming token to a live handler plus its arguments.
    ///
    /// Both decode failures and decoded-but-unknown names surface as
    /// [`UnresolvedToken`] — a stale/unknown component is a normal outcome
    /// the dispatcher answers gracefully, never a crash.
    pub fn resolve(
        &self,
        token: &str,
    ) -> Result<(Arc<dyn ComponentHandler>, Vec<TokenArg>), UnresolvedToken> {
        let (name, args) = token::decode(token)?;
        match self.handlers.get(&name) {
            Some(handler) => Ok((Arc::clone(handler), args)),
            None => Err(UnresolvedToken::UnknownName { name }),
        }
    }

    /// Number of registered components.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
