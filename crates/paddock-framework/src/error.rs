//! Error taxonomy for the routing layer.
//!
//! Propagation policy, inspected once at the dispatcher boundary:
//!
//! - [`RegistryError`] — startup/construction-time programming errors,
//!   fatal at registration time, never at request time.
//! - [`ResolutionFailure`] / [`UnresolvedToken`] — expected; absorbed by the
//!   dispatcher with a graceful no-op or a user-visible notice.
//! - [`HandlerError::Domain`] — expected and user-actionable; absorbed with
//!   exactly one terminal response carrying the message.
//! - [`HandlerError::Unexpected`] — re-raised as
//!   [`DispatchError::Unexpected`], the only error that crosses the
//!   dispatcher boundary.

use thiserror::Error;

use paddock_core::{TokenDecodeError, TokenEncodeError};

// =============================================================================
// Registry errors (construction time)
// =============================================================================

/// Errors raised while building registries or issuing tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A handler with this name is already registered.
    #[error("a handler named '{name}' is already registered")]
    DuplicateName {
        /// The colliding name.
        name: String,
    },

    /// A token was requested for a name no component handler carries.
    #[error("no component handler named '{name}' is registered")]
    UnknownComponent {
        /// The unknown name.
        name: String,
    },

    /// Token encoding failed.
    #[error(transparent)]
    Encode(#[from] TokenEncodeError),
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

// =============================================================================
// Resolution failures (request time, expected)
// =============================================================================

/// Why an incoming component token did not resolve to a live handler.
///
/// This is a normal outcome, not a crash: tokens outlive deployments, and a
/// rebuilt process may have renamed or removed the handler a token names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnresolvedToken {
    /// The token did not decode.
    #[error("component token did not decode: {0}")]
    Undecodable(#[from] TokenDecodeError),

    /// The token decoded but names a handler nothing registered.
    #[error("component token names unknown handler '{name}'")]
    UnknownName {
        /// The decoded, unregistered name.
        name: String,
    },
}

/// Why an incoming event could not be matched to a handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionFailure {
    /// The payload names a command nothing registered.
    #[error("no command named '{name}' is registered")]
    UnknownCommand {
        /// The unknown command name.
        name: String,
    },

    /// The component token did not resolve.
    #[error(transparent)]
    Component(#[from] UnresolvedToken),
}

// =============================================================================
// Handler failures
// =============================================================================

/// Failure produced by a handler, classified once at the dispatcher.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Expected, user-actionable failure. The message is shown verbatim to
    /// the actor as an ephemeral response and the error goes no further.
    #[error("{0}")]
    Domain(String),

    /// Anything else. The actor sees a generic, non-leaking notice and the
    /// original error propagates to process-level reporting.
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl HandlerError {
    /// Creates a domain error carrying a user-facing message.
    pub fn domain(message: impl Into<String>) -> Self {
        Self::Domain(message.into())
    }
}

/// Result type returned by handler capabilities.
pub type HandlerResult<T = ()> = Result<T, HandlerError>;

// =============================================================================
// Dispatcher boundary
// =============================================================================

/// The only error that crosses the dispatcher boundary.
///
/// By the time this surfaces the actor has already been answered; the caller
/// owns process-level reporting. Fatal to the operation, not to the process.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// An unexpected failure re-raised from a handler.
    #[error("unhandled failure while executing '{handler}'")]
    Unexpected {
        /// Name of the handler that failed.
        handler: String,
        /// The original error.
        #[source]
        source: anyhow::Error,
    },
}
