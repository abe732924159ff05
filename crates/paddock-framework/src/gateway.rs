//! Outbound gateway ports.
//!
//! The gateway transport lives outside this workspace; the router only
//! depends on these traits. Every call here is a suspension point.

use async_trait::async_trait;
use thiserror::Error;

use paddock_core::InteractionEvent;

use crate::handler::CommandDefinition;

/// Errors surfaced by gateway calls.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// The transport failed before the platform answered.
    #[error("gateway transport failure: {0}")]
    Transport(String),

    /// The platform answered with an error.
    #[error("gateway rejected the call: {0}")]
    Rejected(String),
}

/// Result type for gateway calls.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// A terminal response to an interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Message text.
    pub content: String,
    /// Visible only to the interacting actor.
    pub ephemeral: bool,
    /// Drop any interactive components attached to the prior message.
    pub clear_components: bool,
}

impl Response {
    /// A public response that leaves prior UI in place.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ephemeral: false,
            clear_components: false,
        }
    }

    /// A private notice to the actor, clearing any transient UI.
    pub fn private_notice(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ephemeral: true,
            clear_components: true,
        }
    }
}

/// Sends terminal responses for an interaction.
///
/// Implementations must record the acknowledgment on the event's
/// [`AckState`](paddock_core::AckState) once a send succeeds, so later
/// channel decisions observe it.
#[async_trait]
pub trait InteractionResponder: Send + Sync {
    /// Direct reply; valid only while the event is unacknowledged.
    async fn reply(&self, event: &InteractionEvent, response: Response) -> GatewayResult<()>;

    /// Edit / follow-up of a prior acknowledgment.
    async fn edit_reply(&self, event: &InteractionEvent, response: Response) -> GatewayResult<()>;
}

/// Looks up guild-membership display names.
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    /// The display name of `external_id` inside `guild_id`, or `None` when
    /// the user is not a member.
    async fn display_name(
        &self,
        guild_id: &str,
        external_id: &str,
    ) -> GatewayResult<Option<String>>;
}

/// Receives the batched command definitions on sync.
#[async_trait]
pub trait CommandSink: Send + Sync {
    /// Replaces the platform's registered command set with `definitions`.
    async fn push_commands(&self, definitions: Vec<CommandDefinition>) -> GatewayResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn private_notices_clear_transient_ui() {
        let notice = Response::private_notice("Inscrições encerradas");
        assert!(notice.ephemeral);
        assert!(notice.clear_components);

        let public = Response::new("Corrida criada!");
        assert!(!public.ephemeral);
        assert!(!public.clear_components);
    }
}
