//! Interaction event model.
//!
//! One [`InteractionEvent`] is one unit of user action delivered by the
//! gateway: a slash-command invocation, an autocomplete query, or a
//! component activation (button press / menu select). The three kinds are an
//! explicit tagged union — [`InteractionPayload`] — so the dispatcher can
//! branch exhaustively at a single point instead of probing runtime types.
//!
//! An event is immutable except for its acknowledgment state, which advances
//! `Unacknowledged → Deferred → Replied` with the terminal transition
//! happening at most once. The state is atomic because a handler may
//! acknowledge from a spawned task while the dispatcher later inspects it on
//! the failure path.

use std::sync::atomic::{AtomicU8, Ordering};

use serde_json::Value;

// =============================================================================
// Actor & Origin
// =============================================================================

/// The platform user behind an interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// Platform-assigned user id.
    pub external_id: String,
    /// Platform-global username.
    pub username: String,
}

/// Where an interaction was issued from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// A guild channel.
    Guild {
        /// Platform id of the guild.
        guild_id: String,
        /// The actor's guild profile name, when the gateway delivered it.
        display_name: Option<String>,
    },
    /// A direct-message channel.
    Direct,
}

impl Origin {
    /// Returns the guild id when the interaction came from a guild.
    pub fn guild_id(&self) -> Option<&str> {
        match self {
            Self::Guild { guild_id, .. } => Some(guild_id),
            Self::Direct => None,
        }
    }
}

// =============================================================================
// Payload variants
// =============================================================================

/// One named option value submitted with a command.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOption {
    /// Option name as declared in the command definition.
    pub name: String,
    /// The submitted value.
    pub value: Value,
}

/// Payload of a slash-command invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandPayload {
    /// Name of the invoked command.
    pub command: String,
    /// Submitted option values.
    pub options: Vec<CommandOption>,
}

impl CommandPayload {
    /// Looks up a raw option value by name.
    pub fn option(&self, name: &str) -> Option<&Value> {
        self.options.iter().find(|o| o.name == name).map(|o| &o.value)
    }

    /// Looks up an integer option by name.
    pub fn integer(&self, name: &str) -> Option<i64> {
        self.option(name).and_then(Value::as_i64)
    }

    /// Looks up a text option by name.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.option(name).and_then(Value::as_str)
    }
}

/// Payload of an autocomplete query.
#[derive(Debug, Clone, PartialEq)]
pub struct AutocompletePayload {
    /// Name of the command the query belongs to.
    pub command: String,
    /// Name of the focused field.
    pub field: String,
    /// What the user has typed into the focused field so far.
    pub partial: String,
    /// Option values submitted alongside the focused field.
    pub options: Vec<CommandOption>,
}

/// Payload of a component activation.
///
/// The token is the *entire* persisted state of the component; decoding it
/// is the only way to learn which handler it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentPayload {
    /// The opaque component token issued when the component was created.
    pub token: String,
}

/// Tagged union over the three interaction kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionPayload {
    /// A slash-command invocation.
    Command(CommandPayload),
    /// An autocomplete query.
    Autocomplete(AutocompletePayload),
    /// A component activation.
    Component(ComponentPayload),
}

impl InteractionPayload {
    /// Returns a short name for the variant, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Command(_) => "command",
            Self::Autocomplete(_) => "autocomplete",
            Self::Component(_) => "component",
        }
    }
}

// =============================================================================
// Acknowledgment state
// =============================================================================

/// Acknowledgment lifecycle of one interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Ack {
    /// Nothing has been sent to the gateway yet.
    Unacknowledged = 0,
    /// A deferred acknowledgment was sent; a follow-up must edit it.
    Deferred = 1,
    /// A terminal response was sent.
    Replied = 2,
}

/// Which gateway channel a terminal response must use *right now*.
///
/// Sending via the wrong channel is a protocol violation, so the decision is
/// made by reading the acknowledgment state at the moment of responding —
/// not at dispatch start, because handlers may acknowledge asynchronously in
/// between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseChannel {
    /// Direct reply; valid only while unacknowledged.
    Reply,
    /// Edit / follow-up of an earlier acknowledgment.
    Edit,
}

/// Atomic acknowledgment cell shared between handler and dispatcher.
#[derive(Debug, Default)]
pub struct AckState(AtomicU8);

impl AckState {
    /// Reads the current state.
    pub fn get(&self) -> Ack {
        match self.0.load(Ordering::SeqCst) {
            0 => Ack::Unacknowledged,
            1 => Ack::Deferred,
            _ => Ack::Replied,
        }
    }

    /// Records a deferred acknowledgment.
    ///
    /// Returns `false` if the event was already acknowledged.
    pub fn defer(&self) -> bool {
        self.0
            .compare_exchange(
                Ack::Unacknowledged as u8,
                Ack::Deferred as u8,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_ok()
    }

    /// Records the terminal response.
    ///
    /// Returns `false` if a terminal response was already recorded; the
    /// transition to [`Ack::Replied`] succeeds at most once.
    pub fn reply(&self) -> bool {
        self.0.swap(Ack::Replied as u8, Ordering::SeqCst) != Ack::Replied as u8
    }
}

// =============================================================================
// InteractionEvent
// =============================================================================

/// One interaction delivered by the gateway.
#[derive(Debug)]
pub struct InteractionEvent {
    id: String,
    actor: Actor,
    origin: Origin,
    payload: InteractionPayload,
    ack: AckState,
}

impl InteractionEvent {
    /// Creates an event in the unacknowledged state.
    pub fn new(
        id: impl Into<String>,
        actor: Actor,
        origin: Origin,
        payload: InteractionPayload,
    ) -> Self {
        Self {
            id: id.into(),
            actor,
            origin,
            payload,
            ack: AckState::default(),
        }
    }

    /// Gateway-assigned event id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The interacting user.
    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    /// Where the interaction came from.
    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// The variant payload.
    pub fn payload(&self) -> &InteractionPayload {
        &self.payload
    }

    /// The acknowledgment cell.
    pub fn ack(&self) -> &AckState {
        &self.ack
    }

    /// Channel a terminal response must use at this moment.
    pub fn response_channel(&self) -> ResponseChannel {
        match self.ack.get() {
            Ack::Unacknowledged => ResponseChannel::Reply,
            Ack::Deferred | Ack::Replied => ResponseChannel::Edit,
        }
    }
}
