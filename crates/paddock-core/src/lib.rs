//! # Paddock Core
//!
//! Foundation types for the paddock interaction-routing core.
//!
//! This crate is free of I/O: it defines the data that flows through the
//! router and the two pure mechanisms the router is built on.
//!
//! - **Event model** ([`event`]): [`InteractionEvent`] — a tagged union over
//!   the three gateway interaction kinds (command, autocomplete, component
//!   activation) plus the atomic acknowledgment state.
//! - **Component address codec** ([`token`]): encodes a (handler name,
//!   argument list) pair into a bounded opaque token and back. The token is
//!   the entire persisted state of a button, which is what makes components
//!   survive process restarts.
//! - **Scoped context** ([`context`]): [`ScopedContext`] — per-event ambient
//!   state propagated task-locally through one event's asynchronous
//!   handling, isolated between concurrent events.
//! - **Identity types** ([`identity`]): [`Account`] and [`Provider`],
//!   referenced collaborator data owned by the domain layer.
//!
//! ```text
//! gateway ──▶ InteractionEvent ──▶ dispatcher (paddock-framework)
//!                                   │  ScopedContext::run
//!                                   ▼
//!                                handler ──▶ domain services
//! ```

pub mod context;
pub mod error;
pub mod event;
pub mod identity;
pub mod token;

pub use context::ScopedContext;
pub use error::{DecodeResult, EncodeResult, TokenDecodeError, TokenEncodeError};
pub use event::{
    Ack, AckState, Actor, AutocompletePayload, CommandOption, CommandPayload, ComponentPayload,
    InteractionEvent, InteractionPayload, Origin, ResponseChannel,
};
pub use identity::{Account, Provider};
pub use token::{MAX_TOKEN_LEN, TokenArg, decode, encode};
