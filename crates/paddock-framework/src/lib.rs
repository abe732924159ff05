//! # Paddock Framework
//!
//! The routing layer of the paddock interaction core: everything between
//! "event arrives" and "domain service is called".
//!
//! - **Registries** ([`registry`]): immutable-after-startup mappings from
//!   handler name to [`CommandHandler`] / [`ComponentHandler`]; the
//!   component registry pairs with the address codec so previously issued
//!   buttons keep resolving across restarts.
//! - **Authentication gate** ([`auth`]): resolves or first-contact registers
//!   the internal account behind an actor and logs the scoped context in.
//! - **Dispatcher** ([`dispatcher`]): classifies each event, resolves its
//!   handler, runs the gate when required, executes inside the scoped
//!   context, and classifies failures — only unexpected errors cross it.
//! - **Ports** ([`gateway`], [`services`]): the traits the router consumes;
//!   transports and domain logic live outside this workspace.

pub mod auth;
pub mod dispatcher;
pub mod error;
pub mod field;
pub mod gateway;
pub mod handler;
pub mod registry;
pub mod services;

pub use auth::AuthenticationGate;
pub use dispatcher::{Dispatch, Dispatcher};
pub use error::{
    DispatchError, HandlerError, HandlerResult, RegistryError, RegistryResult, ResolutionFailure,
    UnresolvedToken,
};
pub use field::{AutocompleteChoice, AutocompleteField};
pub use gateway::{
    CommandSink, GatewayError, GatewayResult, InteractionResponder, MemberDirectory, Response,
};
pub use handler::{CommandDefinition, CommandHandler, ComponentHandler, OptionDefinition, OptionKind};
pub use registry::{CommandRegistry, ComponentRegistry};
pub use services::{ServiceError, ServiceResult, UserService};
