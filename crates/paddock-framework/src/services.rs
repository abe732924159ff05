//! Domain service ports consumed by the routing core.
//!
//! User/game/race logic and its persistence live behind these traits. The
//! one invariant the router leans on: at most one account maps to a given
//! ([`Provider`], external id) pair, enforced by a storage-level unique
//! constraint that surfaces as [`ServiceError::IdentityExists`].

use async_trait::async_trait;
use thiserror::Error;

use paddock_core::{Account, Provider};

use crate::error::HandlerError;
use crate::gateway::GatewayError;

/// Errors surfaced by domain services.
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    /// The unique identity constraint fired on create.
    ///
    /// Under concurrent first-contact events this is a recoverable outcome —
    /// someone else just created the mapping — not a fatal duplicate-key
    /// failure.
    #[error("an identity mapping for ({provider}, {external_id}) already exists")]
    IdentityExists {
        /// Provider of the existing mapping.
        provider: Provider,
        /// External id of the existing mapping.
        external_id: String,
    },

    /// Any other service failure.
    #[error("domain service failure: {0}")]
    Internal(String),
}

/// Result type for domain service calls.
pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<ServiceError> for HandlerError {
    fn from(err: ServiceError) -> Self {
        Self::Unexpected(err.into())
    }
}

impl From<GatewayError> for HandlerError {
    fn from(err: GatewayError) -> Self {
        Self::Unexpected(err.into())
    }
}

/// Account lookup and first-contact registration.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Loads the account bound to (`provider`, `external_id`), if any.
    async fn get_from_provider(
        &self,
        provider: Provider,
        external_id: &str,
    ) -> ServiceResult<Option<Account>>;

    /// Creates an account and binds the external identity to it.
    async fn register(
        &self,
        provider: Provider,
        external_id: &str,
        display_name: &str,
    ) -> ServiceResult<Account>;
}
