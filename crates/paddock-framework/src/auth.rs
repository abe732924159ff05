//! Account-linking authentication gate.
//!
//! Runs before privileged handlers: resolves (or first-contact registers)
//! the internal account behind the event's actor and marks the current
//! [`ScopedContext`] as logged in. The login lasts for the remainder of the
//! context's lifetime; there is no logout path.

use std::sync::Arc;

use tracing::debug;

use paddock_core::{Account, InteractionEvent, Origin, Provider, ScopedContext};

use crate::error::{HandlerError, HandlerResult};
use crate::gateway::MemberDirectory;
use crate::services::{ServiceError, UserService};

/// The gate in front of `login_required` handlers.
pub struct AuthenticationGate {
    users: Arc<dyn UserService>,
    directory: Arc<dyn MemberDirectory>,
    provider: Provider,
    home_guild_id: String,
}

impl AuthenticationGate {
    /// Creates a gate for one provider and home guild.
    pub fn new(
        users: Arc<dyn UserService>,
        directory: Arc<dyn MemberDirectory>,
        provider: Provider,
        home_guild_id: impl Into<String>,
    ) -> Self {
        Self {
            users,
            directory,
            provider,
            home_guild_id: home_guild_id.into(),
        }
    }

    /// Resolves the internal account for the event's actor and records it on
    /// the current scoped context.
    ///
    /// Must be called inside a [`ScopedContext::run`] scope. Returns the
    /// already-authenticated account unchanged when the gate ran before.
    pub async fn ensure_authenticated(&self, event: &InteractionEvent) -> HandlerResult<Account> {
        let ctx = ScopedContext::current();
        if let Some(account) = ctx.account() {
            return Ok(account);
        }

        let external_id = &event.actor().external_id;
        let account = match self
            .users
            .get_from_provider(self.provider, external_id)
            .await?
        {
            Some(account) => account,
            None => self.first_contact(event, external_id).await?,
        };

        debug!(account = account.id, actor = %external_id, "session authenticated");
        ctx.set_account(account.clone());
        Ok(account)
    }

    /// First-contact registration for an external id with no mapping yet.
    async fn first_contact(
        &self,
        event: &InteractionEvent,
        external_id: &str,
    ) -> HandlerResult<Account> {
        let name = self.display_name(event).await?;
        match self.users.register(self.provider, external_id, &name).await {
            Ok(account) => Ok(account),
            // Lost a first-contact race: the storage constraint fired
            // because a concurrent event just bound this identity. Re-read
            // the winner's account instead of failing.
            Err(ServiceError::IdentityExists { .. }) => self
                .users
                .get_from_provider(self.provider, external_id)
                .await?
                .ok_or_else(|| {
                    HandlerError::Unexpected(anyhow::anyhow!(
                        "identity for '{external_id}' vanished after a duplicate-key race"
                    ))
                }),
            Err(err) => Err(err.into()),
        }
    }

    /// Display-name preference: the origin guild profile name when the
    /// origin is the home guild, then a home-guild membership lookup, then
    /// the platform-global username.
    async fn display_name(&self, event: &InteractionEvent) -> HandlerResult<String> {
        if let Origin::Guild {
            guild_id,
            display_name: Some(name),
        } = event.origin()
        {
            if *guild_id == self.home_guild_id {
                return Ok(name.clone());
            }
        }

        if let Some(name) = self
            .directory
            .display_name(&self.home_guild_id, &event.actor().external_id)
            .await?
        {
            return Ok(name);
        }

        Ok(event.actor().username.clone())
    }
}

impl std::fmt::Debug for AuthenticationGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticationGate")
            .field("provider", &self.provider)
            .field("home_guild_id", &self.home_guild_id)
            .finish_non_exhaustive()
    }
}
