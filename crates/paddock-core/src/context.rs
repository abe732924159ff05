//! Scoped per-event execution context.
//!
//! A [`ScopedContext`] is created for each dispatched interaction and is the
//! only channel through which ambient state — the event being handled, the
//! authenticated account, handler-local transient values — reaches deeply
//! nested asynchronous calls without explicit parameter threading.
//!
//! The context rides a `tokio::task_local!` cell: [`ScopedContext::run`]
//! establishes it for the dynamic extent of one future, and it is torn down
//! when that future settles, success or failure. Tasks handling unrelated
//! events never observe each other's context.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::event::InteractionEvent;
use crate::identity::Account;

tokio::task_local! {
    static CURRENT: Arc<ScopedContext>;
}

/// Per-event ambient state, propagated task-locally.
pub struct ScopedContext {
    event: Arc<InteractionEvent>,
    /// Written once by the authentication gate; empty until then.
    account: RwLock<Option<Account>>,
    /// Handler-local transient values, keyed by type.
    state: Mutex<HashMap<TypeId, Box<dyn Any + Send + Sync>>>,
}

impl ScopedContext {
    /// Creates a fresh context for one event.
    pub fn new(event: Arc<InteractionEvent>) -> Arc<Self> {
        Arc::new(Self {
            event,
            account: RwLock::new(None),
            state: Mutex::new(HashMap::new()),
        })
    }

    /// The event this context belongs to.
    pub fn event(&self) -> &Arc<InteractionEvent> {
        &self.event
    }

    /// The authenticated account, if the gate has run.
    pub fn account(&self) -> Option<Account> {
        self.account.read().clone()
    }

    /// Returns `true` once the authentication gate has run.
    pub fn is_authenticated(&self) -> bool {
        self.account.read().is_some()
    }

    /// Marks this context as logged in.
    ///
    /// The login lasts for the remainder of the context's lifetime; there is
    /// no logout path.
    pub fn set_account(&self, account: Account) {
        *self.account.write() = Some(account);
    }

    /// Stores a transient value in this context's state map.
    ///
    /// One value per type; subsequent calls overwrite.
    pub fn set_state<T: Send + Sync + 'static>(&self, value: T) {
        self.state.lock().insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Retrieves a cloned transient value.
    pub fn get_state<T: Clone + 'static>(&self) -> Option<T> {
        self.state
            .lock()
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref::<T>())
            .cloned()
    }

    /// Removes and returns a transient value.
    pub fn take_state<T: 'static>(&self) -> Option<T> {
        self.state
            .lock()
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast::<T>().ok())
            .map(|v| *v)
    }

    /// Runs `future` with this context established for its entire dynamic
    /// extent, tearing it down when the future settles.
    pub async fn run<F>(self: Arc<Self>, future: F) -> F::Output
    where
        F: Future,
    {
        CURRENT.scope(self, future).await
    }

    /// The context of the event currently being handled.
    ///
    /// # Panics
    ///
    /// Panics outside a [`ScopedContext::run`] scope — calling this from
    /// code that is not handling an event is a programming error. Use
    /// [`ScopedContext::try_current`] where absence is expected.
    pub fn current() -> Arc<ScopedContext> {
        CURRENT.with(Arc::clone)
    }

    /// The current context, or `None` outside an event scope.
    pub fn try_current() -> Option<Arc<ScopedContext>> {
        CURRENT.try_with(Arc::clone).ok()
    }
}

impl std::fmt::Debug for ScopedContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedContext")
            .field("event", &self.event.id())
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Actor, CommandPayload, InteractionPayload, Origin};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Barrier;

    fn event(id: &str, user: &str) -> Arc<InteractionEvent> {
        Arc::new(InteractionEvent::new(
            id,
            Actor {
                external_id: user.into(),
                username: user.into(),
            },
            Origin::Direct,
            InteractionPayload::Command(CommandPayload {
                command: "ping".into(),
                options: vec![],
            }),
        ))
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Note(&'static str);

    #[tokio::test]
    async fn concurrent_events_never_observe_each_other() {
        let barrier = Arc::new(Barrier::new(2));

        let b1 = Arc::clone(&barrier);
        let first = tokio::spawn(ScopedContext::new(event("1", "alice")).run(async move {
            let ctx = ScopedContext::current();
            ctx.set_state(Note("from alice"));
            ctx.set_account(Account {
                id: 1,
                name: "alice".into(),
            });
            // Hold the scope open until both tasks have written.
            b1.wait().await;
            (
                ctx.event().id().to_string(),
                ctx.get_state::<Note>(),
                ctx.account(),
            )
        }));

        let b2 = Arc::clone(&barrier);
        let second = tokio::spawn(ScopedContext::new(event("2", "bob")).run(async move {
            let ctx = ScopedContext::current();
            b2.wait().await;
            (
                ctx.event().id().to_string(),
                ctx.get_state::<Note>(),
                ctx.account(),
            )
        }));

        let (first, second) = (first.await.unwrap(), second.await.unwrap());
        assert_eq!(first.0, "1");
        assert_eq!(first.1, Some(Note("from alice")));
        assert_eq!(first.2.map(|a| a.id), Some(1));

        // Bob's concurrently running scope saw none of Alice's writes.
        assert_eq!(second.0, "2");
        assert_eq!(second.1, None);
        assert_eq!(second.2, None);
    }

    #[tokio::test]
    async fn context_is_torn_down_when_the_future_settles() {
        assert!(ScopedContext::try_current().is_none());

        let outcome: Result<(), &str> = ScopedContext::new(event("1", "alice"))
            .run(async {
                assert!(ScopedContext::try_current().is_some());
                Err("handler failed")
            })
            .await;

        assert!(outcome.is_err());
        // Torn down on the failure path too.
        assert!(ScopedContext::try_current().is_none());
    }

    #[tokio::test]
    async fn nested_scope_shadows_and_restores() {
        ScopedContext::new(event("outer", "alice"))
            .run(async {
                assert_eq!(ScopedContext::current().event().id(), "outer");

                ScopedContext::new(event("inner", "alice"))
                    .run(async {
                        assert_eq!(ScopedContext::current().event().id(), "inner");
                    })
                    .await;

                assert_eq!(ScopedContext::current().event().id(), "outer");
            })
            .await;
    }

    #[tokio::test]
    async fn state_values_can_be_taken_once() {
        ScopedContext::new(event("1", "alice"))
            .run(async {
                let ctx = ScopedContext::current();
                ctx.set_state(Note("once"));
                assert_eq!(ctx.take_state::<Note>(), Some(Note("once")));
                assert_eq!(ctx.take_state::<Note>(), None);
            })
            .await;
    }

    #[test]
    fn current_panics_outside_a_scope() {
        let hits = AtomicUsize::new(0);
        let result = std::panic::catch_unwind(|| {
            let _ = ScopedContext::current();
            hits.fetch_add(1, Ordering::SeqCst);
        });
        assert!(result.is_err());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
