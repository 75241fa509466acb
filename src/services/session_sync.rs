//! Session sync store: mirrors provider session state and keeps realtime authorized.
//!
//! ARCHITECTURE
//! ============
//! The store owns two `watch` channels (current session, current user) and
//! is their only writer. It is seeded from the provider's current snapshot
//! at start, then a listener task applies every pushed change event until
//! the returned `SyncHandle` is shut down or dropped.
//!
//! Each snapshot is applied the same way: session first, user second, and
//! only then the realtime `set_auth` call. Observers of session/user state
//! never wait on realtime authorization.
//!
//! ERROR HANDLING
//! ==============
//! Realtime failures never propagate. They go to the injected `Diagnostics`
//! sink and the next provider event (sign-in, token refresh) retries with a
//! fresh token. Provider errors from the initial snapshot propagate out of
//! `start`; inside the listener there is no caller, so they are logged.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::provider::IdentityProvider;
use super::realtime::RealtimeAuthorizer;
use super::session::{AuthEvent, Session, User, user_of};
use crate::error::{ErrorCode, ProviderError, RealtimeError};

// =============================================================================
// DIAGNOSTICS
// =============================================================================

/// Sink for failures the store swallows.
pub trait Diagnostics: Send + Sync {
    fn realtime_auth_failed(&self, err: &RealtimeError);
}

/// Reports swallowed failures through `tracing`.
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn realtime_auth_failed(&self, err: &RealtimeError) {
        warn!(
            error = %err,
            code = err.error_code(),
            retryable = err.retryable(),
            "realtime authorization failed; waiting for next session change"
        );
    }
}

// =============================================================================
// STORE
// =============================================================================

/// Observable session/user state. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct SessionSyncStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    session: watch::Sender<Option<Session>>,
    user: watch::Sender<Option<User>>,
    realtime: Arc<dyn RealtimeAuthorizer>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl SessionSyncStore {
    /// Seed the store from the provider and start following its change events.
    ///
    /// The change subscription is registered before the snapshot query so no
    /// event emitted in between is lost.
    ///
    /// # Errors
    ///
    /// Returns the provider's error if the initial snapshot query fails.
    pub async fn start(
        provider: Arc<dyn IdentityProvider>,
        realtime: Arc<dyn RealtimeAuthorizer>,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Result<(Self, SyncHandle), ProviderError> {
        let events = provider.subscribe();
        let (session, _) = watch::channel(None);
        let (user, _) = watch::channel(None);
        let store = Self { inner: Arc::new(StoreInner { session, user, realtime, diagnostics }) };

        let initial = provider.current_session().await?;
        store.apply(initial).await;
        info!(signed_in = store.inner.session.borrow().is_some(), "session store initialized");

        let task = tokio::spawn(listen(store.clone(), provider, events));
        Ok((store, SyncHandle { task }))
    }

    /// Snapshot of the current session.
    #[must_use]
    pub fn current_session(&self) -> Option<Session> {
        self.inner.session.borrow().clone()
    }

    /// Snapshot of the current user.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.inner.user.borrow().clone()
    }

    /// Subscribe to session assignments. Every assignment notifies, even an unchanged value.
    #[must_use]
    pub fn watch_session(&self) -> watch::Receiver<Option<Session>> {
        self.inner.session.subscribe()
    }

    /// Subscribe to user assignments.
    #[must_use]
    pub fn watch_user(&self) -> watch::Receiver<Option<User>> {
        self.inner.user.subscribe()
    }

    async fn apply(&self, session: Option<Session>) {
        let user = user_of(session.as_ref());
        let token = session
            .as_ref()
            .and_then(Session::realtime_token)
            .map(str::to_owned);

        self.inner.session.send_replace(session);
        self.inner.user.send_replace(user);

        let Some(token) = token else {
            return;
        };
        if let Err(err) = self.inner.realtime.set_auth(&token).await {
            self.inner.diagnostics.realtime_auth_failed(&err);
        }
    }
}

async fn listen(
    store: SessionSyncStore,
    provider: Arc<dyn IdentityProvider>,
    mut events: broadcast::Receiver<AuthEvent>,
) {
    loop {
        match events.recv().await {
            Ok(AuthEvent { kind, session }) => {
                debug!(?kind, signed_in = session.is_some(), "session change");
                store.apply(session).await;
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "session change events lagged; resyncing from provider");
                match provider.current_session().await {
                    Ok(session) => store.apply(session).await,
                    Err(e) => error!(error = %e, code = e.error_code(), "session resync failed"),
                }
            }
            Err(broadcast::error::RecvError::Closed) => {
                info!("identity provider closed its change stream");
                break;
            }
        }
    }
}

// =============================================================================
// SUBSCRIPTION HANDLE
// =============================================================================

/// Owns the listener task. Shut it down at application exit; dropping it also
/// stops the listener.
pub struct SyncHandle {
    task: JoinHandle<()>,
}

impl SyncHandle {
    /// Stop following provider events and wait for the listener to exit.
    ///
    /// Cancellation lands only at an await point, so a session/user pair is
    /// never left half-written; an in-flight `set_auth` is abandoned.
    pub async fn shutdown(mut self) {
        self.task.abort();
        match (&mut self.task).await {
            Ok(()) => debug!("session sync listener already stopped"),
            Err(e) if e.is_cancelled() => debug!("session sync listener stopped"),
            Err(e) => error!(error = %e, "session sync listener panicked"),
        }
    }

    /// Whether the listener has exited (provider stream closed or handle shut down).
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
#[path = "session_sync_test.rs"]
mod tests;
