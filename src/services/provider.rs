//! Identity-provider contract and an in-process provider.
//!
//! ARCHITECTURE
//! ============
//! The session store only needs two things from a provider: a one-shot
//! snapshot of the current session, and a push stream of change events.
//! `LocalIdentityProvider` implements both over a `broadcast` channel so
//! the server can relay sessions handed over by the browser-side SDK.

use async_trait::async_trait;
use tokio::sync::{RwLock, broadcast};
use tracing::debug;

use super::session::{AuthEvent, AuthEventKind, Session, User};
use crate::error::ProviderError;

const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Source of truth for login sessions.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Return the provider's current session snapshot.
    async fn current_session(&self) -> Result<Option<Session>, ProviderError>;

    /// Register for change notifications. Dropping the receiver unregisters.
    fn subscribe(&self) -> broadcast::Receiver<AuthEvent>;
}

// =============================================================================
// LOCAL PROVIDER
// =============================================================================

pub struct LocalIdentityProvider {
    current: RwLock<Option<Session>>,
    events: broadcast::Sender<AuthEvent>,
}

impl LocalIdentityProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    /// Build a provider whose event buffer holds `capacity` undelivered events per subscriber.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity.max(1));
        Self { current: RwLock::new(None), events }
    }

    /// Replace the current session. Reports `TokenRefreshed` when the same user stays signed in.
    pub async fn sign_in(&self, session: Session) -> AuthEventKind {
        let mut current = self.current.write().await;
        let same_user = match (current.as_ref().and_then(Session::user_id), session.user_id()) {
            (Some(prev), Some(next)) => prev == next,
            _ => false,
        };
        let kind = if same_user { AuthEventKind::TokenRefreshed } else { AuthEventKind::SignedIn };
        *current = Some(session.clone());
        self.emit(AuthEvent::new(kind, Some(session)));
        kind
    }

    /// Clear the current session. Emits `SignedOut` even if nobody was signed in.
    pub async fn sign_out(&self) {
        let mut current = self.current.write().await;
        *current = None;
        self.emit(AuthEvent::new(AuthEventKind::SignedOut, None));
    }

    /// Swap the user on the active session, emitting a new session value.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::NotSignedIn`] when there is no session.
    pub async fn update_user(&self, user: User) -> Result<(), ProviderError> {
        let mut current = self.current.write().await;
        let Some(existing) = current.as_ref() else {
            return Err(ProviderError::NotSignedIn);
        };
        let session = Session { user: Some(user), ..existing.clone() };
        *current = Some(session.clone());
        self.emit(AuthEvent::new(AuthEventKind::UserUpdated, Some(session)));
        Ok(())
    }

    /// Number of live change subscriptions.
    #[cfg(test)]
    pub(crate) fn subscriber_count(&self) -> usize {
        self.events.receiver_count()
    }

    // Called with the write lock held so subscribers see events in commit order.
    fn emit(&self, event: AuthEvent) {
        let kind = event.kind;
        if self.events.send(event).is_err() {
            debug!(?kind, "auth event dropped: no subscribers");
        }
    }
}

impl Default for LocalIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn current_session(&self) -> Result<Option<Session>, ProviderError> {
        Ok(self.current.read().await.clone())
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
#[path = "provider_test.rs"]
mod tests;
