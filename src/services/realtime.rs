//! Realtime-authorization contract and an in-process hub.
//!
//! The realtime subsystem needs a bearer token before private channels can
//! be joined. `RealtimeHub` holds the current token for in-process channel
//! consumers and refuses updates once closed.

use std::sync::Mutex;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::RealtimeError;

/// Entry point the session store uses to (re)authorize realtime channels.
#[async_trait]
pub trait RealtimeAuthorizer: Send + Sync {
    /// Set the bearer token used for realtime channel access.
    async fn set_auth(&self, token: &str) -> Result<(), RealtimeError>;
}

// =============================================================================
// HUB
// =============================================================================

#[derive(Default)]
pub struct RealtimeHub {
    inner: Mutex<HubInner>,
}

#[derive(Default)]
struct HubInner {
    token: Option<String>,
    authorizations: u64,
    closed: bool,
}

impl RealtimeHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bearer token currently in force.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.lock().token.clone()
    }

    /// Count of accepted `set_auth` calls.
    #[cfg(test)]
    pub(crate) fn authorizations(&self) -> u64 {
        self.lock().authorizations
    }

    /// Drop the token and reject further authorization.
    pub fn close(&self) {
        let mut inner = self.lock();
        inner.closed = true;
        inner.token = None;
        info!("realtime hub closed");
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HubInner> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl RealtimeAuthorizer for RealtimeHub {
    async fn set_auth(&self, token: &str) -> Result<(), RealtimeError> {
        if token.is_empty() {
            return Err(RealtimeError::EmptyToken);
        }
        let mut inner = self.lock();
        if inner.closed {
            return Err(RealtimeError::Closed);
        }
        inner.token = Some(token.to_owned());
        inner.authorizations += 1;
        debug!(authorizations = inner.authorizations, "realtime token updated");
        Ok(())
    }
}
