//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It is built once in `main` from explicitly constructed parts; nothing
//! here is a process-global.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::AppConfig;
use crate::identity::Identity;
use crate::services::provider::LocalIdentityProvider;
use crate::services::session_sync::SessionSyncStore;

/// Handler state. Cloned per request, so every field is shared.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// Read side of session/user state.
    pub sessions: SessionSyncStore,
    /// Write side: sessions handed over by the browser SDK land here.
    pub provider: Arc<LocalIdentityProvider>,
    /// Browser that handed over the current session, if any.
    pub session_owner: Arc<Mutex<Option<Identity>>>,
}

impl AppState {
    #[must_use]
    pub fn new(config: AppConfig, sessions: SessionSyncStore, provider: Arc<LocalIdentityProvider>) -> Self {
        Self { config: Arc::new(config), sessions, provider, session_owner: Arc::new(Mutex::new(None)) }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use super::*;
    use crate::services::realtime::RealtimeHub;
    use crate::services::session_sync::{SyncHandle, TracingDiagnostics};

    /// Live pieces behind a test `AppState`. Keep `handle` alive for the test's duration.
    pub struct TestApp {
        pub state: AppState,
        pub realtime: Arc<RealtimeHub>,
        pub handle: SyncHandle,
    }

    /// Build an `AppState` over a local provider and realtime hub.
    pub async fn test_app(config: AppConfig) -> TestApp {
        let provider = Arc::new(LocalIdentityProvider::new());
        let realtime = Arc::new(RealtimeHub::new());
        let (sessions, handle) = SessionSyncStore::start(provider.clone(), realtime.clone(), Arc::new(TracingDiagnostics))
            .await
            .expect("local provider never fails");
        TestApp { state: AppState::new(config, sessions, provider), realtime, handle }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_app_starts_signed_out() {
        let app = test_helpers::test_app(AppConfig::default()).await;
        assert!(app.state.sessions.current_session().is_none());
        assert!(app.realtime.token().is_none());
        assert_eq!(app.state.provider.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn clones_share_config() {
        let app = test_helpers::test_app(AppConfig::default()).await;
        let clone = app.state.clone();
        assert!(Arc::ptr_eq(&clone.config, &app.state.config));
        assert!(Arc::ptr_eq(&clone.session_owner, &app.state.session_owner));
    }
}
