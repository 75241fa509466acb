//! Auth-session routes: hand sessions to the provider, read them from the store.
//!
//! The browser that hands a session over owns it. Only that identity may
//! replace it, edit its user, or sign it out; everyone else gets `403`.
//! Reads never expose tokens.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::ProviderError;
use crate::identity::Identity;
use crate::services::session::{Session, User};
use crate::state::AppState;

/// Token-free view of the store's current session.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub signed_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    pub user: Option<User>,
}

impl SessionView {
    fn of(session: Option<&Session>, user: Option<User>) -> Self {
        Self { signed_in: session.is_some(), expires_at: session.and_then(|s| s.expires_at), user }
    }
}

fn check_owner(owner: Option<&Identity>, caller: &Identity) -> Result<(), StatusCode> {
    match owner {
        Some(owner) if owner != caller => {
            warn!(%caller, "session change refused: not the owner");
            Err(StatusCode::FORBIDDEN)
        }
        _ => Ok(()),
    }
}

/// `GET /api/auth/session`: signed-in flag, expiry, and user as seen by the store.
pub async fn current_session(State(state): State<AppState>) -> Json<SessionView> {
    let session = state.sessions.current_session();
    Json(SessionView::of(session.as_ref(), state.sessions.current_user()))
}

/// `POST /api/auth/session`: hand over a session issued by the provider SDK.
pub async fn sign_in(
    State(state): State<AppState>,
    identity: Identity,
    Json(session): Json<Session>,
) -> StatusCode {
    if session.access_token.is_empty() {
        return StatusCode::BAD_REQUEST;
    }
    let mut owner = state.session_owner.lock().await;
    if let Err(status) = check_owner(owner.as_ref(), &identity) {
        return status;
    }
    let user_id = session.user_id().map(str::to_owned);
    let kind = state.provider.sign_in(session).await;
    *owner = Some(identity);
    info!(?kind, user_id = user_id.as_deref().unwrap_or("-"), "session handed over");
    StatusCode::NO_CONTENT
}

/// `PATCH /api/auth/session/user`: replace the user on the active session.
pub async fn update_user(State(state): State<AppState>, identity: Identity, Json(user): Json<User>) -> StatusCode {
    let owner = state.session_owner.lock().await;
    if let Err(status) = check_owner(owner.as_ref(), &identity) {
        return status;
    }
    let user_id = user.id.clone();
    match state.provider.update_user(user).await {
        Ok(()) => {
            info!(%user_id, "session user updated");
            StatusCode::NO_CONTENT
        }
        Err(ProviderError::NotSignedIn) => StatusCode::CONFLICT,
        Err(e) => {
            warn!(error = %e, "session user update failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// `DELETE /api/auth/session`: sign out.
pub async fn sign_out(State(state): State<AppState>, identity: Identity) -> StatusCode {
    let mut owner = state.session_owner.lock().await;
    if let Err(status) = check_owner(owner.as_ref(), &identity) {
        return status;
    }
    state.provider.sign_out().await;
    *owner = None;
    info!("session cleared");
    StatusCode::NO_CONTENT
}
