//! Session, user, and change-event types shared by the provider and the store.
//!
//! DESIGN
//! ======
//! A `Session` is a snapshot. Providers emit a fresh value on every change
//! and consumers replace what they hold; nothing mutates a session in place.
//! The user is always derived from the session it arrived with.

use serde::{Deserialize, Serialize};

/// Authenticated principal attached to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Provider-assigned user identifier.
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Free-form profile fields (display name, avatar, ...).
    #[serde(default = "empty_metadata")]
    pub metadata: serde_json::Value,
}

impl User {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), email: None, metadata: empty_metadata() }
    }
}

fn empty_metadata() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// A time-bounded login issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Expiry as unix seconds, when the provider reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub user: Option<User>,
}

impl Session {
    #[must_use]
    pub fn new(access_token: impl Into<String>, user: Option<User>) -> Self {
        Self { access_token: access_token.into(), refresh_token: None, expires_at: None, user }
    }

    /// Token to forward to the realtime subsystem. `None` when empty.
    #[must_use]
    pub fn realtime_token(&self) -> Option<&str> {
        Some(self.access_token.as_str()).filter(|t| !t.is_empty())
    }

    /// ID of the attached user, if any.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.id.as_str())
    }
}

/// Derive the current user from an optional session.
#[must_use]
pub fn user_of(session: Option<&Session>) -> Option<User> {
    session.and_then(|s| s.user.clone())
}

/// Why the provider emitted a change. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEventKind {
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
}

/// A session-changed notification pushed by an identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthEvent {
    pub kind: AuthEventKind,
    pub session: Option<Session>,
}

impl AuthEvent {
    #[must_use]
    pub fn new(kind: AuthEventKind, session: Option<Session>) -> Self {
        Self { kind, session }
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
