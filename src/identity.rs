//! Anonymous per-browser identity: cookie middleware and extractor.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every request carries a stable anonymous identity, independent of login
//! state. `tag_identity` reads it from the `userid` cookie (minting a fresh
//! UUID when absent), exposes it to handlers via request extensions, and
//! issues the cookie on the first visit only.

use std::fmt;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Serialize;
use tracing::{debug, error};
use uuid::Uuid;

pub const IDENTITY_COOKIE: &str = "userid";

/// Opaque anonymous identity for one browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Mint a fresh random identity.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_jar(jar: &CookieJar) -> Option<Self> {
        jar.get(IDENTITY_COOKIE)
            .map(Cookie::value)
            .filter(|value| !value.is_empty())
            .map(|value| Self(value.to_owned()))
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Attributes applied to the identity cookie.
#[derive(Debug, Clone, Copy, Default)]
pub struct CookiePolicy {
    pub secure: bool,
}

// =============================================================================
// MIDDLEWARE
// =============================================================================

/// Resolve the request identity, run the inner service, and set the cookie on first visit.
///
/// The downstream response passes through unchanged apart from the added
/// `Set-Cookie` header.
pub async fn tag_identity(
    State(policy): State<CookiePolicy>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let existing = Identity::from_jar(&jar);
    let first_visit = existing.is_none();
    let identity = existing.unwrap_or_else(Identity::generate);

    request.extensions_mut().insert(identity.clone());
    let response = next.run(request).await;

    if !first_visit {
        return response;
    }

    debug!(userid = %identity, "issuing identity cookie");
    let cookie = Cookie::build((IDENTITY_COOKIE, identity.0))
        .path("/")
        .http_only(true)
        .secure(policy.secure);
    (CookieJar::new().add(cookie), response).into_response()
}

// =============================================================================
// EXTRACTOR
// =============================================================================

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Self>().cloned().ok_or_else(|| {
            error!("identity requested on a route without the identity middleware");
            StatusCode::INTERNAL_SERVER_ERROR
        })
    }
}

#[cfg(test)]
#[path = "identity_test.rs"]
mod tests;
