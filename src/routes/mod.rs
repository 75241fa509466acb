//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every route sits behind the identity middleware, so handlers can take
//! an [`Identity`] extractor. Auth-session routes relay sessions between
//! the browser SDK and the session store, keyed to the identity that
//! handed the session over.

pub mod auth;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware;
use axum::response::Json;
use axum::routing::{get, patch};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::identity::{CookiePolicy, Identity, tag_identity};
use crate::state::AppState;

/// Full application router.
pub fn app(state: AppState) -> Router {
    let policy = CookiePolicy { secure: state.config.cookie_secure };

    Router::new()
        .route("/api/identity", get(identity))
        .route("/api/config", get(public_config))
        .route(
            "/api/auth/session",
            get(auth::current_session)
                .post(auth::sign_in)
                .delete(auth::sign_out),
        )
        .route("/api/auth/session/user", patch(auth::update_user))
        .route("/healthz", get(healthz))
        .layer(middleware::from_fn_with_state(policy, tag_identity))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct IdentityBody {
    userid: Identity,
}

/// `GET /api/identity`: return the anonymous identity for this browser.
async fn identity(identity: Identity) -> Json<IdentityBody> {
    Json(IdentityBody { userid: identity })
}

#[derive(Serialize)]
struct PublicConfig {
    alias_domain: String,
    attachments_bucket: String,
}

/// `GET /api/config`: settings the front end needs.
async fn public_config(State(state): State<AppState>) -> Json<PublicConfig> {
    Json(PublicConfig {
        alias_domain: state.config.alias_domain.clone(),
        attachments_bucket: state.config.attachments_bucket.clone(),
    })
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
