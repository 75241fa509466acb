//! webhookmail: session glue for the inbox front end.
//!
//! ARCHITECTURE
//! ============
//! Two independent pieces share this crate:
//! - [`identity`] tags every request with an anonymous per-browser id.
//! - [`services::session_sync`] mirrors identity-provider sessions into
//!   observable state and keeps the realtime subsystem authorized.

pub mod config;
pub mod error;
pub mod identity;
pub mod routes;
pub mod services;
pub mod state;
