//! Session services used by HTTP routes and the startup lifecycle.
//!
//! ARCHITECTURE
//! ============
//! The provider and realtime modules define the two external seams as
//! traits; `session_sync` owns the state that bridges them so route
//! handlers only ever read snapshots.

pub mod provider;
pub mod realtime;
pub mod session;
pub mod session_sync;
