//! Application layer for QRDine guest sessions.
//!
//! This crate wires the unified session store into the `SessionManager`
//! facade used by UI code, and provides process-level setup (logging and
//! composition from config).

pub mod bootstrap;
pub mod logging;
pub mod session;

pub use bootstrap::SessionContext;
pub use logging::init_tracing;
pub use session::{LegacySessionView, NewSession, SessionManager};
