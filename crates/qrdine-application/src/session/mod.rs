//! Guest-facing session facade and its result types.

pub mod diagnostics;
pub mod legacy_view;
pub mod manager;

pub use diagnostics::{ContextValidation, HealthReport, RecoveryOutcome, RecoverySource};
pub use legacy_view::{LegacySessionView, NewSession};
pub use manager::SessionManager;
