//! Migration from legacy storage layouts.
//!
//! A read that misses the unified key resolves to exactly one
//! [`MigrationSource`], evaluated once, in this precedence:
//!
//! ```text
//! unified key ──parse+validate──► Unified
//!      │ (absent)
//!      V
//! dining_session blob (session, durable) ──► LegacyFull
//!      │ (absent / unparseable)
//!      V
//! bare session_id ──► LegacyPartial
//!      │ (absent)
//!      V
//!   Absent
//! ```

mod legacy;

pub use legacy::LegacyKeyReader;

use crate::dto::LegacyDiningSession;
use qrdine_core::session::SessionRecord;

/// Where the current session record can be read from.
#[derive(Debug, Clone, PartialEq)]
pub enum MigrationSource {
    /// The unified key holds a valid record.
    Unified(SessionRecord),
    /// The legacy combined blob.
    LegacyFull(LegacyDiningSession),
    /// Only a bare guest session id; restaurant and table are unknown.
    LegacyPartial { session_id: String },
    Absent,
}

impl MigrationSource {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unified(_) => "unified",
            Self::LegacyFull(_) => "legacy-full",
            Self::LegacyPartial { .. } => "legacy-partial",
            Self::Absent => "absent",
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::LegacyFull(_) | Self::LegacyPartial { .. })
    }
}
