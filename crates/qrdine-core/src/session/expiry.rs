//! Expiry arithmetic.
//!
//! Everything here is a pure function of a record and "now". Nothing runs on a
//! timer; callers ask and the answer is computed on the spot.

use super::model::SessionRecord;
use serde::{Deserialize, Serialize};

const MS_PER_MINUTE: i64 = 60_000;

/// Where the expiry timestamp came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpirySource {
    /// `expiresAtEpochMs` issued by the backend.
    Server,
    /// `createdAtEpochMs + session duration`; subject to clock drift.
    LocalFallback,
    NoSession,
}

/// Snapshot of a session's expiry state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiryInfo {
    pub expires_at_ms: Option<i64>,
    pub time_remaining_ms: Option<i64>,
    pub minutes_remaining: Option<i64>,
    pub is_expired: bool,
    pub is_expiring_soon: bool,
    pub source: ExpirySource,
}

impl ExpiryInfo {
    /// Result reported when there is no session at all.
    pub fn no_session() -> Self {
        Self {
            expires_at_ms: None,
            time_remaining_ms: None,
            minutes_remaining: None,
            is_expired: true,
            is_expiring_soon: false,
            source: ExpirySource::NoSession,
        }
    }

    pub fn compute(
        record: &SessionRecord,
        now_ms: i64,
        fallback_duration_ms: i64,
        warning_threshold_minutes: i64,
    ) -> Self {
        let (expires_at, source) = resolve_expires_at(record, fallback_duration_ms);
        let remaining = expires_at.saturating_sub(now_ms).max(0);
        let minutes = remaining / MS_PER_MINUTE;
        let is_expired = remaining == 0;

        Self {
            expires_at_ms: Some(expires_at),
            time_remaining_ms: Some(remaining),
            minutes_remaining: Some(minutes),
            is_expired,
            is_expiring_soon: !is_expired && minutes <= warning_threshold_minutes,
            source,
        }
    }
}

/// Returns the effective expiry of `record`.
///
/// Backend-supplied `expiresAtEpochMs` wins. Otherwise the expiry is derived
/// from `createdAtEpochMs`, which is logged since the local clock may disagree
/// with the server's.
pub fn resolve_expires_at(record: &SessionRecord, fallback_duration_ms: i64) -> (i64, ExpirySource) {
    match record.expires_at_epoch_ms {
        Some(expires_at) => (expires_at, ExpirySource::Server),
        None => {
            tracing::warn!(
                guest_session = %record.guest_session_identifier,
                "No server expiresAt on session; deriving expiry from createdAt (subject to clock drift)"
            );
            (
                record.created_at_epoch_ms.saturating_add(fallback_duration_ms),
                ExpirySource::LocalFallback,
            )
        }
    }
}
