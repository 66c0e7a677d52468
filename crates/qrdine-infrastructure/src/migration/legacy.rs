//! Legacy key reader.
//!
//! Rebuilds a unified record from the fragmented keys older builds wrote:
//! the `dining_session` blob, the bare `session_id`, and the bare
//! `table_session_id`.

use super::MigrationSource;
use crate::dto::{LegacyDiningSession, LegacyTimestamp};
use crate::storage::StorageAdapter;
use qrdine_core::keys::{
    LEGACY_DINING_SESSION_KEY, LEGACY_SESSION_ID_KEY, LEGACY_TABLE_SESSION_ID_KEY,
};
use qrdine_core::session::{
    META_GUEST_NAME, META_IS_HOST, META_MIGRATION, META_RESTAURANT_NAME, META_TABLE_NAME,
    SessionRecord, StorageScope,
};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug)]
pub struct LegacyKeyReader {
    adapter: Arc<StorageAdapter>,
    /// Guest session id and the time it was first reconstructed. Records that
    /// fail validation are never persisted, so this keeps their `createdAt`
    /// stable across reads.
    first_seen: Mutex<Option<(String, i64)>>,
}

impl LegacyKeyReader {
    pub fn new(adapter: Arc<StorageAdapter>) -> Self {
        Self {
            adapter,
            first_seen: Mutex::new(None),
        }
    }

    /// Deletes every key `probe` reads, so a migrated or cleared session
    /// cannot be rebuilt from them.
    pub fn purge(&self) {
        for scope in StorageScope::all() {
            self.adapter.remove(scope, LEGACY_DINING_SESSION_KEY);
        }
        self.adapter.remove(StorageScope::Session, LEGACY_SESSION_ID_KEY);
        self.adapter
            .remove(StorageScope::Session, LEGACY_TABLE_SESSION_ID_KEY);
    }

    fn first_seen_at(&self, session_id: &str, now_ms: i64) -> (i64, bool) {
        let mut seen = self.first_seen.lock().unwrap_or_else(PoisonError::into_inner);
        match seen.as_ref() {
            Some((id, at)) if id == session_id => (*at, false),
            _ => {
                *seen = Some((session_id.to_string(), now_ms));
                (now_ms, true)
            }
        }
    }

    /// Looks for legacy data, most complete layout first.
    ///
    /// Never returns [`MigrationSource::Unified`]; that variant belongs to the
    /// unified store's own probe.
    pub fn probe(&self) -> MigrationSource {
        for scope in StorageScope::all() {
            let Some(raw) = self.adapter.get(scope, LEGACY_DINING_SESSION_KEY) else {
                continue;
            };
            match serde_json::from_str::<LegacyDiningSession>(&raw) {
                Ok(blob) => return MigrationSource::LegacyFull(blob),
                Err(e) => tracing::warn!(
                    scope = scope.name(),
                    error = %e,
                    "Ignoring unparseable legacy dining session blob"
                ),
            }
        }

        match self.adapter.get_id(StorageScope::Session, LEGACY_SESSION_ID_KEY) {
            Some(session_id) => MigrationSource::LegacyPartial { session_id },
            None => MigrationSource::Absent,
        }
    }

    /// Turns a probe result into a record.
    ///
    /// Returns `None` for `Absent` and for a blob with no guest session id.
    /// The record may still fail validation (partial migrations always do);
    /// the caller decides whether to persist it.
    pub fn reconstruct(&self, source: MigrationSource, now_ms: i64) -> Option<SessionRecord> {
        match source {
            MigrationSource::Unified(record) => Some(record),
            MigrationSource::LegacyFull(blob) => self.from_blob(blob, now_ms),
            MigrationSource::LegacyPartial { session_id } => {
                let (created_at, first) = self.first_seen_at(&session_id, now_ms);
                if first {
                    tracing::warn!(
                        session_id = %session_id,
                        "Degraded migration: only a bare session id was found; restaurant and table are unknown"
                    );
                }
                Some(
                    SessionRecord::new(session_id, "", "", "", created_at)
                        .with_metadata(META_MIGRATION, "partial"),
                )
            }
            MigrationSource::Absent => None,
        }
    }

    fn from_blob(&self, blob: LegacyDiningSession, now_ms: i64) -> Option<SessionRecord> {
        let guest_session_id = blob.session_id.trim().to_string();
        if guest_session_id.is_empty() {
            tracing::warn!("Legacy dining session blob has no sessionId; skipping migration");
            return None;
        }

        let table_session_id = blob
            .table_session_id
            .filter(|id| !id.trim().is_empty())
            .or_else(|| {
                self.adapter
                    .get_id(StorageScope::Session, LEGACY_TABLE_SESSION_ID_KEY)
            })
            .unwrap_or_default();

        let created_at = blob
            .created_at
            .as_ref()
            .and_then(LegacyTimestamp::to_epoch_ms)
            .unwrap_or_else(|| self.first_seen_at(&guest_session_id, now_ms).0);
        let last_activity = blob
            .last_activity
            .as_ref()
            .and_then(LegacyTimestamp::to_epoch_ms)
            .unwrap_or(created_at)
            .max(created_at);

        let mut record = SessionRecord::new(
            guest_session_id,
            table_session_id,
            blob.restaurant_id.trim(),
            blob.table_id.trim(),
            created_at,
        );
        record.last_activity_epoch_ms = last_activity;
        record.expires_at_epoch_ms = blob.expires_at.as_ref().and_then(LegacyTimestamp::to_epoch_ms);

        let display = [
            (META_RESTAURANT_NAME, blob.restaurant_name),
            (META_TABLE_NAME, blob.table_name),
            (META_GUEST_NAME, blob.guest_name),
        ];
        for (key, value) in display {
            if let Some(value) = value {
                record.metadata.insert(key.to_string(), value.into());
            }
        }
        if let Some(is_host) = blob.is_host {
            record.metadata.insert(META_IS_HOST.to_string(), is_host.into());
        }

        tracing::info!(
            guest_session = %record.guest_session_identifier,
            table = %record.table_identifier,
            "Reconstructed session from legacy dining session blob"
        );
        Some(record)
    }
}
