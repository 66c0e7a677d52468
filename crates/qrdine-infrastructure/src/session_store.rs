//! Unified session store.
//!
//! One storage key, one record, one cache entry. Reads migrate legacy data on
//! first access; writes go through validation, persistence and the cache in
//! that order. No method returns an error: storage and data problems are
//! logged and the caller sees "no session" or a `false` write result.

use crate::migration::{LegacyKeyReader, MigrationSource};
use crate::session_cache::SessionCache;
use crate::storage::StorageAdapter;
use qrdine_core::clock::Clock;
use qrdine_core::config::SessionConfig;
use qrdine_core::keys::UNIFIED_SESSION_KEY;
use qrdine_core::session::{ExpiryInfo, SessionPatch, SessionRecord, StorageScope};
use std::sync::Arc;

pub struct UnifiedSessionStore {
    adapter: Arc<StorageAdapter>,
    clock: Arc<dyn Clock>,
    legacy: LegacyKeyReader,
    cache: SessionCache,
    session_duration_ms: i64,
    expiry_warning_minutes: i64,
}

impl std::fmt::Debug for UnifiedSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnifiedSessionStore")
            .field("adapter", &self.adapter)
            .field("clock", &"<dyn Clock>")
            .field("cache", &self.cache)
            .field("session_duration_ms", &self.session_duration_ms)
            .field("expiry_warning_minutes", &self.expiry_warning_minutes)
            .finish()
    }
}

impl UnifiedSessionStore {
    pub fn new(adapter: Arc<StorageAdapter>, clock: Arc<dyn Clock>, config: &SessionConfig) -> Self {
        Self {
            legacy: LegacyKeyReader::new(adapter.clone()),
            adapter,
            clock,
            cache: SessionCache::new(config.cache_ttl_ms()),
            session_duration_ms: config.session_duration_ms(),
            expiry_warning_minutes: config.expiry_warning_minutes,
        }
    }

    pub fn adapter(&self) -> &Arc<StorageAdapter> {
        &self.adapter
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    pub fn expiry_warning_minutes(&self) -> i64 {
        self.expiry_warning_minutes
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Returns the current session, migrating legacy keys if needed.
    ///
    /// Every read counts as activity: `lastActivityEpochMs` is advanced to
    /// now. Cache hits stamp the cached copy only; the stamp is persisted on
    /// the next storage read, at most once per TTL.
    pub fn get_session(&self) -> Option<SessionRecord> {
        let now = self.clock.now_ms();
        if let Some(record) = self.cache.touch(now) {
            tracing::debug!("Session cache hit");
            return Some(record);
        }
        tracing::debug!("Session cache miss");

        let source = self.probe();
        let kind = source.kind();
        let is_legacy = source.is_legacy();
        let mut record = self.legacy.reconstruct(source, now)?;
        let stamped = now > record.last_activity_epoch_ms;
        record.last_activity_epoch_ms = record.last_activity_epoch_ms.max(now);

        if !record.is_valid() {
            // Handed back so callers aren't blocked, but never persisted or cached.
            tracing::debug!(
                source = kind,
                missing = ?record.missing_fields(),
                "Migrated session is incomplete; not persisting"
            );
            return Some(record);
        }

        let persisted = (is_legacy || stamped)
            && self
                .adapter
                .set_json(StorageScope::Session, UNIFIED_SESSION_KEY, &record);
        if persisted && is_legacy {
            self.legacy.purge();
            tracing::info!(
                source = kind,
                guest_session = %record.guest_session_identifier,
                "Migrated legacy session to unified key"
            );
        }
        self.cache.put(record.clone(), now);
        Some(record)
    }

    /// Resolves where the session lives right now.
    ///
    /// A present-but-broken unified key resolves to `Absent` without consulting
    /// legacy keys: once the unified key exists, legacy data is stale.
    pub fn probe(&self) -> MigrationSource {
        let Some(raw) = self.adapter.get(StorageScope::Session, UNIFIED_SESSION_KEY) else {
            return self.legacy.probe();
        };

        match serde_json::from_str::<SessionRecord>(&raw) {
            Ok(record) => match record.validate() {
                Ok(()) => MigrationSource::Unified(record),
                Err(e) => {
                    tracing::warn!(error = %e, "Stored session failed validation; treating as absent");
                    MigrationSource::Absent
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "Stored session is not valid JSON; treating as absent");
                MigrationSource::Absent
            }
        }
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Validates, stamps activity, persists and caches `record`.
    ///
    /// Returns `false` if the record was rejected or could not be persisted.
    /// A rejected record leaves the previous state untouched; a record that
    /// failed only to persist is still cached.
    pub fn set_session(&self, mut record: SessionRecord) -> bool {
        if let Err(e) = record.validate() {
            tracing::warn!(error = %e, "Rejected invalid session record");
            return false;
        }

        let now = self.clock.now_ms();
        let previous_activity = self
            .get_session()
            .filter(|prev| prev.guest_session_identifier == record.guest_session_identifier)
            .map(|prev| prev.last_activity_epoch_ms)
            .unwrap_or(i64::MIN);
        record.last_activity_epoch_ms = now
            .max(record.last_activity_epoch_ms)
            .max(previous_activity);

        let persisted = self
            .adapter
            .set_json(StorageScope::Session, UNIFIED_SESSION_KEY, &record);
        if !persisted {
            tracing::warn!(
                guest_session = %record.guest_session_identifier,
                "Session not persisted; keeping it in memory only"
            );
        }
        self.cache.put(record, now);
        persisted
    }

    /// Merges `patch` into the current record and saves it.
    pub fn update_session(&self, patch: SessionPatch) -> bool {
        let Some(mut record) = self.get_session() else {
            tracing::warn!("update_session called with no active session");
            return false;
        };
        record.apply(patch);
        self.set_session(record)
    }

    /// Activity tick: refreshes `lastActivityEpochMs`.
    pub fn touch(&self) -> bool {
        match self.get_session() {
            Some(record) => self.set_session(record),
            None => false,
        }
    }

    /// Removes the persisted record, the legacy keys it could be rebuilt
    /// from, and drops the cache. Idempotent.
    pub fn clear_session(&self) {
        self.adapter.remove(StorageScope::Session, UNIFIED_SESSION_KEY);
        self.legacy.purge();
        self.cache.invalidate();
        tracing::info!("Session cleared");
    }

    pub fn invalidate_cache(&self) {
        self.cache.invalidate();
    }

    // ========================================================================
    // Expiry queries
    // ========================================================================

    fn expiry_with_threshold(&self, threshold_minutes: i64) -> ExpiryInfo {
        match self.get_session() {
            Some(record) => ExpiryInfo::compute(
                &record,
                self.clock.now_ms(),
                self.session_duration_ms,
                threshold_minutes,
            ),
            None => ExpiryInfo::no_session(),
        }
    }

    pub fn get_expiry_info(&self) -> ExpiryInfo {
        self.expiry_with_threshold(self.expiry_warning_minutes)
    }

    pub fn get_time_until_expiry_ms(&self) -> Option<i64> {
        self.get_expiry_info().time_remaining_ms
    }

    pub fn get_minutes_until_expiry(&self) -> Option<i64> {
        self.get_expiry_info().minutes_remaining
    }

    pub fn is_expiring_soon(&self, threshold_minutes: i64) -> bool {
        self.expiry_with_threshold(threshold_minutes).is_expiring_soon
    }

    pub fn is_expired(&self) -> bool {
        self.get_expiry_info().is_expired
    }
}
