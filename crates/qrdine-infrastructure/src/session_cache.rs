use qrdine_core::session::SessionRecord;
use std::sync::{Mutex, PoisonError};

/// Single-entry in-memory cache for the active session record.
///
/// Only one session is active per tab, so there is nothing to evict but the
/// one entry, and that happens purely by TTL, checked on read.
#[derive(Debug)]
pub struct SessionCache {
    entry: Mutex<Option<CacheEntry>>,
    ttl_ms: i64,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    record: SessionRecord,
    cached_at_ms: i64,
}

impl SessionCache {
    pub fn new(ttl_ms: i64) -> Self {
        Self {
            entry: Mutex::new(None),
            ttl_ms,
        }
    }

    pub fn ttl_ms(&self) -> i64 {
        self.ttl_ms
    }

    /// Returns the cached record if it was stored less than the TTL ago.
    pub fn get(&self, now_ms: i64) -> Option<SessionRecord> {
        let entry = self.entry.lock().unwrap_or_else(PoisonError::into_inner);
        entry
            .as_ref()
            .filter(|e| now_ms.saturating_sub(e.cached_at_ms) < self.ttl_ms)
            .map(|e| e.record.clone())
    }

    /// Like [`get`](Self::get), but first advances the cached record's
    /// `lastActivityEpochMs` to `now_ms`. The TTL still counts from `put`.
    pub fn touch(&self, now_ms: i64) -> Option<SessionRecord> {
        let mut entry = self.entry.lock().unwrap_or_else(PoisonError::into_inner);
        let e = entry
            .as_mut()
            .filter(|e| now_ms.saturating_sub(e.cached_at_ms) < self.ttl_ms)?;
        e.record.last_activity_epoch_ms = e.record.last_activity_epoch_ms.max(now_ms);
        Some(e.record.clone())
    }

    pub fn put(&self, record: SessionRecord, now_ms: i64) {
        let mut entry = self.entry.lock().unwrap_or_else(PoisonError::into_inner);
        *entry = Some(CacheEntry {
            record,
            cached_at_ms: now_ms,
        });
    }

    pub fn invalidate(&self) {
        let mut entry = self.entry.lock().unwrap_or_else(PoisonError::into_inner);
        *entry = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> SessionRecord {
        SessionRecord::new("g1", "ts1", "r1", "t1", 1)
    }

    #[test]
    fn test_hit_within_ttl_miss_after() {
        let cache = SessionCache::new(30_000);
        cache.put(record(), 1_000);

        assert!(cache.get(1_000).is_some());
        assert!(cache.get(30_999).is_some());
        assert!(cache.get(31_000).is_none());
    }

    #[test]
    fn test_put_refreshes_timestamp() {
        let cache = SessionCache::new(10);
        cache.put(record(), 0);
        cache.put(record(), 100);
        assert!(cache.get(105).is_some());
    }

    #[test]
    fn test_invalidate() {
        let cache = SessionCache::new(30_000);
        cache.put(record(), 0);
        cache.invalidate();
        assert!(cache.get(0).is_none());
    }

    #[test]
    fn test_zero_ttl_never_hits() {
        let cache = SessionCache::new(0);
        cache.put(record(), 0);
        assert!(cache.get(0).is_none());
    }

    #[test]
    fn test_touch_stamps_activity_without_extending_ttl() {
        let cache = SessionCache::new(30_000);
        cache.put(record(), 1_000);

        assert_eq!(cache.touch(20_000).unwrap().last_activity_epoch_ms, 20_000);
        // Older clock readings never move activity backwards.
        assert_eq!(cache.touch(5_000).unwrap().last_activity_epoch_ms, 20_000);
        assert_eq!(cache.get(29_000).unwrap().last_activity_epoch_ms, 20_000);
        assert!(cache.touch(31_000).is_none());
    }
}
