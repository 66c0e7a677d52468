use super::diagnostics::{ContextValidation, HealthReport, RecoveryOutcome, RecoverySource};
use super::legacy_view::{LegacySessionView, NewSession};
use chrono::DateTime;
use qrdine_core::error::{Result, SessionError};
use qrdine_core::keys::{
    CURRENT_ORDER_KEY, LEGACY_SESSION_ID_KEY, LEGACY_TABLE_KEY_PREFIXES, ORDER_HISTORY_KEY,
    parse_table_key, table_key,
};
use qrdine_core::session::{
    ExpiryInfo, ExpirySource, SessionPatch, SessionRecord, StorageScope, TableSessionApi,
};
use qrdine_infrastructure::{StorageAdapter, UnifiedSessionStore};
use std::sync::Arc;

/// Public session API consumed by UI code.
///
/// `SessionManager` is responsible for:
/// - Exposing the session under its legacy field names
/// - Building session-scoped URLs
/// - Extending the table session with the backend
/// - Guarding against cross-table contamination
/// - Health checks and id recovery for diagnostics
///
/// Build one at startup and share it; it holds no global state.
#[derive(Debug, Clone)]
pub struct SessionManager {
    store: Arc<UnifiedSessionStore>,
}

impl SessionManager {
    pub fn new(store: Arc<UnifiedSessionStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<UnifiedSessionStore> {
        &self.store
    }

    fn adapter(&self) -> &StorageAdapter {
        self.store.adapter()
    }

    // ========================================================================
    // Record access
    // ========================================================================

    pub fn get_session(&self) -> Option<LegacySessionView> {
        self.store
            .get_session()
            .map(|record| LegacySessionView::from_record(&record))
    }

    pub fn get_record(&self) -> Option<SessionRecord> {
        self.store.get_session()
    }

    /// Starts a session from backend-issued identifiers, replacing any
    /// existing one.
    pub fn create_session(&self, new_session: NewSession) -> bool {
        let record = new_session.into_record(self.store.now_ms());

        if let Some(previous) = self.store.get_session() {
            if previous.table_identifier != record.table_identifier
                || previous.restaurant_identifier != record.restaurant_identifier
            {
                tracing::info!(
                    previous_table = %previous.table_identifier,
                    table = %record.table_identifier,
                    "New session supersedes session for another table"
                );
            }
        }

        self.store.set_session(record)
    }

    pub fn set_session(&self, view: LegacySessionView) -> bool {
        self.store.set_session(view.into_record())
    }

    pub fn update_session(&self, patch: SessionPatch) -> bool {
        self.store.update_session(patch)
    }

    pub fn record_activity(&self) -> bool {
        self.store.touch()
    }

    pub fn clear_session(&self) {
        self.store.clear_session();
    }

    /// Removes the session together with the current order, the order
    /// history, and the per-table ids for its table.
    pub fn clear_all_session_data(&self) {
        let table_id = self.store.get_session().map(|r| r.table_identifier);

        self.store.clear_session();

        let adapter = self.adapter();
        adapter.remove(StorageScope::Session, CURRENT_ORDER_KEY);
        adapter.remove(StorageScope::Durable, ORDER_HISTORY_KEY);
        if let Some(table_id) = table_id.as_deref().filter(|t| !t.is_empty()) {
            for scope in StorageScope::all() {
                for prefix in LEGACY_TABLE_KEY_PREFIXES {
                    adapter.remove(scope, &table_key(prefix, table_id));
                }
            }
        }

        tracing::info!("Cleared all local session data");
    }

    pub fn get_session_id(&self) -> Option<String> {
        self.get_record().map(|r| r.guest_session_identifier)
    }

    pub fn get_table_session_id(&self) -> Option<String> {
        self.get_record()
            .map(|r| r.table_session_identifier)
            .filter(|id| !id.is_empty())
    }

    pub fn get_restaurant_id(&self) -> Option<String> {
        self.get_record()
            .map(|r| r.restaurant_identifier)
            .filter(|id| !id.is_empty())
    }

    pub fn get_table_id(&self) -> Option<String> {
        self.get_record()
            .map(|r| r.table_identifier)
            .filter(|id| !id.is_empty())
    }

    pub fn is_host(&self) -> bool {
        self.get_record().is_some_and(|r| r.is_host())
    }

    // ========================================================================
    // URLs
    // ========================================================================

    fn session_url(&self, path: &str) -> String {
        match self.get_record() {
            Some(record)
                if !record.restaurant_identifier.is_empty()
                    && !record.table_identifier.is_empty() =>
            {
                let query = url::form_urlencoded::Serializer::new(String::new())
                    .append_pair("restaurant", &record.restaurant_identifier)
                    .append_pair("table", &record.table_identifier)
                    .finish();
                format!("{}?{}", path, query)
            }
            _ => path.to_string(),
        }
    }

    pub fn get_menu_url(&self) -> String {
        self.session_url("/menu")
    }

    pub fn get_orders_url(&self) -> String {
        self.session_url("/orders")
    }

    pub fn get_home_url(&self) -> String {
        self.session_url("/")
    }

    // ========================================================================
    // Expiry
    // ========================================================================

    pub fn get_expiry_info(&self) -> ExpiryInfo {
        self.store.get_expiry_info()
    }

    pub fn get_minutes_until_expiry(&self) -> Option<i64> {
        self.store.get_minutes_until_expiry()
    }

    pub fn is_expired(&self) -> bool {
        self.store.is_expired()
    }

    pub fn is_expiring_soon(&self, threshold_minutes: i64) -> bool {
        self.store.is_expiring_soon(threshold_minutes)
    }

    /// Asks the backend to extend the table session.
    ///
    /// On success the backend's expiry replaces the local one and the new
    /// expiry is returned. If the backend says the session is gone, all local
    /// session data is wiped and `SessionTerminated` is returned; the caller
    /// decides what to show. Any other failure leaves local state alone.
    ///
    /// An expired session is never renewed; the backend is not called and
    /// `SessionExpired` is returned.
    pub async fn extend_session(&self, api: &dyn TableSessionApi) -> Result<i64> {
        let record = self.store.get_session().ok_or(SessionError::NoActiveSession)?;
        let table_session_id = record.table_session_identifier.trim().to_string();
        if table_session_id.is_empty() {
            tracing::warn!("Cannot extend session without a table session id");
            return Err(SessionError::NoActiveSession);
        }
        if self.store.is_expired() {
            tracing::warn!(table_session = %table_session_id, "Refusing to extend an expired session");
            return Err(SessionError::SessionExpired);
        }

        match api.extend_table_session(&table_session_id).await {
            Ok(response) => {
                let expires_at = DateTime::parse_from_rfc3339(&response.expires_at)
                    .map(|dt| dt.timestamp_millis())
                    .map_err(|e| {
                        SessionError::backend(format!(
                            "Invalid expiresAt '{}': {}",
                            response.expires_at, e
                        ))
                    })?;

                let still_current = self
                    .store
                    .get_session()
                    .is_some_and(|r| r.table_session_identifier == table_session_id);
                if still_current {
                    if !self.store.update_session(SessionPatch::expires_at(expires_at)) {
                        return Err(SessionError::unavailable(
                            "Extended expiry could not be saved",
                        ));
                    }
                    tracing::info!(table_session = %table_session_id, expires_at, "Session extended");
                } else {
                    tracing::warn!(
                        table_session = %table_session_id,
                        "Session changed while extending; not applying new expiry"
                    );
                }
                Ok(expires_at)
            }
            Err(e) if e.is_session_terminated() => {
                let code = e
                    .code
                    .as_ref()
                    .map(|c| c.as_str().to_string())
                    .unwrap_or_default();
                tracing::warn!(table_session = %table_session_id, %code, "Backend ended table session; clearing local data");
                self.clear_all_session_data();
                Err(SessionError::SessionTerminated { code })
            }
            Err(e) => {
                tracing::warn!(table_session = %table_session_id, error = %e, "Session extension failed");
                Err(SessionError::backend(e.to_string()))
            }
        }
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    /// Checks the stored session belongs to `expected_table_session_id`.
    pub fn validate_table_session_context(&self, expected_table_session_id: &str) -> ContextValidation {
        let Some(record) = self.store.get_session() else {
            return ContextValidation::invalid(
                "No active session",
                "Scan the QR code on your table to start a session",
            );
        };

        if expected_table_session_id.trim().is_empty()
            || record.table_session_identifier.trim().is_empty()
        {
            return ContextValidation::invalid(
                "Missing table session id",
                "Rescan the QR code on your table",
            );
        }

        if record.table_session_identifier != expected_table_session_id {
            tracing::warn!(
                expected = expected_table_session_id,
                stored = %record.table_session_identifier,
                "Table session mismatch"
            );
            return ContextValidation::invalid(
                format!(
                    "Table session mismatch: expected '{}', found '{}'",
                    expected_table_session_id, record.table_session_identifier
                ),
                "Rescan the QR code on your table",
            );
        }

        let info = self.store.get_expiry_info();
        if info.is_expired {
            return ContextValidation::invalid(
                "Session expired",
                "Scan the QR code again to start a new session",
            );
        }
        if info.is_expiring_soon {
            return ContextValidation::valid_with_warning(format!(
                "Session expires in {} minutes",
                info.minutes_remaining.unwrap_or(0)
            ));
        }
        ContextValidation::valid()
    }

    pub fn health_check(&self) -> HealthReport {
        let mut issues = Vec::new();
        let mut warnings = Vec::new();

        match self.store.get_session() {
            None => issues.push("No active session".to_string()),
            Some(record) => {
                for field in record.missing_fields() {
                    issues.push(format!("Missing required field: {}", field));
                }
                if record.table_session_identifier.trim().is_empty() {
                    issues.push("Missing required field: tableSessionIdentifier".to_string());
                }
                if record.is_partial() {
                    warnings.push("Session was rebuilt from incomplete legacy data".to_string());
                }

                let info = self.store.get_expiry_info();
                if info.is_expired {
                    issues.push("Session expired".to_string());
                } else if info.is_expiring_soon {
                    warnings.push(format!(
                        "Session expires in {} minutes",
                        info.minutes_remaining.unwrap_or(0)
                    ));
                }
                if info.source == ExpirySource::LocalFallback {
                    warnings.push(
                        "Expiry derived from local clock; no server expiresAt".to_string(),
                    );
                }
            }
        }

        HealthReport {
            healthy: issues.is_empty(),
            issues,
            warnings,
        }
    }

    /// Finds a guest session id wherever one survived and restores it to the
    /// primary `session_id` key.
    pub fn recover_session(&self) -> RecoveryOutcome {
        let adapter = self.adapter();

        if let Some(id) = adapter.get_id(StorageScope::Session, LEGACY_SESSION_ID_KEY) {
            return RecoveryOutcome {
                session_id: Some(id),
                source: RecoverySource::PrimaryKey,
            };
        }

        if let Some(record) = self
            .store
            .get_session()
            .filter(|r| !r.guest_session_identifier.trim().is_empty())
        {
            return self.restore_primary(record.guest_session_identifier, RecoverySource::UnifiedRecord);
        }

        for scope in StorageScope::all() {
            for key in adapter.keys(scope) {
                if parse_table_key(&key).is_none() {
                    continue;
                }
                if let Some(id) = adapter.get_id(scope, &key) {
                    return self.restore_primary(id, RecoverySource::TableFallback { key });
                }
            }
        }

        tracing::warn!("Session recovery found no guest session id");
        RecoveryOutcome::not_found()
    }

    fn restore_primary(&self, session_id: String, source: RecoverySource) -> RecoveryOutcome {
        self.adapter()
            .set(StorageScope::Session, LEGACY_SESSION_ID_KEY, &session_id);
        tracing::info!(source = ?source, "Recovered guest session id");
        RecoveryOutcome {
            session_id: Some(session_id),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use qrdine_core::clock::ManualClock;
    use qrdine_core::config::SessionConfig;
    use qrdine_core::keys::UNIFIED_SESSION_KEY;
    use qrdine_core::session::{ApiError, ApiErrorCode, ExtendSessionResponse};
    use std::sync::Mutex;

    const T: i64 = 1_700_000_000_000;
    const MINUTE: i64 = 60_000;

    struct MockApi {
        result: std::result::Result<ExtendSessionResponse, ApiError>,
        calls: Mutex<Vec<String>>,
    }

    impl MockApi {
        fn ok(expires_at: &str) -> Self {
            Self {
                result: Ok(ExtendSessionResponse {
                    expires_at: expires_at.to_string(),
                }),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn err(err: ApiError) -> Self {
            Self {
                result: Err(err),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TableSessionApi for MockApi {
        async fn extend_table_session(
            &self,
            table_session_id: &str,
        ) -> std::result::Result<ExtendSessionResponse, ApiError> {
            self.calls.lock().unwrap().push(table_session_id.to_string());
            self.result.clone()
        }
    }

    fn manager() -> (Arc<StorageAdapter>, Arc<ManualClock>, SessionManager) {
        let adapter = Arc::new(StorageAdapter::in_memory());
        let clock = Arc::new(ManualClock::new(T));
        let store = Arc::new(UnifiedSessionStore::new(
            adapter.clone(),
            clock.clone(),
            &SessionConfig::default(),
        ));
        (adapter, clock, SessionManager::new(store))
    }

    fn new_session() -> NewSession {
        NewSession {
            guest_session_id: "g1".into(),
            table_session_id: "ts1".into(),
            restaurant_id: "r1".into(),
            table_id: "t1".into(),
            table_name: Some("Patio 2".into()),
            ..NewSession::default()
        }
    }

    #[test]
    fn test_urls_without_session_are_bare() {
        let (_, _, manager) = manager();
        assert_eq!(manager.get_menu_url(), "/menu");
        assert_eq!(manager.get_orders_url(), "/orders");
        assert_eq!(manager.get_home_url(), "/");
    }

    #[test]
    fn test_urls_carry_restaurant_and_table() {
        let (_, _, manager) = manager();
        assert!(manager.create_session(NewSession {
            restaurant_id: "r 1&x".into(),
            ..new_session()
        }));

        assert_eq!(manager.get_menu_url(), "/menu?restaurant=r+1%26x&table=t1");
        assert_eq!(manager.get_home_url(), "/?restaurant=r+1%26x&table=t1");
    }

    #[test]
    fn test_get_session_uses_legacy_names() {
        let (_, _, manager) = manager();
        assert!(manager.create_session(new_session()));

        let view = manager.get_session().unwrap();
        assert_eq!(view.session_id, "g1");
        assert_eq!(view.table_name.as_deref(), Some("Patio 2"));
        assert_eq!(view.created_at, T);
        assert_eq!(manager.get_table_session_id().as_deref(), Some("ts1"));
    }

    #[test]
    fn test_set_session_from_view_round_trips() {
        let (_, clock, manager) = manager();
        assert!(manager.create_session(new_session()));
        let mut view = manager.get_session().unwrap();
        view.guest_name = Some("Lee".into());
        clock.advance_minutes(1);

        assert!(manager.set_session(view));
        let stored = manager.get_record().unwrap();
        assert_eq!(stored.guest_name(), Some("Lee"));
        assert_eq!(stored.last_activity_epoch_ms, T + MINUTE);
    }

    #[test]
    fn test_cross_table_guard() {
        let (_, _, manager) = manager();
        assert!(manager.create_session(new_session()));

        let result = manager.validate_table_session_context("ts2");
        assert!(!result.is_valid);
        assert!(result.error.unwrap().contains("mismatch"));
        assert!(result.suggestion.is_some());

        assert!(manager.validate_table_session_context("ts1").is_valid);
    }

    #[test]
    fn test_context_without_session_is_invalid() {
        let (_, _, manager) = manager();
        let result = manager.validate_table_session_context("ts1");
        assert!(!result.is_valid);
        assert_eq!(result.error.as_deref(), Some("No active session"));
    }

    #[test]
    fn test_context_expiring_soon_is_valid_with_warning() {
        let (_, clock, manager) = manager();
        assert!(manager.create_session(NewSession {
            expires_at: Some(T + 20 * MINUTE),
            ..new_session()
        }));

        clock.advance_minutes(10);
        let result = manager.validate_table_session_context("ts1");
        assert!(result.is_valid);
        assert_eq!(result.warning.as_deref(), Some("Session expires in 10 minutes"));

        clock.advance_minutes(11);
        let result = manager.validate_table_session_context("ts1");
        assert!(!result.is_valid);
        assert_eq!(result.error.as_deref(), Some("Session expired"));
    }

    #[test]
    fn test_health_check() {
        let (_, clock, manager) = manager();
        let report = manager.health_check();
        assert!(!report.healthy);
        assert_eq!(report.issues, vec!["No active session".to_string()]);

        assert!(manager.create_session(NewSession {
            table_session_id: String::new(),
            ..new_session()
        }));
        let report = manager.health_check();
        assert!(!report.healthy);
        assert!(report.issues.iter().any(|i| i.contains("tableSessionIdentifier")));
        assert!(report.warnings.iter().any(|w| w.contains("local clock")));

        assert!(manager.create_session(NewSession {
            expires_at: Some(T + 5 * MINUTE),
            ..new_session()
        }));
        let report = manager.health_check();
        assert!(report.healthy);
        assert_eq!(report.warnings, vec!["Session expires in 5 minutes".to_string()]);

        clock.advance_minutes(6);
        let report = manager.health_check();
        assert_eq!(report.issues, vec!["Session expired".to_string()]);
    }

    #[test]
    fn test_clear_all_session_data() {
        let (adapter, _, manager) = manager();
        assert!(manager.create_session(new_session()));
        adapter.set(StorageScope::Session, CURRENT_ORDER_KEY, "[]");
        adapter.set(StorageScope::Durable, ORDER_HISTORY_KEY, "[]");
        adapter.set(StorageScope::Session, LEGACY_SESSION_ID_KEY, "g1");
        adapter.set(StorageScope::Durable, "session_id_t1", "g1");
        adapter.set(StorageScope::Durable, "session_id_t9", "g9");

        manager.clear_all_session_data();

        assert!(manager.get_session().is_none());
        assert!(adapter.get(StorageScope::Session, CURRENT_ORDER_KEY).is_none());
        assert!(adapter.get(StorageScope::Durable, ORDER_HISTORY_KEY).is_none());
        assert!(adapter.get(StorageScope::Session, LEGACY_SESSION_ID_KEY).is_none());
        assert!(adapter.get(StorageScope::Durable, "session_id_t1").is_none());
        // Other tables' keys are left alone.
        assert!(adapter.get(StorageScope::Durable, "session_id_t9").is_some());
    }

    #[test]
    fn test_recover_from_primary_key() {
        let (adapter, _, manager) = manager();
        adapter.set(StorageScope::Session, LEGACY_SESSION_ID_KEY, "g-primary");

        let outcome = manager.recover_session();
        assert_eq!(outcome.session_id.as_deref(), Some("g-primary"));
        assert_eq!(outcome.source, RecoverySource::PrimaryKey);
    }

    #[test]
    fn test_recover_from_unified_record_restores_primary_key() {
        let (adapter, _, manager) = manager();
        assert!(manager.create_session(new_session()));

        let outcome = manager.recover_session();
        assert_eq!(outcome.source, RecoverySource::UnifiedRecord);
        assert_eq!(
            adapter.get(StorageScope::Session, LEGACY_SESSION_ID_KEY).as_deref(),
            Some("g1")
        );
    }

    #[test]
    fn test_recover_from_table_fallback() {
        let (adapter, _, manager) = manager();
        adapter.set(StorageScope::Durable, "unrelated", "x");
        adapter.set(StorageScope::Durable, "guest_session_t4", "\"g-table\"");

        let outcome = manager.recover_session();
        assert_eq!(outcome.session_id.as_deref(), Some("g-table"));
        assert_eq!(
            outcome.source,
            RecoverySource::TableFallback {
                key: "guest_session_t4".to_string()
            }
        );
        assert_eq!(
            adapter.get_id(StorageScope::Session, LEGACY_SESSION_ID_KEY).as_deref(),
            Some("g-table")
        );
    }

    #[test]
    fn test_recover_nothing() {
        let (_, _, manager) = manager();
        let outcome = manager.recover_session();
        assert!(!outcome.recovered());
        assert_eq!(outcome.source, RecoverySource::NotFound);
    }

    #[tokio::test]
    async fn test_extend_success_overwrites_expiry() {
        let (_, clock, manager) = manager();
        assert!(manager.create_session(new_session()));
        clock.advance_minutes(1);

        let api = MockApi::ok("2023-11-15T01:13:20Z");
        let expires_at = manager.extend_session(&api).await.unwrap();

        assert_eq!(expires_at, T + 3 * 60 * MINUTE);
        assert_eq!(api.calls.lock().unwrap().as_slice(), ["ts1".to_string()]);
        let record = manager.get_record().unwrap();
        assert_eq!(record.expires_at_epoch_ms, Some(expires_at));
        assert_eq!(record.last_activity_epoch_ms, T + MINUTE);
    }

    #[tokio::test]
    async fn test_extend_terminated_clears_everything() {
        let (adapter, _, manager) = manager();
        assert!(manager.create_session(new_session()));
        adapter.set(StorageScope::Session, CURRENT_ORDER_KEY, "[1]");

        let api = MockApi::err(ApiError::with_code(
            ApiErrorCode::SessionClosed,
            "closed",
            Some(409),
        ));
        let err = manager.extend_session(&api).await.unwrap_err();

        assert_eq!(
            err,
            SessionError::SessionTerminated {
                code: "SESSION_CLOSED".to_string()
            }
        );
        assert!(manager.get_session().is_none());
        assert!(adapter.get(StorageScope::Session, UNIFIED_SESSION_KEY).is_none());
        assert!(adapter.get(StorageScope::Session, CURRENT_ORDER_KEY).is_none());
    }

    #[tokio::test]
    async fn test_extend_transient_failure_keeps_state() {
        let (_, _, manager) = manager();
        assert!(manager.create_session(new_session()));
        let before = manager.get_record().unwrap();

        let api = MockApi::err(ApiError::transport("timeout"));
        let err = manager.extend_session(&api).await.unwrap_err();

        assert!(matches!(err, SessionError::Backend { .. }));
        assert_eq!(manager.get_record().unwrap(), before);
    }

    #[tokio::test]
    async fn test_extend_bad_timestamp_is_backend_error() {
        let (_, _, manager) = manager();
        assert!(manager.create_session(new_session()));

        let err = manager
            .extend_session(&MockApi::ok("tomorrow"))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Backend { .. }));
        assert_eq!(manager.get_record().unwrap().expires_at_epoch_ms, None);
    }

    #[tokio::test]
    async fn test_extend_without_session() {
        let (_, _, manager) = manager();
        let api = MockApi::ok("2023-11-15T01:13:20Z");

        let err = manager.extend_session(&api).await.unwrap_err();
        assert_eq!(err, SessionError::NoActiveSession);
        assert!(api.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_context_with_empty_table_session_is_invalid() {
        let (_, _, manager) = manager();
        assert!(manager.create_session(NewSession {
            table_session_id: String::new(),
            ..new_session()
        }));

        let result = manager.validate_table_session_context("");
        assert!(!result.is_valid);
        assert_eq!(result.error.as_deref(), Some("Missing table session id"));

        assert!(manager.create_session(new_session()));
        assert!(!manager.validate_table_session_context("  ").is_valid);
    }

    #[test]
    fn test_clear_after_recovery_stays_cleared() {
        let (adapter, _, manager) = manager();
        assert!(manager.create_session(new_session()));
        assert_eq!(manager.recover_session().source, RecoverySource::UnifiedRecord);
        assert!(adapter.get(StorageScope::Session, LEGACY_SESSION_ID_KEY).is_some());

        manager.clear_session();

        assert!(manager.get_session().is_none());
        assert!(adapter.get(StorageScope::Session, LEGACY_SESSION_ID_KEY).is_none());
    }

    #[tokio::test]
    async fn test_extend_expired_session_is_refused() {
        let (_, clock, manager) = manager();
        assert!(manager.create_session(new_session()));
        clock.advance_minutes(121);
        assert!(manager.is_expired());

        let api = MockApi::ok("2023-11-15T01:13:20Z");
        let err = manager.extend_session(&api).await.unwrap_err();

        assert_eq!(err, SessionError::SessionExpired);
        assert!(api.calls.lock().unwrap().is_empty());
        assert!(manager.is_expired());
        assert_eq!(manager.get_record().unwrap().expires_at_epoch_ms, None);
    }

    #[tokio::test]
    async fn test_extend_reports_unsaved_expiry() {
        let clock = Arc::new(ManualClock::new(T));
        let store = Arc::new(UnifiedSessionStore::new(
            Arc::new(StorageAdapter::unavailable()),
            clock,
            &SessionConfig::default(),
        ));
        let manager = SessionManager::new(store);
        // Not persisted, but kept in memory for the TTL.
        assert!(!manager.create_session(new_session()));

        let err = manager
            .extend_session(&MockApi::ok("2023-11-15T01:13:20Z"))
            .await
            .unwrap_err();
        assert!(err.is_storage());
    }
}
