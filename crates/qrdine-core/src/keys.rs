//! Storage key layout.
//!
//! The unified key is the only one written by the session store. The legacy
//! keys are read during migration and recovery, and removed by full cleanup.

/// Single key holding the canonical [`crate::session::SessionRecord`].
pub const UNIFIED_SESSION_KEY: &str = "qrdine_session";

/// Legacy combined dining-session blob.
pub const LEGACY_DINING_SESSION_KEY: &str = "dining_session";

/// Legacy bare guest session id. Also the primary id key used by recovery.
pub const LEGACY_SESSION_ID_KEY: &str = "session_id";

/// Legacy bare table-session id.
pub const LEGACY_TABLE_SESSION_ID_KEY: &str = "table_session_id";

/// Prefixes of legacy per-table guest session id keys (`<prefix><tableId>`).
pub const LEGACY_TABLE_KEY_PREFIXES: [&str; 2] = ["session_id_", "guest_session_"];

/// In-progress cart for the current session.
pub const CURRENT_ORDER_KEY: &str = "current_order";

/// Order history kept in durable storage.
pub const ORDER_HISTORY_KEY: &str = "order_history";

/// Builds the per-table legacy key for `table_id` using `prefix`.
pub fn table_key(prefix: &str, table_id: &str) -> String {
    format!("{}{}", prefix, table_id)
}

/// Returns the table id encoded in a legacy per-table key, if `key` is one.
pub fn parse_table_key(key: &str) -> Option<(&'static str, &str)> {
    LEGACY_TABLE_KEY_PREFIXES.iter().find_map(|prefix| {
        key.strip_prefix(prefix)
            .filter(|table_id| !table_id.is_empty())
            .map(|table_id| (*prefix, table_id))
    })
}
