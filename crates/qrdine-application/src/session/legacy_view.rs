//! Backward-compatible session shape.
//!
//! UI code written against the old storage layout expects `sessionId`,
//! `tableName` and friends. The mapping lives here and only here so the
//! canonical record stays untouched.

use qrdine_core::session::{
    META_GUEST_NAME, META_IS_HOST, META_RESTAURANT_NAME, META_TABLE_NAME, SessionRecord,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacySessionView {
    pub session_id: String,
    pub table_session_id: String,
    pub restaurant_id: String,
    pub table_id: String,
    pub restaurant_name: Option<String>,
    pub table_name: Option<String>,
    pub guest_name: Option<String>,
    pub is_host: bool,
    pub created_at: i64,
    pub last_activity: i64,
    pub expires_at: Option<i64>,
    /// Metadata keys without a dedicated legacy field.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

const MAPPED_METADATA: [&str; 4] = [
    META_RESTAURANT_NAME,
    META_TABLE_NAME,
    META_GUEST_NAME,
    META_IS_HOST,
];

impl LegacySessionView {
    pub fn from_record(record: &SessionRecord) -> Self {
        let extra = record
            .metadata
            .iter()
            .filter(|(key, _)| !MAPPED_METADATA.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Self {
            session_id: record.guest_session_identifier.clone(),
            table_session_id: record.table_session_identifier.clone(),
            restaurant_id: record.restaurant_identifier.clone(),
            table_id: record.table_identifier.clone(),
            restaurant_name: record.restaurant_name().map(str::to_string),
            table_name: record.table_name().map(str::to_string),
            guest_name: record.guest_name().map(str::to_string),
            is_host: record.is_host(),
            created_at: record.created_at_epoch_ms,
            last_activity: record.last_activity_epoch_ms,
            expires_at: record.expires_at_epoch_ms,
            extra,
        }
    }

    pub fn into_record(self) -> SessionRecord {
        let mut record = SessionRecord::new(
            self.session_id,
            self.table_session_id,
            self.restaurant_id,
            self.table_id,
            self.created_at,
        );
        record.last_activity_epoch_ms = self.last_activity;
        record.expires_at_epoch_ms = self.expires_at;
        record.metadata = self.extra;

        let names = [
            (META_RESTAURANT_NAME, self.restaurant_name),
            (META_TABLE_NAME, self.table_name),
            (META_GUEST_NAME, self.guest_name),
        ];
        for (key, value) in names {
            if let Some(value) = value {
                record.metadata.insert(key.to_string(), Value::String(value));
            }
        }
        if self.is_host {
            record.metadata.insert(META_IS_HOST.to_string(), Value::Bool(true));
        }
        record
    }
}

/// Identifiers and display fields issued by the backend when a guest scans a
/// table's QR code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewSession {
    pub guest_session_id: String,
    pub table_session_id: String,
    pub restaurant_id: String,
    pub table_id: String,
    pub restaurant_name: Option<String>,
    pub table_name: Option<String>,
    pub guest_name: Option<String>,
    pub is_host: bool,
    pub expires_at: Option<i64>,
}

impl NewSession {
    pub fn into_record(self, now_ms: i64) -> SessionRecord {
        LegacySessionView {
            session_id: self.guest_session_id,
            table_session_id: self.table_session_id,
            restaurant_id: self.restaurant_id,
            table_id: self.table_id,
            restaurant_name: self.restaurant_name,
            table_name: self.table_name,
            guest_name: self.guest_name,
            is_host: self.is_host,
            created_at: now_ms,
            last_activity: now_ms,
            expires_at: self.expires_at,
            extra: BTreeMap::new(),
        }
        .into_record()
    }
}
