//! Session domain model.
//!
//! `SessionRecord` is the single source of truth for one active dining
//! session in a tab. It is stored as JSON under the unified key.

use crate::error::{Result, SessionError};
use semver::Version;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Schema version written with every record.
pub const SESSION_RECORD_VERSION: &str = "2.0.0";

/// Well-known metadata keys.
pub const META_RESTAURANT_NAME: &str = "restaurantName";
pub const META_TABLE_NAME: &str = "tableName";
pub const META_GUEST_NAME: &str = "guestName";
pub const META_IS_HOST: &str = "isHost";
/// Set to `"partial"` on records rebuilt from a bare legacy session id.
pub const META_MIGRATION: &str = "migration";

fn current_schema_version() -> Version {
    Version::new(2, 0, 0)
}

/// One guest's participation in a table session.
///
/// A record is valid only when the guest session, restaurant and table
/// identifiers are non-empty and both timestamps are non-zero. The table
/// session identifier may be empty for records migrated from old layouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    #[serde(default = "current_schema_version")]
    pub schema_version: Version,
    pub guest_session_identifier: String,
    #[serde(default)]
    pub table_session_identifier: String,
    pub restaurant_identifier: String,
    pub table_identifier: String,
    /// Set once at creation, never mutated.
    pub created_at_epoch_ms: i64,
    /// Refreshed on every write; never moves backwards.
    pub last_activity_epoch_ms: i64,
    /// Backend-issued expiry. Authoritative when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at_epoch_ms: Option<i64>,
    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,
}

impl SessionRecord {
    /// Creates a record with `last_activity` equal to `created_at_ms`.
    pub fn new(
        guest_session_identifier: impl Into<String>,
        table_session_identifier: impl Into<String>,
        restaurant_identifier: impl Into<String>,
        table_identifier: impl Into<String>,
        created_at_ms: i64,
    ) -> Self {
        Self {
            schema_version: current_schema_version(),
            guest_session_identifier: guest_session_identifier.into(),
            table_session_identifier: table_session_identifier.into(),
            restaurant_identifier: restaurant_identifier.into(),
            table_identifier: table_identifier.into(),
            created_at_epoch_ms: created_at_ms,
            last_activity_epoch_ms: created_at_ms,
            expires_at_epoch_ms: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_expires_at(mut self, expires_at_ms: i64) -> Self {
        self.expires_at_epoch_ms = Some(expires_at_ms);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Names of the required fields that are empty or zero.
    pub fn missing_fields(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if self.guest_session_identifier.trim().is_empty() {
            missing.push("guestSessionIdentifier".to_string());
        }
        if self.restaurant_identifier.trim().is_empty() {
            missing.push("restaurantIdentifier".to_string());
        }
        if self.table_identifier.trim().is_empty() {
            missing.push("tableIdentifier".to_string());
        }
        if self.created_at_epoch_ms == 0 {
            missing.push("createdAtEpochMs".to_string());
        }
        if self.last_activity_epoch_ms == 0 {
            missing.push("lastActivityEpochMs".to_string());
        }
        missing
    }

    pub fn validate(&self) -> Result<()> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(SessionError::InvalidRecord { missing })
        }
    }

    pub fn is_valid(&self) -> bool {
        self.missing_fields().is_empty()
    }

    pub fn is_partial(&self) -> bool {
        self.metadata_str(META_MIGRATION) == Some("partial")
    }

    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str)
    }

    pub fn restaurant_name(&self) -> Option<&str> {
        self.metadata_str(META_RESTAURANT_NAME)
    }

    pub fn table_name(&self) -> Option<&str> {
        self.metadata_str(META_TABLE_NAME)
    }

    pub fn guest_name(&self) -> Option<&str> {
        self.metadata_str(META_GUEST_NAME)
    }

    pub fn is_host(&self) -> bool {
        self.metadata
            .get(META_IS_HOST)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Applies `patch` in place. `created_at_epoch_ms` is never touched.
    pub fn apply(&mut self, patch: SessionPatch) {
        if let Some(v) = patch.guest_session_identifier {
            self.guest_session_identifier = v;
        }
        if let Some(v) = patch.table_session_identifier {
            self.table_session_identifier = v;
        }
        if let Some(v) = patch.restaurant_identifier {
            self.restaurant_identifier = v;
        }
        if let Some(v) = patch.table_identifier {
            self.table_identifier = v;
        }
        if let Some(v) = patch.expires_at_epoch_ms {
            self.expires_at_epoch_ms = Some(v);
        }
        for (key, value) in patch.metadata {
            if value.is_null() {
                self.metadata.remove(&key);
            } else {
                self.metadata.insert(key, value);
            }
        }
    }
}

/// Partial update merged into the current record by `update_session`.
///
/// A `null` metadata value removes that key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionPatch {
    pub guest_session_identifier: Option<String>,
    pub table_session_identifier: Option<String>,
    pub restaurant_identifier: Option<String>,
    pub table_identifier: Option<String>,
    pub expires_at_epoch_ms: Option<i64>,
    pub metadata: BTreeMap<String, Value>,
}

impl SessionPatch {
    pub fn expires_at(expires_at_ms: i64) -> Self {
        Self {
            expires_at_epoch_ms: Some(expires_at_ms),
            ..Self::default()
        }
    }

    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}
