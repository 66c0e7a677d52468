//! Legacy storage DTOs.
//!
//! Older builds stored the session as a loose "dining session" blob with
//! short field names. These types only ever get read.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

/// Timestamp as written by older builds: epoch millis or an ISO-8601 string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LegacyTimestamp {
    Millis(i64),
    Iso(String),
}

impl LegacyTimestamp {
    pub fn to_epoch_ms(&self) -> Option<i64> {
        match self {
            Self::Millis(ms) if *ms > 0 => Some(*ms),
            Self::Millis(_) => None,
            Self::Iso(text) => DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.timestamp_millis()),
        }
    }
}

/// The combined legacy blob stored under `dining_session`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyDiningSession {
    pub session_id: String,
    pub table_session_id: Option<String>,
    pub restaurant_id: String,
    pub table_id: String,
    pub restaurant_name: Option<String>,
    pub table_name: Option<String>,
    pub guest_name: Option<String>,
    pub is_host: Option<bool>,
    pub created_at: Option<LegacyTimestamp>,
    pub last_activity: Option<LegacyTimestamp>,
    pub expires_at: Option<LegacyTimestamp>,
}
