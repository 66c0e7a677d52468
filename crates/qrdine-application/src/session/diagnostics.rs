//! Result types for session diagnostics.

use serde::{Deserialize, Serialize};

/// Outcome of checking that the stored session belongs to the table the
/// caller expects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextValidation {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl ContextValidation {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            ..Self::default()
        }
    }

    pub fn valid_with_warning(warning: impl Into<String>) -> Self {
        Self {
            is_valid: true,
            warning: Some(warning.into()),
            ..Self::default()
        }
    }

    pub fn invalid(error: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(error.into()),
            suggestion: Some(suggestion.into()),
            warning: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub healthy: bool,
    pub issues: Vec<String>,
    pub warnings: Vec<String>,
}

/// Where `recover_session` found a guest session id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecoverySource {
    /// The primary `session_id` key already had one.
    PrimaryKey,
    /// Taken from the unified session record.
    UnifiedRecord,
    /// Taken from a legacy per-table key.
    TableFallback { key: String },
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryOutcome {
    pub session_id: Option<String>,
    pub source: RecoverySource,
}

impl RecoveryOutcome {
    pub fn not_found() -> Self {
        Self {
            session_id: None,
            source: RecoverySource::NotFound,
        }
    }

    pub fn recovered(&self) -> bool {
        self.session_id.is_some()
    }
}
