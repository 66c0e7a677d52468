//! Error types for the QRDine session layer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the session storage crates.
///
/// Most of these never reach UI callers: the store and facade catch them,
/// log them, and degrade to "no session". They surface directly only from the
/// raw `KeyValueStore` backends, config loading, and `extend_session`.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionError {
    /// No storage exists in this execution context (or it is disabled)
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// The backing store refused a write because it is full
    #[error("Storage quota exceeded writing '{key}' ({needed} bytes, {limit} allowed)")]
    QuotaExceeded {
        key: String,
        needed: usize,
        limit: usize,
    },

    /// IO error (file-backed stores)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "JSON", "TOML"
        message: String,
    },

    /// Record failed the validity invariant
    #[error("Invalid session record: missing {}", .missing.join(", "))]
    InvalidRecord { missing: Vec<String> },

    /// Operation requires a session but none is stored
    #[error("No active session")]
    NoActiveSession,

    /// The session has passed its expiry and can only be replaced
    #[error("Session expired")]
    SessionExpired,

    /// Backend reported the table session as closed/expired/invalid
    #[error("Session terminated by backend: {code}")]
    SessionTerminated { code: String },

    /// Any other backend or network failure
    #[error("Backend error: {message}")]
    Backend { message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SessionError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a StorageUnavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::StorageUnavailable(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Backend error
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// True for failures of the underlying key-value store itself.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            Self::StorageUnavailable(_) | Self::QuotaExceeded { .. } | Self::Io { .. }
        )
    }

    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self, Self::SessionTerminated { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for SessionError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for SessionError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for SessionError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, SessionError>`.
pub type Result<T> = std::result::Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_record_lists_every_missing_field() {
        let err = SessionError::InvalidRecord {
            missing: vec![
                "guestSessionIdentifier".to_string(),
                "tableIdentifier".to_string(),
            ],
        };
        assert_eq!(
            err.to_string(),
            "Invalid session record: missing guestSessionIdentifier, tableIdentifier"
        );
    }

    #[test]
    fn test_json_error_converts_to_serialization() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        let err: SessionError = parse_err.into();
        assert!(err.is_serialization());
        assert!(!err.is_storage());
    }

    #[test]
    fn test_storage_predicate() {
        assert!(SessionError::unavailable("ssr").is_storage());
        assert!(
            SessionError::QuotaExceeded {
                key: "k".into(),
                needed: 10,
                limit: 5
            }
            .is_storage()
        );
        assert!(!SessionError::NoActiveSession.is_storage());
    }
}
