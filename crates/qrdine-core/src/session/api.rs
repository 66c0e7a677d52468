//! Backend collaborator for table-session extension.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Successful body of the "extend table session" call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendSessionResponse {
    /// ISO-8601 timestamp.
    pub expires_at: String,
}

/// Error codes the backend attaches to rejected calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiErrorCode {
    SessionClosed,
    SessionNotFound,
    SessionExpired,
    InvalidSession,
    Other(String),
}

impl ApiErrorCode {
    pub fn parse(code: &str) -> Self {
        match code {
            "SESSION_CLOSED" => Self::SessionClosed,
            "SESSION_NOT_FOUND" => Self::SessionNotFound,
            "SESSION_EXPIRED" => Self::SessionExpired,
            "INVALID_SESSION" => Self::InvalidSession,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::SessionClosed => "SESSION_CLOSED",
            Self::SessionNotFound => "SESSION_NOT_FOUND",
            Self::SessionExpired => "SESSION_EXPIRED",
            Self::InvalidSession => "INVALID_SESSION",
            Self::Other(code) => code,
        }
    }

    /// True when the table session no longer exists server-side and local
    /// state should be wiped.
    pub fn is_session_terminated(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a backend call.
///
/// `code` is `None` for transport failures and unstructured error bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub code: Option<ApiErrorCode>,
    pub message: String,
    pub status: Option<u16>,
}

impl ApiError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            status: None,
        }
    }

    pub fn with_code(code: ApiErrorCode, message: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
            status,
        }
    }

    pub fn is_session_terminated(&self) -> bool {
        self.code
            .as_ref()
            .is_some_and(ApiErrorCode::is_session_terminated)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.code, self.status) {
            (Some(code), Some(status)) => write!(f, "{} ({}): {}", code, status, self.message),
            (Some(code), None) => write!(f, "{}: {}", code, self.message),
            (None, Some(status)) => write!(f, "HTTP {}: {}", status, self.message),
            (None, None) => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ApiError {}

/// Remote table-session operations.
#[async_trait]
pub trait TableSessionApi: Send + Sync {
    /// Renews the table session and returns its new expiry.
    async fn extend_table_session(
        &self,
        table_session_id: &str,
    ) -> std::result::Result<ExtendSessionResponse, ApiError>;
}
