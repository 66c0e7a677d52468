use crate::error::{Result, SessionError};
use serde::{Deserialize, Serialize};

/// Root configuration for the session layer.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// How long a cached record is served before re-reading storage.
    pub cache_ttl_secs: u64,
    /// Fallback session lifetime used only when the backend did not supply
    /// `expiresAt`. Placeholder until confirmed against backend policy.
    pub session_duration_minutes: i64,
    /// Remaining-minutes threshold for "expiring soon" warnings.
    pub expiry_warning_minutes: i64,
    /// Default `tracing` filter directive.
    pub log_filter: String,
    pub api: ApiConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 30,
            session_duration_minutes: 120,
            expiry_warning_minutes: 15,
            log_filter: "info".to_string(),
            api: ApiConfig::default(),
        }
    }
}

impl SessionConfig {
    pub fn cache_ttl_ms(&self) -> i64 {
        i64::try_from(self.cache_ttl_secs.saturating_mul(1_000)).unwrap_or(i64::MAX)
    }

    pub fn session_duration_ms(&self) -> i64 {
        self.session_duration_minutes.saturating_mul(60_000)
    }

    /// Rejects settings that would make every session expire immediately.
    pub fn validate(&self) -> Result<()> {
        if self.session_duration_minutes <= 0 {
            return Err(SessionError::config(
                "session_duration_minutes must be positive",
            ));
        }
        if self.expiry_warning_minutes < 0 {
            return Err(SessionError::config(
                "expiry_warning_minutes must not be negative",
            ));
        }
        if self.api.timeout_secs == 0 {
            return Err(SessionError::config("api.timeout_secs must be positive"));
        }
        Ok(())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.cache_ttl_ms(), 30_000);
        assert_eq!(config.session_duration_ms(), 2 * 60 * 60 * 1_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: SessionConfig = toml::from_str(
            r#"
            session_duration_minutes = 180

            [api]
            base_url = "https://api.example.com"
            "#,
        )
        .unwrap();

        assert_eq!(config.session_duration_minutes, 180);
        assert_eq!(config.cache_ttl_secs, 30);
        assert_eq!(config.api.base_url, "https://api.example.com");
        assert_eq!(config.api.timeout_secs, 10);
    }

    #[test]
    fn test_validate_rejects_zero_duration() {
        let config = SessionConfig {
            session_duration_minutes: 0,
            ..SessionConfig::default()
        };
        assert!(matches!(config.validate(), Err(SessionError::Config(_))));
    }
}
