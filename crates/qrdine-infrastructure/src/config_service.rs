//! Configuration loading.
//!
//! Reads `SessionConfig` from a TOML file (default
//! `~/.config/qrdine/config.toml`), creating it with defaults when missing,
//! then applies environment overrides.

use crate::storage::{FileLock, read_optional, write_atomic};
use qrdine_core::config::SessionConfig;
use qrdine_core::error::{Result, SessionError};
use std::path::{Path, PathBuf};

pub const ENV_API_BASE_URL: &str = "QRDINE_API_BASE_URL";
pub const ENV_SESSION_DURATION_MINUTES: &str = "QRDINE_SESSION_DURATION_MINUTES";

/// Platform config location for the session layer.
pub fn default_config_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("qrdine").join("config.toml"))
        .ok_or_else(|| SessionError::config("Cannot determine config directory"))
}

/// Platform data location for the durable key-value store.
pub fn default_durable_store_path() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join("qrdine").join("storage.json"))
        .ok_or_else(|| SessionError::config("Cannot determine data directory"))
}

/// Loads config from `path`, writing defaults if the file doesn't exist.
///
/// Environment overrides are applied from the process environment.
pub fn load_config(path: &Path) -> Result<SessionConfig> {
    load_config_with_env(path, |name| std::env::var(name).ok())
}

/// Same as [`load_config`] with an explicit environment lookup.
pub fn load_config_with_env<F>(path: &Path, env: F) -> Result<SessionConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match read_optional(path)? {
        Some(content) => toml::from_str::<SessionConfig>(&content).map_err(|e| {
            SessionError::config(format!("Failed to parse {}: {}", path.display(), e))
        })?,
        None => {
            let config = SessionConfig::default();
            let _lock = FileLock::acquire(path)?;
            write_atomic(path, &toml::to_string_pretty(&config)?)?;
            tracing::info!(path = %path.display(), "Wrote default session config");
            config
        }
    };

    apply_env_overrides(&mut config, env)?;
    config.validate()?;
    Ok(config)
}

pub fn apply_env_overrides<F>(config: &mut SessionConfig, env: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(base_url) = env(ENV_API_BASE_URL).filter(|v| !v.trim().is_empty()) {
        config.api.base_url = base_url.trim().to_string();
    }
    if let Some(raw) = env(ENV_SESSION_DURATION_MINUTES) {
        config.session_duration_minutes = raw.trim().parse().map_err(|_| {
            SessionError::config(format!(
                "{} must be an integer, got '{}'",
                ENV_SESSION_DURATION_MINUTES, raw
            ))
        })?;
    }
    Ok(())
}
