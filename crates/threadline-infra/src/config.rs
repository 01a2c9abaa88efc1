//! Configuration loader for Threadline.
//!
//! Reads `config.toml` from the data directory (`~/.threadline/` unless
//! `THREADLINE_DATA_DIR` says otherwise) and deserializes it into
//! [`AppConfig`]. Falls back to defaults when the file is missing or
//! malformed.

use std::path::{Path, PathBuf};

use threadline_types::config::AppConfig;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "THREADLINE_DATA_DIR";

/// Data directory: `$THREADLINE_DATA_DIR`, else `~/.threadline`, else
/// `./.threadline` when no home directory is known.
pub fn resolve_data_dir() -> PathBuf {
    match std::env::var(DATA_DIR_ENV) {
        Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
        _ => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".threadline"),
    }
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - Missing file: [`AppConfig::default()`].
/// - Unreadable or unparsable file: warning, then the default.
pub async fn load_config(data_dir: &Path) -> AppConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", config_path.display());
            AppConfig::default()
        }
    }
}
