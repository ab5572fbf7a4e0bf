//! Tester configuration and persistence.
//!
//! Holds the tunables the workflow depends on (tolerance, guard password,
//! default backing-file location) and loads/saves them as JSON.
//! Cross-platform: uses appropriate config directories for each OS.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Result, TesterError};

// =============================================================================
// Config Path
// =============================================================================

const APP_NAME: &str = "voltsig";
const CONFIG_FILE: &str = "config.json";
const DEFAULT_DB_FILE: &str = "default.db";

/// Get the configuration directory path.
/// - Linux: ~/.config/voltsig/
/// - Windows: %APPDATA%\voltsig\
pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|p| p.join(APP_NAME))
        .ok_or_else(|| TesterError::Config("Could not find config directory".into()))
}

/// Get the full path to the config file.
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE))
}

fn default_database_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

// =============================================================================
// Config Structure
// =============================================================================

/// Tester tunables. Everything the workflow treats as a constant lives here
/// rather than as a free-floating global.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TesterConfig {
    /// Absolute pass/fail threshold in volts.
    #[serde(default = "default_tolerance")]
    pub tolerance_volts: f64,

    /// Shared password gating profile overwrite and delete.
    #[serde(default = "default_password")]
    pub password: String,

    /// Directory holding the default backing database.
    #[serde(default = "default_database_dir")]
    pub database_dir: PathBuf,

    /// Explicit backing file chosen with `use`; overrides the default
    /// location when set.
    #[serde(default)]
    pub active_database: Option<PathBuf>,
}

fn default_tolerance() -> f64 {
    0.2
}

fn default_password() -> String {
    "1234".to_string()
}

impl Default for TesterConfig {
    fn default() -> Self {
        Self {
            tolerance_volts: default_tolerance(),
            password: default_password(),
            database_dir: default_database_dir(),
            active_database: None,
        }
    }
}

impl TesterConfig {
    /// Backing file used when the operator has not switched to another one.
    pub fn default_database_path(&self) -> PathBuf {
        match &self.active_database {
            Some(path) => path.clone(),
            None => self.database_dir.join(DEFAULT_DB_FILE),
        }
    }
}

// =============================================================================
// Load / Save
// =============================================================================

/// Load configuration from disk. A missing file yields the defaults.
pub fn load_config() -> Result<TesterConfig> {
    let path = get_config_path()?;

    if !path.exists() {
        return Ok(TesterConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .map_err(|e| TesterError::Config(format!("Failed to read config: {}", e)))?;

    serde_json::from_str(&content)
        .map_err(|e| TesterError::Config(format!("Failed to parse config: {}", e)))
}

/// Save configuration to disk.
pub fn save_config(config: &TesterConfig) -> Result<()> {
    let dir = get_config_dir()?;
    let path = dir.join(CONFIG_FILE);

    // Create directory if needed
    std::fs::create_dir_all(&dir)
        .map_err(|e| TesterError::Config(format!("Failed to create config dir: {}", e)))?;

    let content = serde_json::to_string_pretty(config)
        .map_err(|e| TesterError::Config(format!("Failed to serialize config: {}", e)))?;

    std::fs::write(&path, content)
        .map_err(|e| TesterError::Config(format!("Failed to write config: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TesterConfig::default();
        assert_eq!(config.tolerance_volts, 0.2);
        assert_eq!(config.password, "1234");
        assert!(config.default_database_path().ends_with("default.db"));
    }

    #[test]
    fn test_json_round_trip() {
        let config = TesterConfig {
            tolerance_volts: 0.35,
            password: "s3cr".to_string(),
            database_dir: PathBuf::from("/tmp/bench"),
            active_database: Some(PathBuf::from("/tmp/bench/board7.db")),
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: TesterConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.tolerance_volts, 0.35);
        assert_eq!(back.password, "s3cr");
        assert_eq!(back.database_dir, PathBuf::from("/tmp/bench"));
        assert_eq!(
            back.default_database_path(),
            PathBuf::from("/tmp/bench/board7.db")
        );
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let back: TesterConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(back.tolerance_volts, 0.2);
        assert_eq!(back.password, "1234");
    }
}
