//! Persisted user preferences.

use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::{
    core::{
        services::DEFAULT_RECENT_LIMIT,
        utils::{ensure_dir, write_atomic, PathResolver},
    },
    currency::Currency,
    domain::TimeRange,
    errors::{LedgerError, Result},
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// ISO code of the display currency. Amounts are never converted.
    pub currency: String,
    pub language: String,
    #[serde(default)]
    pub dark_mode: bool,
    #[serde(default = "Config::default_notifications")]
    pub notifications: bool,
    #[serde(default)]
    pub default_time_range: TimeRange,
    #[serde(default = "Config::default_recent_limit")]
    pub recent_limit: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom directory for ledger data. Defaults to `<base>/data`.
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: "USD".into(),
            language: "en".into(),
            dark_mode: false,
            notifications: Self::default_notifications(),
            default_time_range: TimeRange::default(),
            recent_limit: Self::default_recent_limit(),
            data_dir: None,
        }
    }
}

impl Config {
    pub fn default_notifications() -> bool {
        true
    }

    pub fn default_recent_limit() -> usize {
        DEFAULT_RECENT_LIMIT
    }

    /// Display currency; unknown codes fall back to the first catalog entry.
    pub fn currency(&self) -> &'static Currency {
        Currency::find(&self.currency).unwrap_or_else(Currency::default_currency)
    }

    pub fn resolve_data_dir(&self, base: &Path) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| PathResolver::data_dir_in(base))
    }
}

/// Loads and saves [`Config`] below an application base directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        ensure_dir(&PathResolver::config_dir_in(&base))?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
            base,
        })
    }

    /// Returns the saved configuration, or defaults when none was saved yet.
    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        serde_json::from_str(&data).map_err(|err| {
            LedgerError::Config(format!("{}: {}", self.path.display(), err))
        })
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, json.as_bytes())?;
        debug!(path = %self.path.display(), "saved configuration");
        Ok(())
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_loads_defaults() {
        let temp = TempDir::new().expect("temp dir");
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).expect("manager");
        let config = manager.load().expect("load");
        assert_eq!(config, Config::default());
        assert_eq!(config.recent_limit, 5);
        assert_eq!(config.currency().symbol, "$");
    }

    #[test]
    fn save_then_load_roundtrip() {
        let temp = TempDir::new().expect("temp dir");
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).expect("manager");
        let config = Config {
            currency: "EUR".into(),
            dark_mode: true,
            default_time_range: TimeRange::Quarter,
            ..Config::default()
        };
        manager.save(&config).expect("save");
        assert_eq!(manager.load().expect("load"), config);
        assert_eq!(manager.load().unwrap().currency().symbol, "€");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let temp = TempDir::new().expect("temp dir");
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).expect("manager");
        fs::write(manager.path(), r#"{"currency":"GBP","language":"en"}"#).expect("write");
        let config = manager.load().expect("load");
        assert!(config.notifications);
        assert_eq!(config.default_time_range, TimeRange::Month);
        assert_eq!(
            config.resolve_data_dir(manager.base_dir()),
            temp.path().join("data")
        );
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let temp = TempDir::new().expect("temp dir");
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).expect("manager");
        fs::write(manager.path(), "{not json").expect("write");
        assert!(matches!(manager.load(), Err(LedgerError::Config(_))));
    }
}
