//! Application configuration.
//!
//! Read from `{data_dir}/config.yaml`. Every field is optional:
//!
//! ```yaml
//! max_scenarios: 3
//! debounce_ms: 250
//! default_name_prefix: "Сценарий"
//! notification_secs: 4
//! ```

#[cfg(feature = "native")]
use std::path::{Path, PathBuf};
use std::time::Duration;

use propcalc_core::StoreConfig;
use propcalc_core::store::{DEFAULT_MAX_SCENARIOS, DEFAULT_NAME_PREFIX};
use serde::{Deserialize, Serialize};

/// Fewest scenarios a comparison can hold
const MIN_SCENARIOS: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Capacity of the comparison list
    pub max_scenarios: usize,
    /// Quiet period before the live preview recomputes
    pub debounce_ms: u64,
    /// Prefix for auto-generated scenario names
    pub default_name_prefix: String,
    /// How long a notification stays on screen
    pub notification_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_scenarios: DEFAULT_MAX_SCENARIOS,
            debounce_ms: 250,
            default_name_prefix: DEFAULT_NAME_PREFIX.to_string(),
            notification_secs: 4,
        }
    }
}

impl AppConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_saphyr::Error> {
        serde_saphyr::from_str::<Self>(yaml).map(Self::sanitized)
    }

    pub fn to_yaml(&self) -> Result<String, serde_saphyr::ser::Error> {
        serde_saphyr::to_string(self)
    }

    fn sanitized(mut self) -> Self {
        if self.max_scenarios < MIN_SCENARIOS {
            tracing::warn!(
                max_scenarios = self.max_scenarios,
                "max_scenarios is too small for a comparison, using {MIN_SCENARIOS}"
            );
            self.max_scenarios = MIN_SCENARIOS;
        }
        if self.default_name_prefix.trim().is_empty() {
            self.default_name_prefix = DEFAULT_NAME_PREFIX.to_string();
        }
        self
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            max_scenarios: self.max_scenarios,
            default_name_prefix: self.default_name_prefix.clone(),
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_secs(self.notification_secs)
    }

    #[cfg(feature = "native")]
    pub fn path(data_dir: &Path) -> PathBuf {
        data_dir.join("config.yaml")
    }

    /// Load the config file, falling back to defaults when it is missing or
    /// cannot be parsed.
    #[cfg(feature = "native")]
    pub fn load_or_default(data_dir: &Path) -> Self {
        let path = Self::path(data_dir);
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => Self::from_yaml(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "Invalid config file, using defaults");
                Self::default()
            }),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = AppConfig::from_yaml("debounce_ms: 150\n").unwrap();
        assert_eq!(config.debounce(), Duration::from_millis(150));
        assert_eq!(config.max_scenarios, DEFAULT_MAX_SCENARIOS);
        assert_eq!(config.default_name_prefix, DEFAULT_NAME_PREFIX);
    }

    #[test]
    fn test_too_small_capacity_is_raised() {
        let config = AppConfig::from_yaml("max_scenarios: 1\n").unwrap();
        assert_eq!(config.max_scenarios, 2);
        assert_eq!(config.store_config().max_scenarios, 2);
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        assert!(AppConfig::from_yaml("max_scenarios: [oops").is_err());
    }

    #[cfg(feature = "native")]
    #[test]
    fn test_load_or_default() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(AppConfig::load_or_default(dir.path()), AppConfig::default());

        std::fs::write(AppConfig::path(dir.path()), "notification_secs: 9\n").unwrap();
        assert_eq!(AppConfig::load_or_default(dir.path()).notification_secs, 9);

        std::fs::write(AppConfig::path(dir.path()), "notification_secs: nine\n").unwrap();
        assert_eq!(AppConfig::load_or_default(dir.path()), AppConfig::default());
    }
}
