//! Application configuration.
//!
//! Loaded from a TOML file with every section optional:
//!
//! ```toml
//! [trip]
//! baseline = "trip.toml"
//!
//! [sync]
//! enabled = true
//! feed_path = "feed.json"
//! poll_interval_ms = 1000
//! default_day_key = "1/1"
//!
//! [search]
//! debounce_ms = 300
//!
//! [access]
//! passcode = "0000"
//!
//! [map]
//! default_zoom = 7.5
//!
//! [logging]
//! level = "info"
//! ```
//!
//! Relative paths are resolved against the directory holding the config file.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use tripbook_core::{MapSettings, SEARCH_DEBOUNCE};
use tripbook_sync::DEFAULT_DAY_KEY;

use crate::access::PasscodeGate;
use crate::error::{ConfigError, Result};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "TRIPBOOK_CONFIG";
/// Environment variable overriding `[access].passcode`.
pub const PASSCODE_ENV: &str = "TRIPBOOK_PASSCODE";
/// Environment variable overriding `[sync].feed_path`; also enables sync.
pub const FEED_ENV: &str = "TRIPBOOK_FEED";

pub const CONFIG_FILE_NAME: &str = "tripbook.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub trip: TripConfig,
    pub sync: SyncConfig,
    pub search: SearchConfig,
    pub access: AccessConfig,
    pub map: MapSettings,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripConfig {
    /// Baseline trip file (`.json` or `.toml`). The bundled trip is used when unset.
    pub baseline: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub enabled: bool,
    pub feed_path: Option<PathBuf>,
    pub poll_interval_ms: u64,
    /// Day that receives incoming items without a `date`.
    pub default_day_key: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            feed_path: None,
            poll_interval_ms: 1_000,
            default_day_key: DEFAULT_DAY_KEY.to_string(),
        }
    }
}

impl SyncConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: SEARCH_DEBOUNCE.as_millis() as u64,
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    /// No gate at all when unset.
    pub passcode: Option<String>,
    pub state_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive; `RUST_LOG` wins when set.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Parse TOML without touching the filesystem or environment.
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Read a config file and resolve its relative paths against its directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::from_toml_str(&content).map_err(|source| ConfigError::InvalidConfig {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(base) = path.parent() {
            config.resolve_relative_paths(base);
        }
        Ok(config)
    }

    /// Load configuration the way the CLI does.
    ///
    /// Lookup order: `explicit`, then `$TRIPBOOK_CONFIG`, then
    /// `tripbook.toml` in the platform config directory, then defaults.
    /// The first two must exist; the platform file is optional. Environment
    /// overrides are applied last and the result is validated.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);

        let mut config = match explicit.map(Path::to_path_buf).or(from_env) {
            Some(path) => {
                info!("Loading config from {}", path.display());
                Self::from_file(&path)?
            }
            None => match Self::default_config_path().filter(|p| p.is_file()) {
                Some(path) => {
                    info!("Loading config from {}", path.display());
                    Self::from_file(&path)?
                }
                None => {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_overrides_from(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// `tripbook.toml` inside the platform config directory.
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Apply `TRIPBOOK_PASSCODE` and `TRIPBOOK_FEED` from `lookup`.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(passcode) = lookup(PASSCODE_ENV).filter(|v| !v.is_empty()) {
            debug!("Passcode overridden from {}", PASSCODE_ENV);
            self.access.passcode = Some(passcode);
        }

        if let Some(feed) = lookup(FEED_ENV).filter(|v| !v.is_empty()) {
            debug!(feed = %feed, "Feed path overridden from {}", FEED_ENV);
            self.sync.feed_path = Some(PathBuf::from(feed));
            self.sync.enabled = true;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.sync.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "sync.poll_interval_ms",
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.sync.default_day_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "sync.default_day_key",
                reason: "must not be empty".to_string(),
            });
        }

        let bounds = &self.map.max_bounds;
        if bounds.south_west.lat > bounds.north_east.lat || bounds.south_west.lng > bounds.north_east.lng {
            return Err(ConfigError::InvalidValue {
                key: "map.max_bounds",
                reason: "south_west must not lie north or east of north_east".to_string(),
            });
        }

        Ok(())
    }

    /// Feed file location, defaulting to `feed.json` in the platform data directory.
    pub fn feed_path(&self) -> PathBuf {
        self.sync
            .feed_path
            .clone()
            .unwrap_or_else(|| data_dir().join("feed.json"))
    }

    /// Unlock state location, defaulting to `unlock.json` in the platform data directory.
    pub fn unlock_state_path(&self) -> PathBuf {
        self.access
            .state_file
            .clone()
            .unwrap_or_else(|| data_dir().join("unlock.json"))
    }

    /// The passcode gate, or `None` when no passcode is configured.
    pub fn passcode_gate(&self) -> Option<PasscodeGate> {
        self.access
            .passcode
            .as_ref()
            .map(|expected| PasscodeGate::new(expected.clone(), self.unlock_state_path()))
    }

    fn resolve_relative_paths(&mut self, base: &Path) {
        for path in [
            &mut self.trip.baseline,
            &mut self.sync.feed_path,
            &mut self.access.state_file,
        ]
        .into_iter()
        .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "tripbook")
}

fn data_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_local_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".tripbook"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;
    use tempfile::tempdir;
    use tripbook_model::Coordinates;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.sync.default_day_key, "1/1");
        assert_eq!(config.search.debounce(), Duration::from_millis(300));
        assert_eq!(config.map.default_zoom, 7.5);
        assert!(config.passcode_gate().is_none());
    }

    #[test]
    fn sections_override_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [sync]
            enabled = true
            poll_interval_ms = 250
            default_day_key = "1/2"

            [map]
            default_zoom = 9.0

            [map.default_center]
            lat = 24.15
            lng = 120.67

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert!(config.sync.enabled);
        assert_eq!(config.sync.poll_interval(), Duration::from_millis(250));
        assert_eq!(config.sync.default_day_key, "1/2");
        assert_eq!(config.map.default_zoom, 9.0);
        assert_eq!(config.map.default_center, Coordinates::new(24.15, 120.67));
        // Untouched keys of a partially given section keep their defaults.
        assert_eq!(config.map.max_bounds, MapSettings::default().max_bounds);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn from_file_resolves_relative_paths() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            "[trip]\nbaseline = \"trip.toml\"\n[sync]\nfeed_path = \"/abs/feed.json\"\n",
        )
        .unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.trip.baseline, Some(dir.path().join("trip.toml")));
        assert_eq!(config.sync.feed_path, Some(PathBuf::from("/abs/feed.json")));
    }

    #[test]
    fn invalid_toml_is_reported_with_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[sync\nenabled = true").unwrap();

        let err = AppConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfig { .. }));
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }

    #[test]
    fn overrides_set_passcode_and_enable_feed() {
        let vars: HashMap<&str, &str> =
            [(PASSCODE_ENV, "2468"), (FEED_ENV, "/tmp/tripbook-feed.json")].into();
        let mut config = AppConfig::default();

        config.apply_overrides_from(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.access.passcode.as_deref(), Some("2468"));
        assert!(config.sync.enabled);
        assert_eq!(config.feed_path(), PathBuf::from("/tmp/tripbook-feed.json"));
        assert!(config.passcode_gate().is_some());
    }

    #[test]
    fn empty_override_values_are_ignored() {
        let mut config = AppConfig::default();
        config.apply_overrides_from(|_| Some(String::new()));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.sync.poll_interval_ms = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { key: "sync.poll_interval_ms", .. })
        ));

        let mut config = AppConfig::default();
        config.map.max_bounds.south_west.lat = 30.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { key: "map.max_bounds", .. })
        ));
    }

    #[test]
    #[serial]
    fn load_prefers_explicit_path_over_environment() {
        let dir = tempdir().unwrap();
        let explicit = dir.path().join("explicit.toml");
        let from_env = dir.path().join("env.toml");
        std::fs::write(&explicit, "[logging]\nlevel = \"warn\"\n").unwrap();
        std::fs::write(&from_env, "[logging]\nlevel = \"trace\"\n").unwrap();

        std::env::set_var(CONFIG_ENV, &from_env);
        let config = AppConfig::load(Some(&explicit));
        let env_config = AppConfig::load(None);
        std::env::remove_var(CONFIG_ENV);

        assert_eq!(config.unwrap().logging.level, "warn");
        assert_eq!(env_config.unwrap().logging.level, "trace");
    }

    #[test]
    #[serial]
    fn load_fails_for_missing_explicit_file() {
        std::env::remove_var(CONFIG_ENV);
        let dir = tempdir().unwrap();
        let err = AppConfig::load(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
