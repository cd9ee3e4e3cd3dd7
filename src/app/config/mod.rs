// SPDX-License-Identifier: MPL-2.0
//! Loading and saving of user preferences in a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[general]` - Language and theme mode
//! - `[server]` - Booking server base URL and request timeout
//! - `[messaging]` - Conversation polling intervals
//!
//! All keys are kebab-case on disk.
//!
//! # Path Resolution
//!
//! The config file location can be customized for testing or portable
//! deployments:
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. Set `ICED_VENUE_CONFIG_DIR` environment variable
//! 3. Falls back to platform-specific config directory
//!
//! # Migration
//!
//! Old flat config files (pre-1.0) are automatically migrated to the
//! sectioned format when loaded. The next save writes the new format.
//!
//! # Examples
//!
//! ```no_run
//! use iced_venue::app::config;
//!
//! // Load existing configuration (returns tuple with optional warning)
//! let (mut config, _warning) = config::load();
//!
//! // Modify a setting
//! config.general.language = Some("en-US".to_string());
//!
//! // Save the modified configuration
//! config::save(&config).expect("Failed to save config");
//! ```

use crate::app::paths;
use crate::error::{Error, Result};
use crate::ui::theming::ThemeMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "settings.toml";

/// Base URL used when no server has been configured yet.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Request timeout applied to every server call, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Bounds accepted by the settings screen for the request timeout.
pub const MIN_TIMEOUT_SECS: u64 = 1;
pub const MAX_TIMEOUT_SECS: u64 = 300;

/// How often the conversation list refreshes while the messages screen is open.
pub const DEFAULT_CONVERSATIONS_POLL_SECS: u64 = 10;

/// How often the open conversation refreshes while one is selected.
pub const DEFAULT_CONVERSATION_POLL_SECS: u64 = 5;

// =============================================================================
// Section Structs
// =============================================================================

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct GeneralConfig {
    /// UI language code (e.g., "es", "en-US"). `None` follows the OS locale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Application theme mode (light, dark, or system).
    #[serde(
        default = "default_theme_mode",
        deserialize_with = "deserialize_theme_mode"
    )]
    pub theme_mode: ThemeMode,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            language: None,
            theme_mode: default_theme_mode(),
        }
    }
}

/// Booking server connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct ServerConfig {
    /// Base URL of the booking server, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ServerConfig {
    /// The timeout as a [`Duration`], ready for the HTTP client.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Messaging screen polling intervals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct MessagingConfig {
    /// Conversation list refresh interval in seconds.
    #[serde(default = "default_conversations_poll_secs")]
    pub conversations_poll_secs: u64,

    /// Open conversation refresh interval in seconds.
    #[serde(default = "default_conversation_poll_secs")]
    pub conversation_poll_secs: u64,
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            conversations_poll_secs: default_conversations_poll_secs(),
            conversation_poll_secs: default_conversation_poll_secs(),
        }
    }
}

// =============================================================================
// Main Config Struct (Sectioned)
// =============================================================================

/// Application configuration with logical sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    /// General application settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Booking server connection settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Messaging polling settings.
    #[serde(default)]
    pub messaging: MessagingConfig,
}

// =============================================================================
// Legacy Config (for migration from flat format)
// =============================================================================

/// Legacy flat configuration format (pre-1.0).
/// Used for automatic migration of old config files.
#[derive(Debug, Deserialize)]
struct LegacyConfig {
    language: Option<String>,
    #[serde(
        rename = "theme-mode",
        default = "default_theme_mode",
        deserialize_with = "deserialize_theme_mode"
    )]
    theme_mode: ThemeMode,
    #[serde(rename = "server-url", default)]
    server_url: Option<String>,
}

impl From<LegacyConfig> for Config {
    fn from(legacy: LegacyConfig) -> Self {
        Config {
            general: GeneralConfig {
                language: legacy.language,
                theme_mode: legacy.theme_mode,
            },
            server: ServerConfig {
                base_url: legacy.server_url.unwrap_or_else(default_base_url),
                timeout_secs: default_timeout_secs(),
            },
            messaging: MessagingConfig::default(),
        }
    }
}

// =============================================================================
// Default Value Functions
// =============================================================================

fn default_theme_mode() -> ThemeMode {
    ThemeMode::System
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_conversations_poll_secs() -> u64 {
    DEFAULT_CONVERSATIONS_POLL_SECS
}

fn default_conversation_poll_secs() -> u64 {
    DEFAULT_CONVERSATION_POLL_SECS
}

fn deserialize_theme_mode<'de, D>(deserializer: D) -> std::result::Result<ThemeMode, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    let raw = String::deserialize(deserializer)?;
    match raw.to_lowercase().as_str() {
        "light" => Ok(ThemeMode::Light),
        "dark" => Ok(ThemeMode::Dark),
        "system" => Ok(ThemeMode::System),
        other => Err(D::Error::custom(format!("invalid theme-mode: {}", other))),
    }
}

// =============================================================================
// Config Path Resolution
// =============================================================================

/// Returns the config file path with an optional override.
fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with a warning message key explaining what went wrong.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = get_config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(_) => {
                    return (
                        Config::default(),
                        Some("notification-config-load-error".to_string()),
                    );
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
///
/// Automatically migrates legacy flat format to the sectioned format.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;

    // Try parsing as sectioned format first
    if let Ok(config) = toml::from_str::<Config>(&content) {
        // Accept only when at least one section table is present; flat legacy
        // files would otherwise parse as an all-default config
        if content.contains("[general]")
            || content.contains("[server]")
            || content.contains("[messaging]")
        {
            return Ok(config);
        }
    }

    // Try parsing as legacy flat format
    if let Ok(legacy) = toml::from_str::<LegacyConfig>(&content) {
        return Ok(Config::from(legacy));
    }

    // If neither works, try the sectioned format again and let errors propagate
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves the configuration to the default path.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    if let Some(path) = get_config_path_with_override(base_dir) {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Saves configuration to a specific path.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::tempdir;

    #[test]
    fn save_and_load_round_trip_preserves_settings() {
        let config = Config {
            general: GeneralConfig {
                language: Some("en-US".to_string()),
                theme_mode: ThemeMode::Light,
            },
            server: ServerConfig {
                base_url: "http://192.168.1.50:8080".to_string(),
                timeout_secs: 45,
            },
            messaging: MessagingConfig {
                conversations_poll_secs: 20,
                conversation_poll_secs: 8,
            },
        };
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("settings.toml");

        save_to_path(&config, &config_path).expect("failed to save config");
        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded, config);
    }

    #[test]
    fn saved_file_uses_kebab_case_sectioned_format() {
        let config = Config {
            general: GeneralConfig {
                language: Some("es".to_string()),
                theme_mode: ThemeMode::Dark,
            },
            ..Config::default()
        };
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");

        save_to_path(&config, &config_path).expect("failed to save config");
        let content = fs::read_to_string(&config_path).expect("read config");

        assert!(content.contains("[general]"));
        assert!(content.contains("[server]"));
        assert!(content.contains("[messaging]"));
        assert!(content.contains("theme-mode"));
        assert!(content.contains("base-url"));
        assert!(content.contains("timeout-secs"));
        assert!(content.contains("conversations-poll-secs"));
        assert!(!content.contains("theme_mode"), "keys must be kebab-case");
    }

    #[test]
    fn load_from_path_invalid_toml_errors() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "not = valid = toml").expect("failed to write invalid toml");

        match load_from_path(&config_path) {
            Err(Error::Config(message)) => assert!(message.contains("expected")),
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn save_to_path_creates_parent_directories() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let nested_dir = temp_dir.path().join("deep").join("path");
        let config_path = nested_dir.join("settings.toml");

        save_to_path(&Config::default(), &config_path).expect("save should create directories");
        assert!(config_path.exists());
    }

    #[test]
    fn default_config_has_expected_values() {
        let config = Config::default();
        assert_eq!(config.general.language, None);
        assert_eq!(config.general.theme_mode, ThemeMode::System);
        assert_eq!(config.server.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.server.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(
            config.messaging.conversations_poll_secs,
            DEFAULT_CONVERSATIONS_POLL_SECS
        );
        assert_eq!(
            config.messaging.conversation_poll_secs,
            DEFAULT_CONVERSATION_POLL_SECS
        );
    }

    #[test]
    fn server_timeout_converts_to_duration() {
        let server = ServerConfig {
            timeout_secs: 12,
            ..ServerConfig::default()
        };
        assert_eq!(server.timeout(), Duration::from_secs(12));
    }

    #[test]
    fn timeout_bounds_are_reasonable() {
        assert!(MIN_TIMEOUT_SECS >= 1);
        assert!(MAX_TIMEOUT_SECS > MIN_TIMEOUT_SECS);
        assert!((MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS).contains(&DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn partial_sectioned_file_fills_missing_sections_with_defaults() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        let content = r#"
[server]
base-url = "http://10.0.0.2:5000"
"#;
        fs::write(&config_path, content).expect("write config");

        let loaded = load_from_path(&config_path).expect("should load partial config");
        assert_eq!(loaded.server.base_url, "http://10.0.0.2:5000");
        assert_eq!(loaded.server.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(loaded.general.theme_mode, ThemeMode::System);
        assert_eq!(
            loaded.messaging.conversation_poll_secs,
            DEFAULT_CONVERSATION_POLL_SECS
        );
    }

    #[test]
    fn save_with_override_and_load_with_override_round_trip() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let base_dir = temp_dir.path().to_path_buf();

        let config = Config {
            general: GeneralConfig {
                language: Some("es".to_string()),
                theme_mode: ThemeMode::Dark,
            },
            server: ServerConfig {
                base_url: "http://venue.local:5000".to_string(),
                timeout_secs: 60,
            },
            messaging: MessagingConfig::default(),
        };

        save_with_override(&config, Some(base_dir.clone())).expect("save should succeed");

        let expected_path = base_dir.join("settings.toml");
        assert!(expected_path.exists(), "config file should exist");

        let (loaded, warning) = load_with_override(Some(base_dir));
        assert!(warning.is_none(), "load should succeed without warning");
        assert_eq!(loaded.general.language, Some("es".to_string()));
        assert_eq!(loaded.general.theme_mode, ThemeMode::Dark);
        assert_eq!(loaded.server.base_url, "http://venue.local:5000");
        assert_eq!(loaded.server.timeout_secs, 60);
    }

    #[test]
    fn load_with_override_from_empty_directory_returns_default() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let base_dir = temp_dir.path().to_path_buf();

        let (config, warning) = load_with_override(Some(base_dir));
        assert!(warning.is_none(), "should not warn for missing file");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_with_override_from_corrupted_file_returns_default_with_warning() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let base_dir = temp_dir.path().to_path_buf();

        let config_path = base_dir.join("settings.toml");
        fs::write(&config_path, "not = valid = toml").expect("write file");

        let (config, warning) = load_with_override(Some(base_dir));
        assert!(warning.is_some(), "should warn about parse error");
        assert_eq!(
            warning.unwrap(),
            "notification-config-load-error".to_string()
        );
        assert_eq!(config, Config::default());
    }

    #[test]
    fn multiple_isolated_config_tests_dont_interfere() {
        let temp_dir_a = tempdir().expect("create temp dir A");
        let config_a = Config {
            general: GeneralConfig {
                language: Some("es".to_string()),
                ..GeneralConfig::default()
            },
            ..Config::default()
        };
        save_with_override(&config_a, Some(temp_dir_a.path().to_path_buf()))
            .expect("save A should succeed");

        let temp_dir_b = tempdir().expect("create temp dir B");
        let config_b = Config {
            general: GeneralConfig {
                language: Some("en-US".to_string()),
                ..GeneralConfig::default()
            },
            ..Config::default()
        };
        save_with_override(&config_b, Some(temp_dir_b.path().to_path_buf()))
            .expect("save B should succeed");

        let (loaded_a, _) = load_with_override(Some(temp_dir_a.path().to_path_buf()));
        let (loaded_b, _) = load_with_override(Some(temp_dir_b.path().to_path_buf()));

        assert_eq!(loaded_a.general.language, Some("es".to_string()));
        assert_eq!(loaded_b.general.language, Some("en-US".to_string()));
    }

    // =========================================================================
    // Migration Tests
    // =========================================================================

    #[test]
    fn migrate_legacy_flat_config() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");

        // Pre-1.0 files kept every key at the top level
        let legacy_content = r#"
language = "en-US"
theme-mode = "dark"
server-url = "http://old-server:9000"
"#;
        fs::write(&config_path, legacy_content).expect("write legacy config");

        let loaded = load_from_path(&config_path).expect("should load legacy config");

        assert_eq!(loaded.general.language, Some("en-US".to_string()));
        assert_eq!(loaded.general.theme_mode, ThemeMode::Dark);
        assert_eq!(loaded.server.base_url, "http://old-server:9000");
        assert_eq!(loaded.server.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(loaded.messaging, MessagingConfig::default());
    }

    #[test]
    fn migrate_legacy_flat_config_without_server_url() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");

        let legacy_content = "language = \"es\"\n";
        fs::write(&config_path, legacy_content).expect("write legacy config");

        let loaded = load_from_path(&config_path).expect("should load legacy config");

        assert_eq!(loaded.general.language, Some("es".to_string()));
        assert_eq!(loaded.server.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn theme_mode_accepts_mixed_case() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        let content = "[general]\ntheme-mode = \"Dark\"\n";
        fs::write(&config_path, content).expect("write config");

        let loaded = load_from_path(&config_path).expect("should accept mixed case");
        assert_eq!(loaded.general.theme_mode, ThemeMode::Dark);
    }

    #[test]
    fn invalid_theme_mode_is_rejected_by_sectioned_parser() {
        let result = toml::from_str::<Config>("[general]\ntheme-mode = \"neon\"\n");
        assert!(result.is_err(), "unknown theme mode should not parse");
    }
}
