//! TOML-based configuration persistence.
//!
//! Reads and writes `AppConfig` to the platform-appropriate config file:
//! - Windows:  `%APPDATA%\RoFreeze\config.toml`
//! - Linux:    `~/.config/rofreeze/config.toml`
//! - macOS:    `~/Library/Application Support/RoFreeze/config.toml`
//!
//! # Example file
//!
//! ```toml
//! [general]
//! log_level = "info"
//! first_person_mode = false
//!
//! [hotkeys]
//! save_point = "Q"
//! toggle_freeze = "F3"
//!
//! [freeze]
//! repeat_key = "Space"
//! repeat_interval_ms = 30
//! ```
//!
//! Every field has a `#[serde(default = "…")]`, so a missing file, a missing
//! section or a missing key all fall back to the defaults above.  Key names
//! are parsed through the core key table; an unknown name is a parse error.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rofreeze_core::{HotkeyBindings, VirtualKey};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::freeze_control::FreezeSettings;

/// Bounds for `[freeze] repeat_interval_ms`.
pub const MIN_REPEAT_INTERVAL_MS: u64 = 5;
pub const MAX_REPEAT_INTERVAL_MS: u64 = 1000;

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The file parsed but a value is out of range or contradictory.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level application configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub hotkeys: HotkeysConfig,
    #[serde(default)]
    pub freeze: FreezeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// Schema version string – bump when breaking changes are introduced.
    #[serde(default = "default_version")]
    pub version: String,
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Release and restore the target's cursor clip around each freeze.
    #[serde(default)]
    pub first_person_mode: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct HotkeysConfig {
    #[serde(default = "default_save_point")]
    pub save_point: VirtualKey,
    #[serde(default = "default_toggle_freeze")]
    pub toggle_freeze: VirtualKey,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FreezeConfig {
    /// Key tapped repeatedly while frozen.
    #[serde(default = "default_repeat_key")]
    pub repeat_key: VirtualKey,
    #[serde(default = "default_repeat_interval_ms")]
    pub repeat_interval_ms: u64,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_version() -> String {
    "1.0".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_save_point() -> VirtualKey {
    VirtualKey::Q
}
fn default_toggle_freeze() -> VirtualKey {
    VirtualKey::F3
}
fn default_repeat_key() -> VirtualKey {
    VirtualKey::SPACE
}
fn default_repeat_interval_ms() -> u64 {
    30
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            log_level: default_log_level(),
            first_person_mode: false,
        }
    }
}

impl Default for HotkeysConfig {
    fn default() -> Self {
        Self {
            save_point: default_save_point(),
            toggle_freeze: default_toggle_freeze(),
        }
    }
}

impl Default for FreezeConfig {
    fn default() -> Self {
        Self {
            repeat_key: default_repeat_key(),
            repeat_interval_ms: default_repeat_interval_ms(),
        }
    }
}

impl HotkeysConfig {
    pub fn bindings(&self) -> HotkeyBindings {
        HotkeyBindings {
            save_point: self.save_point,
            toggle_freeze: self.toggle_freeze,
        }
    }
}

impl AppConfig {
    /// Checks values that parse fine but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hotkeys.bindings().is_ambiguous() {
            return Err(ConfigError::Invalid(format!(
                "save_point and toggle_freeze are both bound to {}",
                self.hotkeys.save_point
            )));
        }

        let interval = self.freeze.repeat_interval_ms;
        if !(MIN_REPEAT_INTERVAL_MS..=MAX_REPEAT_INTERVAL_MS).contains(&interval) {
            return Err(ConfigError::Invalid(format!(
                "repeat_interval_ms must be between {MIN_REPEAT_INTERVAL_MS} and \
                 {MAX_REPEAT_INTERVAL_MS}, got {interval}"
            )));
        }

        let level = self.general.log_level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "unknown log_level {:?}",
                self.general.log_level
            )));
        }
        Ok(())
    }

    /// Session settings derived from this config.
    pub fn freeze_settings(&self) -> FreezeSettings {
        FreezeSettings {
            bindings: self.hotkeys.bindings(),
            repeat_key: self.freeze.repeat_key,
            repeat_interval: Duration::from_millis(self.freeze.repeat_interval_ms),
            first_person_mode: self.general.first_person_mode,
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the config file.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads `AppConfig` from `path`, returning defaults if it does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// The configuration a process starts with, and where later changes may be
/// written.
#[derive(Debug)]
pub struct StartupConfig {
    pub config: AppConfig,
    /// `None` when the file could not be read or parsed.  Saving defaults
    /// over it would destroy the user's settings.
    pub save_path: Option<PathBuf>,
    pub load_error: Option<ConfigError>,
}

/// Loads the platform config file for startup.  Never fails: problems fall
/// back to defaults and are returned in [`StartupConfig::load_error`].
pub fn load_startup_config() -> StartupConfig {
    match config_file_path() {
        Ok(path) => load_startup_config_from(path),
        Err(e) => StartupConfig {
            config: AppConfig::default(),
            save_path: None,
            load_error: Some(e),
        },
    }
}

/// Same as [`load_startup_config`] for an explicit path.
pub fn load_startup_config_from(path: PathBuf) -> StartupConfig {
    match load_config_from(&path) {
        Ok(config) => StartupConfig {
            config,
            save_path: Some(path),
            load_error: None,
        },
        Err(e) => StartupConfig {
            config: AppConfig::default(),
            save_path: None,
            load_error: Some(e),
        },
    }
}

/// Persists `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config_to(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves the platform config base directory including the app subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        // %APPDATA% e.g. C:\Users\<user>\AppData\Roaming
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("RoFreeze"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("rofreeze"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("RoFreeze")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
