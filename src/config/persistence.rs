//! Configuration file persistence for Extended Find
//!
//! This module handles loading and saving the settings file in a
//! platform-specific directory with graceful fallback to defaults.

use crate::config::FindSettings;
use crate::error::{Error, Result, ResultExt};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Application name used for the config directory
const APP_NAME: &str = "extended-find";

/// Configuration file name
const CONFIG_FILE_NAME: &str = "config.json";

/// Backup configuration file name (used during atomic writes)
const CONFIG_BACKUP_NAME: &str = "config.json.bak";

// ─────────────────────────────────────────────────────────────────────────────
// Platform-Specific Directory Resolution
// ─────────────────────────────────────────────────────────────────────────────

/// Get the platform-specific configuration directory for the application.
///
/// - **Windows**: `%APPDATA%\extended-find\`
/// - **macOS**: `~/Library/Application Support/extended-find/`
/// - **Linux**: `~/.config/extended-find/`
///
/// # Errors
///
/// Returns `Error::ConfigDirNotFound` if the config directory cannot be determined.
pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|base| base.join(APP_NAME))
        .ok_or(Error::ConfigDirNotFound)
}

/// Get the full path to the configuration file.
pub fn get_config_file_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE_NAME))
}

// ─────────────────────────────────────────────────────────────────────────────
// Load Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Load settings from the default config file location.
///
/// A missing, empty or corrupted file yields the default settings; the
/// latter is logged as a warning.
pub fn load_config() -> FindSettings {
    get_config_file_path()
        .and_then(|path| load_config_from(&path))
        .unwrap_or_warn_default(FindSettings::default(), "Failed to load configuration")
}

/// Load and sanitize settings from an explicit path.
///
/// A missing or empty file is not an error and yields defaults.
pub fn load_config_from(config_path: &Path) -> Result<FindSettings> {
    if !config_path.exists() {
        debug!(
            "Config file not found at {}, using defaults",
            config_path.display()
        );
        return Ok(FindSettings::default());
    }

    debug!("Loading config from: {}", config_path.display());

    let contents = fs::read_to_string(config_path).map_err(|source| Error::ConfigRead {
        path: config_path.to_path_buf(),
        source,
    })?;

    if contents.trim().is_empty() {
        debug!("Config file is empty, using defaults");
        return Ok(FindSettings::default());
    }

    let settings = FindSettings::from_json_sanitized(&contents).map_err(|source| {
        warn!(
            "Config file at {} contains invalid JSON: {}",
            config_path.display(),
            source
        );
        Error::ConfigFormat {
            path: Some(config_path.to_path_buf()),
            source,
        }
    })?;

    info!(
        "Configuration loaded successfully from {}",
        config_path.display()
    );
    Ok(settings)
}

// ─────────────────────────────────────────────────────────────────────────────
// Save Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Save settings to the default config file location.
///
/// # Errors
///
/// - `Error::ConfigDirNotFound`: Config directory cannot be determined
/// - `Error::ConfigWrite`: Failed to write the config file
pub fn save_config(settings: &FindSettings) -> Result<()> {
    save_config_to(&get_config_file_path()?, settings)
}

/// Save settings to an explicit path.
///
/// Writes a sibling `.bak` file first and renames it over the target, so a
/// crash mid-write never leaves a truncated config behind.
pub fn save_config_to(config_path: &Path, settings: &FindSettings) -> Result<()> {
    let config_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    if !config_dir.as_os_str().is_empty() && !config_dir.exists() {
        debug!("Creating config directory: {}", config_dir.display());
        fs::create_dir_all(&config_dir).map_err(|source| Error::ConfigWrite {
            path: config_dir.clone(),
            source,
        })?;
    }
    let backup_path = config_dir.join(CONFIG_BACKUP_NAME);

    debug!("Saving config to: {}", config_path.display());

    let json = serde_json::to_string_pretty(settings).map_err(|source| Error::ConfigFormat {
        path: Some(config_path.to_path_buf()),
        source,
    })?;

    fs::write(&backup_path, &json).map_err(|source| Error::ConfigWrite {
        path: backup_path.clone(),
        source,
    })?;

    fs::rename(&backup_path, config_path).map_err(|source| Error::ConfigWrite {
        path: config_path.to_path_buf(),
        source,
    })?;

    info!(
        "Configuration saved successfully to {}",
        config_path.display()
    );
    Ok(())
}

/// Save configuration, ignoring errors.
///
/// Returns `true` if the save was successful, `false` otherwise.
pub fn save_config_silent(settings: &FindSettings) -> bool {
    match save_config(settings) {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to save configuration: {}", e);
            false
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
