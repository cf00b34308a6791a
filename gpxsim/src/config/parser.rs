//! INI parsing: `Ini` → `ConfigFile`.
//!
//! The single place where INI key names are mapped to struct fields.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use ini::Ini;

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::simulator::{validate_playback_multiplier, validate_tick_interval};

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [simulator] section
    if let Some(section) = ini.section(Some("simulator")) {
        if let Some(v) = section.get("source") {
            let v = v.trim();
            if !v.is_empty() {
                config.simulator.source = Some(expand_tilde(v));
            }
        }
        if let Some(v) = section.get("tick_interval_ms") {
            let ms: u64 = parse_number("simulator", "tick_interval_ms", v)?;
            validate_tick_interval(Duration::from_millis(ms))
                .map_err(|e| invalid("simulator", "tick_interval_ms", v, e.to_string()))?;
            config.simulator.tick_interval_ms = ms;
        }
        if let Some(v) = section.get("playback_multiplier") {
            let multiplier: u32 = parse_number("simulator", "playback_multiplier", v)?;
            validate_playback_multiplier(multiplier)
                .map_err(|e| invalid("simulator", "playback_multiplier", v, e.to_string()))?;
            config.simulator.playback_multiplier = multiplier;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if v.contains(['/', '\\']) {
                return Err(invalid(
                    "logging",
                    "file",
                    v,
                    "must be a file name, set the directory separately".to_string(),
                ));
            }
            if !v.is_empty() {
                config.logging.file = v.to_string();
            }
        }
    }

    Ok(config)
}

fn parse_number<T: FromStr>(section: &str, key: &str, value: &str) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, "expected a positive integer".to_string()))
}

fn invalid(section: &str, key: &str, value: &str, reason: String) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason,
    }
}

/// Expand a leading `~/` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
