//! INI serialization: `ConfigFile` → commented INI string.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to the commented INI text written to config.ini.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let source = config
        .simulator
        .source
        .as_ref()
        .map(|p| path_to_string(p))
        .unwrap_or_default();

    format!(
        r#"[simulator]
; GPX track log played when no source is given on the command line
source = {}
; Real-time milliseconds between position updates (minimum 1)
tick_interval_ms = {}
; Simulated time per update, as a multiple of tick_interval_ms (minimum 1)
;   1 = real time, 2 = double speed, ...
playback_multiplier = {}

[logging]
; Directory for log files
directory = {}
; Log file name (cleared at the start of each session)
file = {}
"#,
        source,
        config.simulator.tick_interval_ms,
        config.simulator.playback_multiplier,
        path_to_string(&config.logging.directory),
        config.logging.file,
    )
}

/// Display a path, abbreviating the home directory to `~`.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
