//! Init command - create the configuration file.

use std::path::PathBuf;

use gpxsim::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Run the init command.
pub fn run(config_path: Option<PathBuf>) -> Result<(), CliError> {
    let path = config_path.unwrap_or_else(config_file_path);
    let existed = path.exists();

    ConfigFile::ensure_exists_at(&path)?;

    if existed {
        println!("Configuration file already exists: {}", path.display());
    } else {
        println!("Created configuration file: {}", path.display());
    }
    println!();
    println!("Edit this file to set a default track log and playback speed.");
    println!("CLI arguments override config file values when specified.");
    Ok(())
}
