use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use buildplan_core::Config;
use tokio::fs::read_to_string;

pub const BUILDPLAN_DIR: &str = ".buildplan";
pub const CONFIG_FILE: &str = "config.json";

/// Nearest `.buildplan` directory at or above `current_dir`.
#[must_use]
pub fn find_buildplan_dir(current_dir: &Path) -> Option<PathBuf> {
    current_dir
        .ancestors()
        .map(|dir| dir.join(BUILDPLAN_DIR))
        .find(|dir| dir.is_dir())
}

/// The `.buildplan` directory to use: an existing one above `current_dir`, or
/// a new one inside it.
#[must_use]
pub fn get_buildplan_dir(current_dir: &Path) -> PathBuf {
    find_buildplan_dir(current_dir).unwrap_or_else(|| current_dir.join(BUILDPLAN_DIR))
}

/// Directory holding the `.buildplan` directory.
///
/// # Errors
/// Returns error if no `.buildplan` directory exists above `current_dir`.
pub fn get_project_root(current_dir: &Path) -> Result<PathBuf> {
    let buildplan_dir = find_buildplan_dir(current_dir)
        .context("No .buildplan directory found. Run `buildplan init` first.")?;
    Ok(buildplan_dir
        .parent()
        .map_or_else(|| current_dir.to_path_buf(), Path::to_path_buf))
}

/// Load `.buildplan/config.json`.
///
/// # Errors
/// Returns error if the config file is missing or is not valid JSON.
pub async fn get_buildplan_config(current_dir: &Path) -> Result<Config> {
    let config_file = find_buildplan_dir(current_dir)
        .map(|dir| dir.join(CONFIG_FILE))
        .filter(|file| file.is_file())
        .context("No .buildplan/config.json found. Run `buildplan init` first.")?;
    let contents = read_to_string(&config_file)
        .await
        .with_context(|| format!("Failed to read {}", config_file.display()))?;
    let config: Config = serde_json::from_str(&contents)
        .with_context(|| format!("Invalid config file {}", config_file.display()))?;
    Ok(config)
}
