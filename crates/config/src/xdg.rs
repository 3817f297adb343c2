//! XDG Base Directory support for tabpad.

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_NAME: &str = "tabpad";

/// Get the configuration directory following XDG conventions.
///
/// Returns `$XDG_CONFIG_HOME/tabpad` or `~/.config/tabpad`.
pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|p| p.join(APP_NAME))
        .context("Failed to determine config directory")
}

/// Get the cache directory following XDG conventions.
///
/// Returns `$XDG_CACHE_HOME/tabpad` or `~/.cache/tabpad`. The log file
/// lives here unless configured otherwise.
pub fn get_cache_dir() -> Result<PathBuf> {
    dirs::cache_dir()
        .map(|p| p.join(APP_NAME))
        .context("Failed to determine cache directory")
}
