//! Directory path management for mensa
//!
//! All paths used by mensa are centralized here. This makes it easy to
//! understand and modify the directory structure.

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Get the base mensa directory (~/.config/mensa/)
///
/// This is the root directory for mensa configuration.
pub fn get_mensa_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .context("Failed to get config directory")?
        .join("mensa"))
}

/// Get the config file path (~/.config/mensa/config.toml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_mensa_dir()?.join("config.toml"))
}

/// Get the XDG state directory for mensa
///
/// The persisted session lives here rather than under the config dir:
/// it is runtime state, not something a user edits.
///
/// - Linux: $XDG_STATE_HOME/mensa/ or ~/.local/state/mensa/
/// - macOS: ~/Library/Application Support/mensa/
pub fn get_state_dir() -> Result<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        Ok(dirs::data_local_dir()
            .context("Failed to get data local directory")?
            .join("mensa"))
    }

    #[cfg(not(target_os = "macos"))]
    {
        // The dirs crate has no state_dir(), so the XDG spec is applied manually
        if let Ok(xdg_state) = std::env::var("XDG_STATE_HOME") {
            Ok(PathBuf::from(xdg_state).join("mensa"))
        } else {
            Ok(dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".local")
                .join("state")
                .join("mensa"))
        }
    }
}

/// Get the persisted session file path (<state dir>/session.json)
pub fn get_session_path() -> Result<PathBuf> {
    Ok(get_state_dir()?.join("session.json"))
}
