//! Well-known paths for Waybar and the wizado install

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

/// Get the Waybar config directory (~/.config/waybar/)
pub fn waybar_dir() -> Result<PathBuf> {
    let config = dirs::config_dir().context("Could not determine config directory")?;
    Ok(config.join("waybar"))
}

/// Get the wizado launcher install directory (~/.local/share/steam-launcher/)
pub fn launcher_dir() -> Result<PathBuf> {
    let data = dirs::data_dir().context("Could not determine data directory")?;
    Ok(data.join("steam-launcher"))
}

/// Status script polled by the bar module
pub fn status_script() -> Result<PathBuf> {
    Ok(waybar_dir()?.join("scripts").join("wizado-status.sh"))
}

/// Menu opened when the module is clicked
pub fn menu_script() -> Result<PathBuf> {
    Ok(launcher_dir()?.join("wizado-menu"))
}

pub fn enter_gamesmode_script() -> Result<PathBuf> {
    Ok(launcher_dir()?.join("enter-gamesmode"))
}

pub fn leave_gamesmode_script() -> Result<PathBuf> {
    Ok(launcher_dir()?.join("leave-gamesmode"))
}

/// Locate the Waybar config file inside `dir`
///
/// Waybar reads `config.jsonc` first and falls back to a bare `config`.
pub fn find_waybar_config_in(dir: &Path) -> Result<PathBuf> {
    for name in ["config.jsonc", "config"] {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }
    bail!("Waybar config not found in {}", dir.display())
}

/// Resolve the Waybar config file, preferring an explicit path
pub fn resolve_waybar_config(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => find_waybar_config_in(&waybar_dir()?),
    }
}
