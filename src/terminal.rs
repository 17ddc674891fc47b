//! Terminal emulator detection
//!
//! The bar module's click action opens the wizado menu in a terminal, so we
//! need a command prefix such as `kitty -e` that runs the rest of the line.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Terminals in the order they are tried
pub const TERMINALS: [&str; 6] = [
    "ghostty",
    "alacritty",
    "kitty",
    "foot",
    "gnome-terminal",
    "konsole",
];

/// Used when none of the known terminals is installed
pub const FALLBACK_TERMINAL: &str = "alacritty -e";

/// Flag that makes `terminal` run a command
pub fn exec_flag(terminal: &str) -> &'static str {
    match terminal {
        "gnome-terminal" => "--",
        _ => "-e",
    }
}

/// Pick the first terminal for which `is_installed` returns true
pub fn detect_terminal_with<F>(is_installed: F) -> String
where
    F: Fn(&str) -> bool,
{
    TERMINALS
        .iter()
        .find(|name| is_installed(name))
        .map(|name| format!("{} {}", name, exec_flag(name)))
        .unwrap_or_else(|| FALLBACK_TERMINAL.to_string())
}

/// Detect a terminal from the executables on `PATH`
pub fn detect_terminal() -> String {
    detect_terminal_with(|name| find_in_path(name).is_some())
}

#[cfg(unix)]
fn is_executable(meta: &fs::Metadata) -> bool {
    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_meta: &fs::Metadata) -> bool {
    true
}

fn executable_in(dir: &Path, name: &str) -> Option<PathBuf> {
    let candidate = dir.join(name);
    let meta = fs::metadata(&candidate).ok()?;
    (meta.is_file() && is_executable(&meta)).then_some(candidate)
}

/// Look up an executable by name in `PATH`
pub fn find_in_path(name: &str) -> Option<PathBuf> {
    let path = env::var_os("PATH")?;
    env::split_paths(&path)
        .filter(|dir| !dir.as_os_str().is_empty())
        .find_map(|dir| executable_in(&dir, name))
}
