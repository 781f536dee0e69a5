// Tabshell platform abstraction
// Resolves where the settings file lives on Windows, macOS, and Linux.
//
// Uses `cfg(target_os)` for conditional compilation to select the correct
// platform-specific implementation at compile time.

use std::env;
use std::path::PathBuf;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

/// Environment variable that overrides the config directory on every platform.
pub const CONFIG_DIR_ENV: &str = "TABSHELL_CONFIG_DIR";

/// Returns the configuration directory for Tabshell.
///
/// - **Any**: `$TABSHELL_CONFIG_DIR` when set
/// - **Linux**: `~/.config/tabshell` (or `$XDG_CONFIG_HOME/tabshell`)
/// - **macOS**: `~/Library/Application Support/Tabshell`
/// - **Windows**: `%APPDATA%/Tabshell`
/// - **Other**: `./tabshell`
pub fn get_config_dir() -> PathBuf {
    if let Ok(dir) = env::var(CONFIG_DIR_ENV) {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    platform_config_dir()
}

#[cfg(target_os = "linux")]
fn platform_config_dir() -> PathBuf {
    linux::get_config_dir()
}

#[cfg(target_os = "macos")]
fn platform_config_dir() -> PathBuf {
    macos::get_config_dir()
}

#[cfg(target_os = "windows")]
fn platform_config_dir() -> PathBuf {
    windows::get_config_dir()
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
fn platform_config_dir() -> PathBuf {
    PathBuf::from("tabshell")
}
