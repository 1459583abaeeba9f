// HubDeck platform abstraction
// Provides the settings location and the command-modifier convention for
// Windows, macOS, and Linux.
//
// Uses `cfg(target_os)` for conditional compilation to select the correct
// platform-specific implementation at compile time.

use std::path::PathBuf;

use crate::types::shortcut::ModifierPlatform;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

/// Returns the platform-specific configuration directory for HubDeck.
///
/// - **Linux**: `~/.config/hubdeck` (or `$XDG_CONFIG_HOME/hubdeck`)
/// - **macOS**: `~/Library/Application Support/HubDeck`
/// - **Windows**: `%APPDATA%/HubDeck`
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_config_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_config_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_config_dir()
    }
}

/// Returns which key acts as the command modifier on this platform:
/// Cmd on macOS, Ctrl elsewhere.
pub fn modifier_platform() -> ModifierPlatform {
    #[cfg(target_os = "macos")]
    {
        ModifierPlatform::Mac
    }
    #[cfg(not(target_os = "macos"))]
    {
        ModifierPlatform::Other
    }
}
