// HubDeck platform paths for macOS
// Config: ~/Library/Application Support/HubDeck

use std::env;
use std::path::PathBuf;

/// Returns the configuration directory for HubDeck on macOS.
/// `~/Library/Application Support/HubDeck`
pub fn get_config_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
        .join("Library")
        .join("Application Support")
        .join("HubDeck")
}
