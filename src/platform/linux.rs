// HubDeck platform paths for Linux
// Config: ~/.config/hubdeck

use std::env;
use std::path::PathBuf;

/// Returns the configuration directory for HubDeck on Linux.
/// Uses `$XDG_CONFIG_HOME/hubdeck` if set, otherwise `~/.config/hubdeck`.
pub fn get_config_dir() -> PathBuf {
    config_dir_from(env::var("XDG_CONFIG_HOME").ok(), env::var("HOME").ok())
}

fn config_dir_from(xdg_config_home: Option<String>, home: Option<String>) -> PathBuf {
    match xdg_config_home.filter(|x| !x.is_empty()) {
        Some(xdg) => PathBuf::from(xdg).join("hubdeck"),
        None => {
            let home = home.unwrap_or_else(|| String::from("/tmp"));
            PathBuf::from(home).join(".config").join("hubdeck")
        }
    }
}
