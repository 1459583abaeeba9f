// HubDeck state managers
// Managers hold the workspace's mutable state: open tabs, panel auto-hide timers, shortcuts.

pub mod autohide_manager;
pub mod shortcut_manager;
pub mod tab_manager;
