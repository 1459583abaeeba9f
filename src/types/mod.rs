// HubDeck shared type definitions
// Each submodule defines types used across the workspace core.

pub mod embed;
pub mod errors;
pub mod panel;
pub mod resource;
pub mod settings;
pub mod shortcut;
pub mod tab;
