use serde::{Deserialize, Serialize};

use super::panel::Panel;

/// Top-level dashboard settings container.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DashboardSettings {
    #[serde(default)]
    pub general: GeneralSettings,
    #[serde(default)]
    pub services: ServiceSettings,
    #[serde(default)]
    pub panels: PanelSettings,
}

/// General dashboard settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralSettings {
    #[serde(default = "default_theme")]
    pub theme: ThemeMode,
}

fn default_theme() -> ThemeMode {
    ThemeMode::System
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            theme: default_theme(),
        }
    }
}

/// Theme mode selection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ThemeMode {
    Dark,
    Light,
    System,
}

impl ThemeMode {
    /// Dark and light swap; system resolves to dark.
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light | ThemeMode::System => ThemeMode::Dark,
        }
    }
}

/// Addresses of the remote services embedded in the dashboard.
/// `None` leaves the corresponding tool unconfigured.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceSettings {
    #[serde(default)]
    pub terminal_url: Option<String>,
    #[serde(default)]
    pub snippets_url: Option<String>,
    #[serde(default)]
    pub search_url: Option<String>,
    #[serde(default)]
    pub logs_url: Option<String>,
    #[serde(default = "default_file_base_url")]
    pub file_base_url: String,
    #[serde(default)]
    pub resource_api_url: Option<String>,
}

fn default_file_base_url() -> String {
    "http://localhost:8080".to_string()
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            terminal_url: None,
            snippets_url: None,
            search_url: None,
            logs_url: None,
            file_base_url: default_file_base_url(),
            resource_api_url: None,
        }
    }
}

/// Auto-hide timeouts per panel in milliseconds; zero or negative disables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PanelSettings {
    #[serde(default)]
    pub ai_sidebar_timeout_ms: i64,
    #[serde(default)]
    pub notes_sidebar_timeout_ms: i64,
    #[serde(default)]
    pub terminal_panel_timeout_ms: i64,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            ai_sidebar_timeout_ms: 0,
            notes_sidebar_timeout_ms: 0,
            terminal_panel_timeout_ms: 0,
        }
    }
}

impl PanelSettings {
    pub fn timeout_ms(&self, panel: Panel) -> i64 {
        match panel {
            Panel::AiSidebar => self.ai_sidebar_timeout_ms,
            Panel::NotesSidebar => self.notes_sidebar_timeout_ms,
            Panel::TerminalPanel => self.terminal_panel_timeout_ms,
        }
    }
}
