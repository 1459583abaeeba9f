use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

/// Overlay panels that can auto-hide after inactivity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Panel {
    AiSidebar,
    NotesSidebar,
    TerminalPanel,
}

impl Panel {
    pub const ALL: [Panel; 3] = [Panel::AiSidebar, Panel::NotesSidebar, Panel::TerminalPanel];

    /// Wire name, as used in RPC params.
    pub fn key(self) -> &'static str {
        match self {
            Panel::AiSidebar => "ai-sidebar",
            Panel::NotesSidebar => "notes-sidebar",
            Panel::TerminalPanel => "terminal-panel",
        }
    }
}

/// Open flags for every panel, shared between the workspace and the timer
/// tasks that close panels.
#[derive(Debug, Default)]
pub struct PanelFlags {
    ai_sidebar: AtomicBool,
    notes_sidebar: AtomicBool,
    terminal_panel: AtomicBool,
}

impl PanelFlags {
    pub fn new() -> Self {
        Self::default()
    }

    fn flag(&self, panel: Panel) -> &AtomicBool {
        match panel {
            Panel::AiSidebar => &self.ai_sidebar,
            Panel::NotesSidebar => &self.notes_sidebar,
            Panel::TerminalPanel => &self.terminal_panel,
        }
    }

    pub fn is_open(&self, panel: Panel) -> bool {
        self.flag(panel).load(Ordering::SeqCst)
    }

    /// Sets the flag and returns its previous value.
    pub fn set_open(&self, panel: Panel, open: bool) -> bool {
        self.flag(panel).swap(open, Ordering::SeqCst)
    }

    pub fn open_panels(&self) -> Vec<Panel> {
        Panel::ALL.into_iter().filter(|p| self.is_open(*p)).collect()
    }
}
