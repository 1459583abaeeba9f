//! Shortcut registry and dispatcher for HubDeck.
//!
//! The registry is a fixed table of key chords with conflict detection at
//! construction time. The dispatcher is the single key listener of a
//! workspace: it resolves the platform command modifier, finds the matching
//! definition and runs the action bound to it.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::types::errors::ShortcutError;
use crate::types::shortcut::{
    normalize_key, DispatchOutcome, KeyChord, KeyEvent, ModifierPlatform, ShortcutDefinition,
};

pub const CLOSE_OVERLAY: &str = "close_overlay";
pub const OPEN_SETTINGS: &str = "open_settings";
pub const SHOW_SHORTCUTS: &str = "show_shortcuts";
pub const TOGGLE_AI_SIDEBAR: &str = "toggle_ai_sidebar";
pub const TOGGLE_NOTES_SIDEBAR: &str = "toggle_notes_sidebar";
pub const TOGGLE_TERMINAL_PANEL: &str = "toggle_terminal_panel";
pub const OPEN_TERMINAL: &str = "open_terminal";
pub const OPEN_SEARCH: &str = "open_search";
pub const OPEN_SNIPPETS: &str = "open_snippets";
pub const OPEN_LOGS: &str = "open_logs";
pub const OPEN_AI_CHAT: &str = "open_ai_chat";
pub const TOGGLE_THEME: &str = "toggle_theme";

/// Built-in shortcut table, in matching order.
pub const DEFAULT_SHORTCUTS: [ShortcutDefinition; 12] = [
    ShortcutDefinition::new(CLOSE_OVERLAY, "Escape", "Close the topmost overlay").allow_default(),
    ShortcutDefinition::new(OPEN_SETTINGS, ",", "Open settings").with_modifier(),
    ShortcutDefinition::new(SHOW_SHORTCUTS, "/", "Show keyboard shortcuts").with_modifier(),
    ShortcutDefinition::new(TOGGLE_AI_SIDEBAR, "a", "Toggle AI sidebar")
        .with_modifier()
        .with_shift(),
    ShortcutDefinition::new(TOGGLE_NOTES_SIDEBAR, "n", "Toggle notes sidebar")
        .with_modifier()
        .with_shift(),
    ShortcutDefinition::new(TOGGLE_TERMINAL_PANEL, "`", "Toggle terminal panel").with_modifier(),
    ShortcutDefinition::new(OPEN_TERMINAL, "t", "Open terminal")
        .with_modifier()
        .with_alt(),
    ShortcutDefinition::new(OPEN_SEARCH, "k", "Open search").with_modifier(),
    ShortcutDefinition::new(OPEN_SNIPPETS, "s", "Open snippets")
        .with_modifier()
        .with_shift(),
    ShortcutDefinition::new(OPEN_LOGS, "l", "Open log viewer")
        .with_modifier()
        .with_shift(),
    ShortcutDefinition::new(OPEN_AI_CHAT, "a", "Open AI chat")
        .with_modifier()
        .with_alt(),
    ShortcutDefinition::new(TOGGLE_THEME, "d", "Toggle dark mode")
        .with_modifier()
        .with_shift(),
];

/// Trait defining read access to a shortcut table.
pub trait ShortcutManagerTrait {
    fn get_shortcut(&self, id: &str) -> Option<&ShortcutDefinition>;
    fn list_shortcuts(&self) -> &[ShortcutDefinition];
    fn find_by_chord(&self, chord: &KeyChord) -> Option<&ShortcutDefinition>;
}

/// Immutable, conflict-free table of shortcut definitions.
#[derive(Debug, Clone)]
pub struct ShortcutRegistry {
    definitions: Vec<ShortcutDefinition>,
    by_chord: HashMap<KeyChord, usize>,
}

impl ShortcutRegistry {
    /// Builds a registry, rejecting empty keys, duplicate ids and any two
    /// definitions that share a chord.
    pub fn new(definitions: Vec<ShortcutDefinition>) -> Result<Self, ShortcutError> {
        let mut by_chord = HashMap::new();
        let mut ids = HashSet::new();

        for (index, def) in definitions.iter().enumerate() {
            if def.key.trim().is_empty() {
                return Err(ShortcutError::InvalidKey(format!(
                    "'{}' has an empty key",
                    def.id
                )));
            }
            if !ids.insert(def.id) {
                return Err(ShortcutError::Conflict(format!(
                    "id '{}' is registered twice",
                    def.id
                )));
            }
            if let Some(&other) = by_chord.get(&def.chord()) {
                let other: &ShortcutDefinition = &definitions[other];
                return Err(ShortcutError::Conflict(format!(
                    "'{}' and '{}' share the same key chord",
                    other.id, def.id
                )));
            }
            by_chord.insert(def.chord(), index);
        }

        Ok(Self {
            definitions,
            by_chord,
        })
    }
}

impl Default for ShortcutRegistry {
    fn default() -> Self {
        let definitions = DEFAULT_SHORTCUTS.to_vec();
        let by_chord = definitions
            .iter()
            .enumerate()
            .map(|(index, def)| (def.chord(), index))
            .collect();
        Self {
            definitions,
            by_chord,
        }
    }
}

impl ShortcutManagerTrait for ShortcutRegistry {
    fn get_shortcut(&self, id: &str) -> Option<&ShortcutDefinition> {
        self.definitions.iter().find(|d| d.id == id)
    }

    fn list_shortcuts(&self) -> &[ShortcutDefinition] {
        &self.definitions
    }

    fn find_by_chord(&self, chord: &KeyChord) -> Option<&ShortcutDefinition> {
        self.by_chord.get(chord).map(|&index| &self.definitions[index])
    }
}

/// Zero-argument action run when a shortcut fires.
pub type ShortcutAction = Box<dyn FnMut() + Send>;

/// Matches key events against a registry and runs bound actions.
pub struct ShortcutDispatcher {
    registry: ShortcutRegistry,
    platform: ModifierPlatform,
    bindings: HashMap<&'static str, ShortcutAction>,
}

impl ShortcutDispatcher {
    pub fn new(registry: ShortcutRegistry, platform: ModifierPlatform) -> Self {
        Self {
            registry,
            platform,
            bindings: HashMap::new(),
        }
    }

    /// Bind `action` to a registered shortcut id, replacing any earlier binding.
    pub fn bind(&mut self, id: &str, action: ShortcutAction) -> Result<(), ShortcutError> {
        let def = self
            .registry
            .get_shortcut(id)
            .ok_or_else(|| ShortcutError::NotFound(id.to_string()))?;
        self.bindings.insert(def.id, action);
        Ok(())
    }

    pub fn registry(&self) -> &ShortcutRegistry {
        &self.registry
    }

    pub fn platform(&self) -> ModifierPlatform {
        self.platform
    }

    /// Folds the raw modifier keys of `event` into a chord.
    pub fn chord_for(&self, event: &KeyEvent) -> KeyChord {
        let use_modifier = match self.platform {
            ModifierPlatform::Mac => event.meta,
            ModifierPlatform::Other => event.ctrl,
        };
        KeyChord {
            key: normalize_key(&event.key),
            use_modifier,
            shift: event.shift,
            alt: event.alt,
        }
    }

    /// Runs at most one action for `event`. Unmatched events pass through.
    pub fn dispatch(&mut self, event: &KeyEvent) -> DispatchOutcome {
        let chord = self.chord_for(event);
        let Some(def) = self.registry.find_by_chord(&chord) else {
            return DispatchOutcome::Unhandled;
        };
        let (id, prevent_default) = (def.id, def.prevent_default);

        match self.bindings.get_mut(id) {
            Some(action) => {
                debug!("shortcut {} fired", id);
                action();
            }
            None => debug!("shortcut {} matched but has no action bound", id),
        }

        DispatchOutcome::Handled {
            id,
            prevent_default,
        }
    }
}
