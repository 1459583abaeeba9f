use serde::{Deserialize, Serialize};

/// A physical key combination, with the platform command modifier already
/// folded into `use_modifier`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyChord {
    pub key: String,
    pub use_modifier: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyChord {
    pub fn new(key: &str, use_modifier: bool, shift: bool, alt: bool) -> Self {
        Self {
            key: normalize_key(key),
            use_modifier,
            shift,
            alt,
        }
    }
}

/// Single characters compare case-insensitively; named keys keep their name.
pub fn normalize_key(key: &str) -> String {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.to_lowercase().collect(),
        _ => key.to_string(),
    }
}

/// A static shortcut definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShortcutDefinition {
    pub id: &'static str,
    pub key: &'static str,
    pub use_modifier: bool,
    pub shift: bool,
    pub alt: bool,
    pub prevent_default: bool,
    pub description: &'static str,
}

impl ShortcutDefinition {
    /// Definition with no modifiers that suppresses default handling.
    pub const fn new(id: &'static str, key: &'static str, description: &'static str) -> Self {
        Self {
            id,
            key,
            use_modifier: false,
            shift: false,
            alt: false,
            prevent_default: true,
            description,
        }
    }

    pub const fn with_modifier(mut self) -> Self {
        self.use_modifier = true;
        self
    }

    pub const fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub const fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    /// Let the key reach focused inputs after the action runs.
    pub const fn allow_default(mut self) -> Self {
        self.prevent_default = false;
        self
    }

    pub fn chord(&self) -> KeyChord {
        KeyChord::new(self.key, self.use_modifier, self.shift, self.alt)
    }
}

/// Raw key-press as reported by the host, before modifier resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: String,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub meta: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub alt: bool,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }
}

/// Which physical key acts as the command modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierPlatform {
    /// Cmd (Meta) on macOS.
    Mac,
    /// Ctrl everywhere else.
    Other,
}

/// Result of feeding one key event to the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Handled {
        id: &'static str,
        prevent_default: bool,
    },
    Unhandled,
}

impl DispatchOutcome {
    pub fn is_handled(&self) -> bool {
        matches!(self, DispatchOutcome::Handled { .. })
    }

    pub fn prevent_default(&self) -> bool {
        matches!(self, DispatchOutcome::Handled { prevent_default: true, .. })
    }
}
