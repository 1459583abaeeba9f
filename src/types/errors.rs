use thiserror::Error;

// === TabError ===

/// Errors related to tab registry operations.
#[derive(Debug, Error)]
pub enum TabError {
    /// Tab with the given ID was not found.
    #[error("Tab not found: {0}")]
    NotFound(String),
    /// The provided tab index is out of bounds.
    #[error("Invalid tab index: {0}")]
    InvalidIndex(usize),
    /// A prop patch does not fit the shape of the tab's tool.
    #[error("Invalid tab props: {0}")]
    InvalidProps(String),
}

// === ShortcutError ===

/// Errors related to keyboard shortcut registration and binding.
#[derive(Debug, Error)]
pub enum ShortcutError {
    /// No shortcut with the given id is registered.
    #[error("Shortcut not found: {0}")]
    NotFound(String),
    /// The key chord is already taken by another shortcut.
    #[error("Shortcut conflict: {0}")]
    Conflict(String),
    /// The key of a definition is empty or otherwise unusable.
    #[error("Invalid shortcut key: {0}")]
    InvalidKey(String),
}

// === ResourceError ===

/// Errors raised by a resource fetch service.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The request could not be sent or the connection failed.
    #[error("Resource network error: {0}")]
    Network(String),
    /// The service answered with a non-success status.
    #[error("Resource service returned status {0}")]
    Status(u16),
    /// The response body could not be decoded.
    #[error("Resource decode error: {0}")]
    Decode(String),
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    #[error("Settings I/O error: {0}")]
    IoError(String),
    /// Failed to serialize or deserialize settings.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    /// The provided settings key is invalid.
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    /// The provided settings value is invalid.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}
