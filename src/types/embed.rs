use serde::{Deserialize, Serialize};

/// Lifecycle state of an embedded remote service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmbedState {
    Unconfigured,
    Loading,
    Loaded,
    Error,
}

/// Overlay drawn on top of the embedded surface.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Overlay {
    None,
    /// Non-blocking spinner; the surface is visible underneath.
    Loading,
    /// Blocking error panel with a retry action; the surface is hidden.
    Error { reason: Option<String> },
}

/// What the host should render for an embedded service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "render", rename_all = "lowercase")]
pub enum EmbedView {
    /// No address configured: no frame is created and nothing is fetched.
    Placeholder { message: String },
    /// A frame pointed at `url`. Hosts key the frame on `surface_key`, so a
    /// new key means the old frame is torn down and a fresh one is created.
    Surface {
        url: String,
        surface_key: String,
        overlay: Overlay,
    },
}
