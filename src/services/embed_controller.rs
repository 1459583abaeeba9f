//! Embedded Service Lifecycle Controller for HubDeck.
//!
//! Tracks one remote tool surface through `unconfigured → loading →
//! {loaded, error}`. Every transition into `loading` bumps the generation;
//! load callbacks are tagged with the generation they were issued for, and a
//! callback for any other generation is dropped. A slow load from an old
//! address can therefore never overwrite the state of a newer one.

use log::{debug, warn};

use crate::types::embed::{EmbedState, EmbedView, Overlay};

/// Trait defining the lifecycle controller interface.
pub trait EmbedControllerTrait {
    fn set_source(&mut self, source_url: Option<String>) -> bool;
    fn retry(&mut self) -> bool;
    fn on_load_success(&mut self, generation: u64) -> bool;
    fn on_load_failure(&mut self, generation: u64, reason: Option<String>) -> bool;
    fn state(&self) -> EmbedState;
    fn generation(&self) -> u64;
    fn source_url(&self) -> Option<&str>;
    fn view(&self) -> EmbedView;
}

/// One embedded remote service instance.
#[derive(Debug, Clone)]
pub struct EmbedSession {
    source_url: Option<String>,
    state: EmbedState,
    generation: u64,
    placeholder_message: String,
    last_error: Option<String>,
}

impl EmbedSession {
    pub fn new(source_url: Option<String>, placeholder_message: impl Into<String>) -> Self {
        let source_url = source_url.filter(|u| !u.trim().is_empty());
        let state = if source_url.is_some() {
            EmbedState::Loading
        } else {
            EmbedState::Unconfigured
        };
        Self {
            source_url,
            state,
            generation: 0,
            placeholder_message: placeholder_message.into(),
            last_error: None,
        }
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn begin_load(&mut self) {
        self.generation += 1;
        self.state = EmbedState::Loading;
        self.last_error = None;
    }

    fn accepts(&self, generation: u64, signal: &str) -> bool {
        if generation != self.generation {
            warn!(
                "ignoring stale {} for generation {} (current {})",
                signal, generation, self.generation
            );
            return false;
        }
        if self.state != EmbedState::Loading {
            debug!("ignoring {} while {:?}", signal, self.state);
            return false;
        }
        true
    }
}

impl EmbedControllerTrait for EmbedSession {
    /// Point the session at a new address. Returns whether anything changed.
    ///
    /// A blank address counts as none. Any real change bumps the generation,
    /// including a change to none, which also invalidates in-flight loads.
    fn set_source(&mut self, source_url: Option<String>) -> bool {
        let source_url = source_url.filter(|u| !u.trim().is_empty());
        if source_url == self.source_url {
            return false;
        }

        self.source_url = source_url;
        match self.source_url {
            Some(_) => self.begin_load(),
            None => {
                self.generation += 1;
                self.state = EmbedState::Unconfigured;
                self.last_error = None;
            }
        }
        debug!(
            "embed source changed to {:?} (generation {})",
            self.source_url, self.generation
        );
        true
    }

    /// Force a clean reload of the current address. No-op while unconfigured.
    fn retry(&mut self) -> bool {
        if self.source_url.is_none() {
            return false;
        }
        self.begin_load();
        debug!("embed retry (generation {})", self.generation);
        true
    }

    fn on_load_success(&mut self, generation: u64) -> bool {
        if !self.accepts(generation, "load") {
            return false;
        }
        self.state = EmbedState::Loaded;
        true
    }

    fn on_load_failure(&mut self, generation: u64, reason: Option<String>) -> bool {
        if !self.accepts(generation, "load error") {
            return false;
        }
        self.state = EmbedState::Error;
        self.last_error = reason;
        true
    }

    fn state(&self) -> EmbedState {
        self.state
    }

    fn generation(&self) -> u64 {
        self.generation
    }

    fn source_url(&self) -> Option<&str> {
        self.source_url.as_deref()
    }

    fn view(&self) -> EmbedView {
        let Some(url) = self.source_url.clone() else {
            return EmbedView::Placeholder {
                message: self.placeholder_message.clone(),
            };
        };

        let overlay = match self.state {
            EmbedState::Loading => Overlay::Loading,
            EmbedState::Error => Overlay::Error {
                reason: self.last_error.clone(),
            },
            EmbedState::Loaded | EmbedState::Unconfigured => Overlay::None,
        };

        EmbedView::Surface {
            url,
            surface_key: format!("embed-{}", self.generation),
            overlay,
        }
    }
}
