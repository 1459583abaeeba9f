//! Auto-hide timers for overlay panels.
//!
//! The manager owns only scheduling. Panel open flags live in [`PanelFlags`],
//! which the workspace owns; a timer that fires flips the flag to closed.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, warn};
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::types::panel::{Panel, PanelFlags};

/// Trait defining the auto-hide timer interface.
pub trait AutoHideManagerTrait {
    fn arm_on_open(&mut self, panel: Panel);
    fn disarm_on_close(&mut self, panel: Panel);
    fn reset_timer(&mut self, panel: Panel);
    fn set_timeout(&mut self, panel: Panel, timeout_ms: i64);
    fn timeout_ms(&self, panel: Panel) -> i64;
    fn has_pending_close(&self, panel: Panel) -> bool;
    fn disarm_all(&mut self);
    fn set_close_notifier(&mut self, notifier: UnboundedSender<Panel>);
}

/// Epoch of the currently scheduled close per panel. A panel is absent when
/// nothing is scheduled.
type ScheduleEpochs = Arc<Mutex<HashMap<Panel, u64>>>;

/// Tokio-backed auto-hide scheduler.
pub struct AutoHideManager {
    panels: Arc<PanelFlags>,
    timeouts: HashMap<Panel, i64>,
    tasks: HashMap<Panel, JoinHandle<()>>,
    epochs: ScheduleEpochs,
    next_epoch: u64,
    notifier: Option<UnboundedSender<Panel>>,
}

impl AutoHideManager {
    pub fn new(panels: Arc<PanelFlags>) -> Self {
        Self {
            panels,
            timeouts: HashMap::new(),
            tasks: HashMap::new(),
            epochs: Arc::new(Mutex::new(HashMap::new())),
            next_epoch: 0,
            notifier: None,
        }
    }

    fn lock_epochs(epochs: &ScheduleEpochs) -> std::sync::MutexGuard<'_, HashMap<Panel, u64>> {
        epochs.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn cancel(&mut self, panel: Panel) {
        Self::lock_epochs(&self.epochs).remove(&panel);
        if let Some(task) = self.tasks.remove(&panel) {
            task.abort();
        }
    }

    /// Cancel, then schedule a fresh close if the panel has a positive timeout.
    fn schedule(&mut self, panel: Panel) {
        self.cancel(panel);

        let timeout_ms = self.timeout_ms(panel);
        if timeout_ms <= 0 {
            return;
        }

        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!("no async runtime; auto-hide for {:?} not scheduled", panel);
                return;
            }
        };

        self.next_epoch += 1;
        let epoch = self.next_epoch;
        Self::lock_epochs(&self.epochs).insert(panel, epoch);

        let epochs = Arc::clone(&self.epochs);
        let panels = Arc::clone(&self.panels);
        let notifier = self.notifier.clone();
        let delay = Duration::from_millis(timeout_ms as u64);

        let task = handle.spawn(async move {
            tokio::time::sleep(delay).await;
            let mut current = Self::lock_epochs(&epochs);
            if current.get(&panel) == Some(&epoch) {
                current.remove(&panel);
                let was_open = panels.set_open(panel, false);
                debug!("auto-hid {:?} after {:?}", panel, delay);
                if was_open {
                    if let Some(notifier) = &notifier {
                        let _ = notifier.send(panel);
                    }
                }
            }
        });
        self.tasks.insert(panel, task);
    }
}

impl AutoHideManagerTrait for AutoHideManager {
    /// Called when the panel's open flag turns true.
    fn arm_on_open(&mut self, panel: Panel) {
        self.schedule(panel);
    }

    /// Called when the panel's open flag turns false, by any means.
    fn disarm_on_close(&mut self, panel: Panel) {
        self.cancel(panel);
    }

    /// Activity inside the panel: restart the countdown.
    fn reset_timer(&mut self, panel: Panel) {
        self.schedule(panel);
    }

    /// Takes effect on the next arm or reset; a pending close keeps its deadline.
    fn set_timeout(&mut self, panel: Panel, timeout_ms: i64) {
        self.timeouts.insert(panel, timeout_ms);
    }

    fn timeout_ms(&self, panel: Panel) -> i64 {
        self.timeouts.get(&panel).copied().unwrap_or(0)
    }

    fn has_pending_close(&self, panel: Panel) -> bool {
        Self::lock_epochs(&self.epochs).contains_key(&panel)
    }

    fn disarm_all(&mut self) {
        for panel in Panel::ALL {
            self.cancel(panel);
        }
    }

    /// Panels closed by a firing timer are reported here. Closes made by
    /// the caller are not.
    fn set_close_notifier(&mut self, notifier: UnboundedSender<Panel>) {
        self.notifier = Some(notifier);
    }
}

impl Drop for AutoHideManager {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}
