use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use log::debug;
use serde_json::Value;
use uuid::Uuid;

use crate::types::errors::TabError;
use crate::types::tab::{AppType, OpenTabRequest, Tab, TabProps};

/// Trait defining the tab registry interface.
pub trait TabManagerTrait {
    fn open_tab(&mut self, request: OpenTabRequest) -> String;
    fn set_active_tab(&mut self, tab_id: &str) -> Result<(), TabError>;
    fn update_tab_props(&mut self, tab_id: &str, patch: &Value) -> Result<(), TabError>;
    fn update_tab_title(&mut self, tab_id: &str, title: &str) -> Result<(), TabError>;
    fn close_tab(&mut self, tab_id: &str) -> Result<Tab, TabError>;
    fn close_other_tabs(&mut self, tab_id: &str) -> Result<Vec<Tab>, TabError>;
    fn close_all_tabs(&mut self) -> Vec<Tab>;
    fn reorder_tab(&mut self, tab_id: &str, new_index: usize) -> Result<(), TabError>;
    fn find_tab_by_resource_id(&self, resource_id: &str) -> Option<&Tab>;
    fn find_tab_by_app_type(&self, app_type: AppType) -> Option<&Tab>;
    fn find_note_tab(&self, note_id: &str) -> Option<&Tab>;
    fn get_tab(&self, tab_id: &str) -> Option<&Tab>;
    fn get_all_tabs(&self) -> &[Tab];
    fn get_active_tab(&self) -> Option<&Tab>;
    fn active_tab_id(&self) -> Option<&str>;
    fn tab_count(&self) -> usize;
}

/// In-memory registry of open tabs.
///
/// `tabs` is kept in display order. `resource_index` maps a resource id to
/// the tab opened for it, which is how at most one tab per resource is kept.
pub struct TabManager {
    tabs: Vec<Tab>,
    active_tab_id: Option<String>,
    resource_index: HashMap<String, String>,
}

impl TabManager {
    pub fn new() -> Self {
        Self {
            tabs: Vec::new(),
            active_tab_id: None,
            resource_index: HashMap::new(),
        }
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    fn find_tab_index(&self, tab_id: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == tab_id)
    }

    fn remove_at(&mut self, index: usize) -> Tab {
        let tab = self.tabs.remove(index);
        if let Some(resource_id) = &tab.resource_id {
            self.resource_index.remove(resource_id);
        }
        tab
    }

    /// Merges `patch` into the serialized props and re-reads them as the same
    /// variant, so a patch can never change the tab's tool.
    fn merge_props(props: &TabProps, patch: &Value) -> Result<TabProps, TabError> {
        let patch = patch
            .as_object()
            .ok_or_else(|| TabError::InvalidProps("patch must be a JSON object".to_string()))?;

        let mut json_value = serde_json::to_value(props)
            .map_err(|e| TabError::InvalidProps(e.to_string()))?;

        match json_value.get_mut("props") {
            Some(Value::Object(fields)) => {
                for (key, value) in patch {
                    fields.insert(key.clone(), value.clone());
                }
            }
            _ => {
                return Err(TabError::InvalidProps(
                    "serialized props are not an object".to_string(),
                ))
            }
        }

        serde_json::from_value(json_value).map_err(|e| TabError::InvalidProps(e.to_string()))
    }
}

impl Default for TabManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TabManagerTrait for TabManager {
    /// Opens a tab and focuses it. A request carrying a resource id that is
    /// already open focuses the existing tab and returns its id instead.
    fn open_tab(&mut self, request: OpenTabRequest) -> String {
        if let Some(resource_id) = &request.resource_id {
            if let Some(existing) = self.resource_index.get(resource_id).cloned() {
                debug!("resource {} already open in tab {}", resource_id, existing);
                self.active_tab_id = Some(existing.clone());
                return existing;
            }
        }

        let id = Uuid::new_v4().to_string();
        if let Some(resource_id) = &request.resource_id {
            self.resource_index.insert(resource_id.clone(), id.clone());
        }
        debug!("open tab {} ({:?})", id, request.props.app_type());
        self.tabs.push(Tab {
            id: id.clone(),
            title: request.title,
            props: request.props,
            resource_id: request.resource_id,
            external_task_id: request.external_task_id,
            created_at: Self::now(),
        });
        self.active_tab_id = Some(id.clone());
        id
    }

    /// Focus a tab. Order is left untouched.
    fn set_active_tab(&mut self, tab_id: &str) -> Result<(), TabError> {
        if self.find_tab_index(tab_id).is_none() {
            return Err(TabError::NotFound(tab_id.to_string()));
        }
        self.active_tab_id = Some(tab_id.to_string());
        Ok(())
    }

    /// Shallow-merge `patch` into the tab's props. Focus is left untouched.
    fn update_tab_props(&mut self, tab_id: &str, patch: &Value) -> Result<(), TabError> {
        let tab = self
            .tabs
            .iter_mut()
            .find(|t| t.id == tab_id)
            .ok_or_else(|| TabError::NotFound(tab_id.to_string()))?;
        tab.props = Self::merge_props(&tab.props, patch)?;
        Ok(())
    }

    fn update_tab_title(&mut self, tab_id: &str, title: &str) -> Result<(), TabError> {
        let tab = self
            .tabs
            .iter_mut()
            .find(|t| t.id == tab_id)
            .ok_or_else(|| TabError::NotFound(tab_id.to_string()))?;
        tab.title = title.to_string();
        Ok(())
    }

    /// Close a tab. If it was focused, focus moves to the tab that takes its
    /// place (right neighbour), else the left neighbour, else nothing.
    fn close_tab(&mut self, tab_id: &str) -> Result<Tab, TabError> {
        let index = self
            .find_tab_index(tab_id)
            .ok_or_else(|| TabError::NotFound(tab_id.to_string()))?;

        let need_switch = self.active_tab_id.as_deref() == Some(tab_id);
        let closed = self.remove_at(index);

        if need_switch {
            self.active_tab_id = if self.tabs.is_empty() {
                None
            } else {
                let next = index.min(self.tabs.len() - 1);
                Some(self.tabs[next].id.clone())
            };
        }

        debug!("closed tab {}; active is now {:?}", tab_id, self.active_tab_id);
        Ok(closed)
    }

    /// Close every tab except `tab_id`, which becomes focused.
    fn close_other_tabs(&mut self, tab_id: &str) -> Result<Vec<Tab>, TabError> {
        if self.find_tab_index(tab_id).is_none() {
            return Err(TabError::NotFound(tab_id.to_string()));
        }

        let (kept, closed): (Vec<Tab>, Vec<Tab>) =
            self.tabs.drain(..).partition(|t| t.id == tab_id);
        self.tabs = kept;
        for tab in &closed {
            if let Some(resource_id) = &tab.resource_id {
                self.resource_index.remove(resource_id);
            }
        }
        self.active_tab_id = Some(tab_id.to_string());
        Ok(closed)
    }

    fn close_all_tabs(&mut self) -> Vec<Tab> {
        self.resource_index.clear();
        self.active_tab_id = None;
        std::mem::take(&mut self.tabs)
    }

    /// Move a tab to a new position in the tab bar.
    fn reorder_tab(&mut self, tab_id: &str, new_index: usize) -> Result<(), TabError> {
        let index = self
            .find_tab_index(tab_id)
            .ok_or_else(|| TabError::NotFound(tab_id.to_string()))?;

        if new_index >= self.tabs.len() {
            return Err(TabError::InvalidIndex(new_index));
        }

        let tab = self.tabs.remove(index);
        self.tabs.insert(new_index, tab);
        Ok(())
    }

    fn find_tab_by_resource_id(&self, resource_id: &str) -> Option<&Tab> {
        self.resource_index
            .get(resource_id)
            .and_then(|id| self.get_tab(id))
    }

    /// First open tab of the given tool that was not opened for a resource.
    fn find_tab_by_app_type(&self, app_type: AppType) -> Option<&Tab> {
        self.tabs
            .iter()
            .find(|t| t.app_type() == app_type && t.resource_id.is_none())
    }

    /// The note viewer showing `note_id`, however it was opened.
    fn find_note_tab(&self, note_id: &str) -> Option<&Tab> {
        self.tabs
            .iter()
            .find(|t| matches!(&t.props, TabProps::NoteViewer(p) if p.note_id == note_id))
    }

    fn get_tab(&self, tab_id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == tab_id)
    }

    fn get_all_tabs(&self) -> &[Tab] {
        &self.tabs
    }

    fn get_active_tab(&self) -> Option<&Tab> {
        self.active_tab_id
            .as_ref()
            .and_then(|id| self.get_tab(id))
    }

    fn active_tab_id(&self) -> Option<&str> {
        self.active_tab_id.as_deref()
    }

    fn tab_count(&self) -> usize {
        self.tabs.len()
    }
}
