//! Workspace core for HubDeck.
//!
//! `Workspace` is the composition root: it owns the tab registry, the
//! embedded-service sessions of open tabs, panel flags and their auto-hide
//! timers, the shortcut dispatcher and the overlay state. It is created at
//! workspace start and torn down with [`Workspace::shutdown`].

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, warn};
use reqwest::Url;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::managers::autohide_manager::{AutoHideManager, AutoHideManagerTrait};
use crate::managers::shortcut_manager::{
    self, ShortcutDispatcher, ShortcutManagerTrait, ShortcutRegistry,
};
use crate::managers::tab_manager::{TabManager, TabManagerTrait};
use crate::platform;
use crate::services::embed_controller::{EmbedControllerTrait, EmbedSession};
use crate::services::file_resolver::StorageUrlResolver;
use crate::services::resource_resolver::ResourceResolver;
use crate::services::resource_service::ResourceService;
use crate::types::embed::EmbedView;
use crate::types::errors::TabError;
use crate::types::panel::{Panel, PanelFlags};
use crate::types::resource::ResourceDescriptor;
use crate::types::settings::{DashboardSettings, ServiceSettings};
use crate::types::shortcut::{DispatchOutcome, KeyEvent, ModifierPlatform};
use crate::types::tab::{AppType, NoteProps, OpenTabRequest, Tab, TabProps};

/// Things a shortcut can ask the workspace to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceCommand {
    CloseOverlay,
    OpenSettings,
    ShowShortcuts,
    TogglePanel(Panel),
    LaunchTool(AppType),
    ToggleTheme,
}

impl WorkspaceCommand {
    /// The command bound to a built-in shortcut id.
    pub fn for_shortcut(id: &str) -> Option<Self> {
        let command = match id {
            shortcut_manager::CLOSE_OVERLAY => WorkspaceCommand::CloseOverlay,
            shortcut_manager::OPEN_SETTINGS => WorkspaceCommand::OpenSettings,
            shortcut_manager::SHOW_SHORTCUTS => WorkspaceCommand::ShowShortcuts,
            shortcut_manager::TOGGLE_AI_SIDEBAR => WorkspaceCommand::TogglePanel(Panel::AiSidebar),
            shortcut_manager::TOGGLE_NOTES_SIDEBAR => {
                WorkspaceCommand::TogglePanel(Panel::NotesSidebar)
            }
            shortcut_manager::TOGGLE_TERMINAL_PANEL => {
                WorkspaceCommand::TogglePanel(Panel::TerminalPanel)
            }
            shortcut_manager::OPEN_TERMINAL => WorkspaceCommand::LaunchTool(AppType::Terminal),
            shortcut_manager::OPEN_SEARCH => WorkspaceCommand::LaunchTool(AppType::Search),
            shortcut_manager::OPEN_SNIPPETS => WorkspaceCommand::LaunchTool(AppType::SnippetStore),
            shortcut_manager::OPEN_LOGS => WorkspaceCommand::LaunchTool(AppType::LogViewer),
            shortcut_manager::OPEN_AI_CHAT => WorkspaceCommand::LaunchTool(AppType::AiChat),
            shortcut_manager::TOGGLE_THEME => WorkspaceCommand::ToggleTheme,
            _ => return None,
        };
        Some(command)
    }
}

/// Modal overlays that are not auto-hide panels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OverlayState {
    pub settings_open: bool,
    pub shortcut_help_open: bool,
}

pub struct Workspace {
    tabs: TabManager,
    embeds: HashMap<String, EmbedSession>,
    resolver: ResourceResolver,
    resource_service: Arc<dyn ResourceService>,
    panels: Arc<PanelFlags>,
    autohide: AutoHideManager,
    dispatcher: ShortcutDispatcher,
    commands: UnboundedReceiver<WorkspaceCommand>,
    overlays: OverlayState,
    settings: DashboardSettings,
}

impl Workspace {
    /// Creates a workspace with an empty tab set, using this platform's
    /// command modifier.
    pub fn new(settings: DashboardSettings, resource_service: Arc<dyn ResourceService>) -> Self {
        Self::with_platform(settings, resource_service, platform::modifier_platform())
    }

    pub fn with_platform(
        settings: DashboardSettings,
        resource_service: Arc<dyn ResourceService>,
        modifier_platform: ModifierPlatform,
    ) -> Self {
        let panels = Arc::new(PanelFlags::new());
        let mut autohide = AutoHideManager::new(Arc::clone(&panels));
        for panel in Panel::ALL {
            autohide.set_timeout(panel, settings.panels.timeout_ms(panel));
        }

        let (tx, commands) = mpsc::unbounded_channel();
        let mut dispatcher = ShortcutDispatcher::new(ShortcutRegistry::default(), modifier_platform);
        let ids: Vec<&'static str> = dispatcher
            .registry()
            .list_shortcuts()
            .iter()
            .map(|d| d.id)
            .collect();
        for id in ids {
            let Some(command) = WorkspaceCommand::for_shortcut(id) else {
                continue;
            };
            let tx = tx.clone();
            let bound = dispatcher.bind(
                id,
                Box::new(move || {
                    let _ = tx.send(command);
                }),
            );
            if let Err(e) = bound {
                warn!("could not bind shortcut {}: {}", id, e);
            }
        }

        Self {
            tabs: TabManager::new(),
            embeds: HashMap::new(),
            resolver: ResourceResolver::new(Arc::new(StorageUrlResolver::new(
                settings.services.file_base_url.clone(),
            ))),
            resource_service,
            panels,
            autohide,
            dispatcher,
            commands,
            overlays: OverlayState::default(),
            settings,
        }
    }

    // ─── Tabs ───

    pub fn tabs(&self) -> &TabManager {
        &self.tabs
    }

    pub fn open_tab(&mut self, request: OpenTabRequest) -> String {
        let id = self.tabs.open_tab(request);
        self.sync_embed(&id);
        id
    }

    pub fn set_active_tab(&mut self, tab_id: &str) -> Result<(), TabError> {
        self.tabs.set_active_tab(tab_id)
    }

    /// Patch a tab's props; an embedded tool is re-pointed if its address changed.
    pub fn update_tab_props(&mut self, tab_id: &str, patch: &Value) -> Result<(), TabError> {
        self.tabs.update_tab_props(tab_id, patch)?;
        self.sync_embed(tab_id);
        Ok(())
    }

    pub fn close_tab(&mut self, tab_id: &str) -> Result<Tab, TabError> {
        let closed = self.tabs.close_tab(tab_id)?;
        self.embeds.remove(tab_id);
        Ok(closed)
    }

    pub fn close_all_tabs(&mut self) -> Vec<Tab> {
        self.embeds.clear();
        self.tabs.close_all_tabs()
    }

    /// Focus the open instance of a tool, or open one with default props.
    pub fn launch_tool(&mut self, app_type: AppType) -> String {
        if let Some(existing) = self.tabs.find_tab_by_app_type(app_type) {
            let id = existing.id.clone();
            let _ = self.tabs.set_active_tab(&id);
            return id;
        }
        self.open_tab(OpenTabRequest::launch(app_type))
    }

    /// Open a note in the note viewer, one tab per note. A tab already
    /// showing the note, including one opened for a note resource, is focused.
    pub fn open_note(&mut self, note_id: &str, note_path: Option<&str>) -> String {
        if let Some(existing) = self.tabs.find_note_tab(note_id) {
            let id = existing.id.clone();
            let _ = self.tabs.set_active_tab(&id);
            return id;
        }
        let title = note_path
            .and_then(|p| p.rsplit('/').next())
            .filter(|name| !name.is_empty())
            .unwrap_or(note_id)
            .to_string();
        let props = TabProps::NoteViewer(NoteProps {
            note_id: note_id.to_string(),
            note_path: note_path.map(str::to_string),
        });
        self.open_tab(OpenTabRequest::new(title, props).with_resource(format!("note:{}", note_id)))
    }

    // ─── Resources ───

    pub fn open_resource_as_tab(
        &mut self,
        resource: &ResourceDescriptor,
        external_task_id: Option<&str>,
    ) -> Option<String> {
        let id = self
            .resolver
            .open_resource_as_tab(&mut self.tabs, resource, external_task_id)?;
        self.sync_embed(&id);
        Some(id)
    }

    pub async fn open_all_resources_for_task(&mut self, task_id: &str) -> Vec<String> {
        let service = Arc::clone(&self.resource_service);
        let ids = self
            .resolver
            .open_all_resources_for_task(&mut self.tabs, service.as_ref(), task_id)
            .await;
        for id in &ids {
            self.sync_embed(id);
        }
        ids
    }

    /// Viewer address for a stored file. The resource service may hand out a
    /// signed address; when it cannot, the direct storage address is used.
    pub async fn file_url(&self, key: &str) -> String {
        match self.resource_service.fetch_file_url(key).await {
            Ok(url) => url,
            Err(e) => {
                warn!("file url for {} unavailable ({}), using storage address", key, e);
                self.resolver.storage_url(key)
            }
        }
    }

    // ─── Embedded services ───

    pub fn embed(&self, tab_id: &str) -> Option<&EmbedSession> {
        self.embeds.get(tab_id)
    }

    pub fn embed_view(&self, tab_id: &str) -> Option<EmbedView> {
        self.embeds.get(tab_id).map(|s| s.view())
    }

    pub fn on_embed_loaded(&mut self, tab_id: &str, generation: u64) -> bool {
        self.embeds
            .get_mut(tab_id)
            .is_some_and(|s| s.on_load_success(generation))
    }

    pub fn on_embed_failed(&mut self, tab_id: &str, generation: u64, reason: Option<String>) -> bool {
        self.embeds
            .get_mut(tab_id)
            .is_some_and(|s| s.on_load_failure(generation, reason))
    }

    pub fn retry_embed(&mut self, tab_id: &str) -> bool {
        self.embeds.get_mut(tab_id).is_some_and(|s| s.retry())
    }

    /// Create or re-point the session of an embedded tool tab.
    fn sync_embed(&mut self, tab_id: &str) {
        let Some(tab) = self.tabs.get_tab(tab_id) else {
            return;
        };
        if !tab.app_type().is_embedded() {
            return;
        }

        let source = embed_source(&self.settings.services, &tab.props);
        match self.embeds.get_mut(tab_id) {
            Some(session) => {
                session.set_source(source);
            }
            None => {
                let message = placeholder_message(tab.app_type());
                debug!("attaching embed session to tab {}", tab_id);
                self.embeds
                    .insert(tab_id.to_string(), EmbedSession::new(source, message));
            }
        }
    }

    // ─── Panels ───

    pub fn panels(&self) -> Arc<PanelFlags> {
        Arc::clone(&self.panels)
    }

    pub fn is_panel_open(&self, panel: Panel) -> bool {
        self.panels.is_open(panel)
    }

    pub fn open_panel(&mut self, panel: Panel) {
        if !self.panels.set_open(panel, true) {
            self.autohide.arm_on_open(panel);
        }
    }

    pub fn close_panel(&mut self, panel: Panel) {
        self.panels.set_open(panel, false);
        self.autohide.disarm_on_close(panel);
    }

    pub fn toggle_panel(&mut self, panel: Panel) {
        if self.panels.is_open(panel) {
            self.close_panel(panel);
        } else {
            self.open_panel(panel);
        }
    }

    /// User activity inside an open panel extends its auto-hide window.
    pub fn panel_activity(&mut self, panel: Panel) {
        if self.panels.is_open(panel) {
            self.autohide.reset_timer(panel);
        }
    }

    pub fn has_pending_close(&self, panel: Panel) -> bool {
        self.autohide.has_pending_close(panel)
    }

    /// Receiver of panels closed by auto-hide, for hosts that render panel
    /// state themselves. A later call replaces the earlier receiver.
    pub fn subscribe_panel_closes(&mut self) -> UnboundedReceiver<Panel> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.autohide.set_close_notifier(tx);
        rx
    }

    // ─── Keyboard ───

    /// Feed one key-press through the shortcut dispatcher and apply whatever
    /// the fired action asked for.
    pub fn handle_key_event(&mut self, event: &KeyEvent) -> DispatchOutcome {
        let outcome = self.dispatcher.dispatch(event);
        while let Ok(command) = self.commands.try_recv() {
            self.apply_command(command);
        }
        outcome
    }

    pub fn shortcuts(&self) -> &ShortcutRegistry {
        self.dispatcher.registry()
    }

    pub fn apply_command(&mut self, command: WorkspaceCommand) {
        debug!("workspace command {:?}", command);
        match command {
            WorkspaceCommand::CloseOverlay => self.close_topmost_overlay(),
            WorkspaceCommand::OpenSettings => self.overlays.settings_open = true,
            WorkspaceCommand::ShowShortcuts => self.overlays.shortcut_help_open = true,
            WorkspaceCommand::TogglePanel(panel) => self.toggle_panel(panel),
            WorkspaceCommand::LaunchTool(app_type) => {
                self.launch_tool(app_type);
            }
            WorkspaceCommand::ToggleTheme => {
                self.settings.general.theme = self.settings.general.theme.toggled();
            }
        }
    }

    /// Help overlay first, then settings, then the first open panel.
    fn close_topmost_overlay(&mut self) {
        if self.overlays.shortcut_help_open {
            self.overlays.shortcut_help_open = false;
        } else if self.overlays.settings_open {
            self.overlays.settings_open = false;
        } else if let Some(panel) = self.panels.open_panels().into_iter().next() {
            self.close_panel(panel);
        }
    }

    pub fn overlays(&self) -> &OverlayState {
        &self.overlays
    }

    // ─── Settings & lifecycle ───

    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    /// Replace settings. New timeouts apply from the next arm or reset;
    /// embedded tools follow changed service addresses immediately.
    pub fn apply_settings(&mut self, settings: DashboardSettings) {
        for panel in Panel::ALL {
            self.autohide.set_timeout(panel, settings.panels.timeout_ms(panel));
        }
        if settings.services.file_base_url != self.settings.services.file_base_url {
            self.resolver = ResourceResolver::new(Arc::new(StorageUrlResolver::new(
                settings.services.file_base_url.clone(),
            )));
        }
        self.settings = settings;

        let ids: Vec<String> = self.embeds.keys().cloned().collect();
        for id in ids {
            self.sync_embed(&id);
        }
    }

    /// Tear down: cancel timers, close panels and overlays, drop all tabs.
    pub fn shutdown(&mut self) {
        self.autohide.disarm_all();
        for panel in Panel::ALL {
            self.panels.set_open(panel, false);
        }
        self.overlays = OverlayState::default();
        self.close_all_tabs();
    }
}

/// Address an embedded tool should load, derived from settings and props.
fn embed_source(services: &ServiceSettings, props: &TabProps) -> Option<String> {
    match props {
        TabProps::WebView(p) => Some(p.url.clone()),
        TabProps::Search(p) => {
            let base = services.search_url.as_deref()?;
            let pairs = if p.query.trim().is_empty() {
                Vec::new()
            } else {
                vec![("q", p.query.clone())]
            };
            Some(with_query(base, &pairs))
        }
        TabProps::Terminal(p) => {
            let base = services.terminal_url.as_deref()?;
            let mut pairs = Vec::new();
            if let Some(connection_id) = &p.connection_id {
                pairs.push(("connection", connection_id.clone()));
            } else if let Some(host) = &p.host {
                pairs.push(("host", host.clone()));
                if let Some(port) = p.port {
                    pairs.push(("port", port.to_string()));
                }
                if let Some(username) = &p.username {
                    pairs.push(("user", username.clone()));
                }
            }
            Some(with_query(base, &pairs))
        }
        TabProps::SnippetStore(p) => {
            let base = services.snippets_url.as_deref()?;
            let pairs: Vec<_> = p.snippet_id.iter().map(|id| ("snippet", id.clone())).collect();
            Some(with_query(base, &pairs))
        }
        TabProps::LogViewer(p) => {
            let base = services.logs_url.as_deref()?;
            let pairs: Vec<_> = p.source.iter().map(|s| ("source", s.clone())).collect();
            Some(with_query(base, &pairs))
        }
        _ => None,
    }
}

fn with_query(base: &str, pairs: &[(&str, String)]) -> String {
    if pairs.is_empty() {
        return base.to_string();
    }
    match Url::parse(base) {
        Ok(mut url) => {
            url.query_pairs_mut()
                .extend_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())));
            url.to_string()
        }
        Err(_) => with_relative_query(base, pairs),
    }
}

/// Relative addresses (e.g. behind a reverse proxy) keep their path as
/// written; the pairs are form-encoded and appended before any fragment.
fn with_relative_query(base: &str, pairs: &[(&str, String)]) -> String {
    let Some(query) = encode_pairs(pairs) else {
        return base.to_string();
    };
    let (head, fragment) = match base.split_once('#') {
        Some((head, fragment)) => (head, Some(fragment)),
        None => (base, None),
    };
    let separator = match head.find('?') {
        None => "?",
        Some(_) if head.ends_with('?') || head.ends_with('&') => "",
        Some(_) => "&",
    };
    let mut out = format!("{}{}{}", head, separator, query);
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

fn encode_pairs(pairs: &[(&str, String)]) -> Option<String> {
    let mut scratch = Url::parse("http://localhost/").ok()?;
    scratch
        .query_pairs_mut()
        .extend_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())));
    scratch.query().map(str::to_string)
}

fn placeholder_message(app_type: AppType) -> String {
    match app_type {
        AppType::WebView => "No address to show yet.".to_string(),
        other => format!(
            "{} is not configured. Set its address in settings.",
            other.display_name()
        ),
    }
}
