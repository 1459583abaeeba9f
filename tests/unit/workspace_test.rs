//! Tests for the composed workspace: tabs with their embedded sessions,
//! panels with auto-hide, and shortcuts driving workspace commands.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use hubdeck::app::{Workspace, WorkspaceCommand};
use hubdeck::managers::shortcut_manager::ShortcutManagerTrait;
use hubdeck::managers::tab_manager::TabManagerTrait;
use hubdeck::services::embed_controller::EmbedControllerTrait;
use hubdeck::services::resource_service::StaticResourceService;
use hubdeck::types::embed::{EmbedState, EmbedView};
use hubdeck::types::panel::Panel;
use hubdeck::types::resource::{ResourceConfig, ResourceDescriptor};
use hubdeck::types::settings::{DashboardSettings, ThemeMode};
use hubdeck::types::shortcut::{KeyEvent, ModifierPlatform};
use hubdeck::types::tab::{AppType, OpenTabRequest, TabProps, WebViewProps};

fn settings() -> DashboardSettings {
    let mut settings = DashboardSettings::default();
    settings.services.search_url = Some("http://search.local/".to_string());
    settings.services.terminal_url = Some("http://term.local/".to_string());
    settings
}

fn workspace_with(settings: DashboardSettings, service: StaticResourceService) -> Workspace {
    Workspace::with_platform(settings, Arc::new(service), ModifierPlatform::Other)
}

fn workspace() -> Workspace {
    workspace_with(settings(), StaticResourceService::new())
}

fn weblink(id: &str, url: &str) -> ResourceDescriptor {
    ResourceDescriptor::new(id, id, ResourceConfig::parse("weblink", json!({ "url": url })))
}

// ─── Tabs and embedded sessions ───

#[test]
fn test_embedded_tool_gets_a_session() {
    let mut ws = workspace();
    let id = ws.launch_tool(AppType::Terminal);
    let session = ws.embed(&id).unwrap();
    assert_eq!(session.state(), EmbedState::Loading);
    assert_eq!(session.source_url(), Some("http://term.local/"));
}

#[test]
fn test_local_viewer_has_no_session() {
    let mut ws = workspace();
    let id = ws.launch_tool(AppType::PdfViewer);
    assert!(ws.embed(&id).is_none());
    assert!(ws.embed_view(&id).is_none());
}

#[test]
fn test_unconfigured_service_shows_placeholder() {
    let mut ws = workspace();
    let id = ws.launch_tool(AppType::SnippetStore);
    assert_eq!(ws.embed(&id).unwrap().state(), EmbedState::Unconfigured);
    assert!(matches!(ws.embed_view(&id), Some(EmbedView::Placeholder { .. })));
    assert!(!ws.retry_embed(&id));
}

#[test]
fn test_launch_tool_focuses_existing_instance() {
    let mut ws = workspace();
    let first = ws.launch_tool(AppType::Search);
    ws.launch_tool(AppType::Terminal);
    let again = ws.launch_tool(AppType::Search);
    assert_eq!(again, first);
    assert_eq!(ws.tabs().tab_count(), 2);
    assert_eq!(ws.tabs().active_tab_id(), Some(first.as_str()));
}

#[test]
fn test_query_change_reloads_search() {
    let mut ws = workspace();
    let id = ws.launch_tool(AppType::Search);
    let before = ws.embed(&id).unwrap().generation();

    ws.update_tab_props(&id, &json!({"query": "borrow checker"})).unwrap();
    let session = ws.embed(&id).unwrap();
    assert_eq!(session.generation(), before + 1);
    assert_eq!(
        session.source_url(),
        Some("http://search.local/?q=borrow+checker")
    );
    assert!(!ws.on_embed_loaded(&id, before));
    assert!(ws.on_embed_loaded(&id, before + 1));
}

#[test]
fn test_query_change_reloads_search_behind_relative_address() {
    let mut s = settings();
    s.services.search_url = Some("/searxng/search".to_string());
    let mut ws = workspace_with(s, StaticResourceService::new());
    let id = ws.launch_tool(AppType::Search);
    assert_eq!(ws.embed(&id).unwrap().source_url(), Some("/searxng/search"));

    ws.update_tab_props(&id, &json!({"query": "rust"})).unwrap();
    let session = ws.embed(&id).unwrap();
    assert_eq!(session.generation(), 1);
    assert_eq!(session.source_url(), Some("/searxng/search?q=rust"));
}

#[test]
fn test_unchanged_address_does_not_reload() {
    let mut ws = workspace();
    let id = ws.open_tab(OpenTabRequest::new(
        "Docs",
        TabProps::WebView(WebViewProps { url: "https://docs.rs".into() }),
    ));
    ws.on_embed_loaded(&id, 0);
    ws.update_tab_props(&id, &json!({"url": "https://docs.rs"})).unwrap();
    assert_eq!(ws.embed(&id).unwrap().state(), EmbedState::Loaded);
}

#[test]
fn test_failed_embed_can_be_retried() {
    let mut ws = workspace();
    let id = ws.launch_tool(AppType::Terminal);
    assert!(ws.on_embed_failed(&id, 0, Some("refused".to_string())));
    assert_eq!(ws.embed(&id).unwrap().state(), EmbedState::Error);

    assert!(ws.retry_embed(&id));
    assert_eq!(ws.embed(&id).unwrap().state(), EmbedState::Loading);
    assert_eq!(ws.embed(&id).unwrap().generation(), 1);
}

#[test]
fn test_closing_tab_drops_session() {
    let mut ws = workspace();
    let id = ws.launch_tool(AppType::Terminal);
    ws.close_tab(&id).unwrap();
    assert!(ws.embed(&id).is_none());
    assert!(!ws.on_embed_loaded(&id, 0));
}

#[test]
fn test_settings_change_repoints_embeds() {
    let mut ws = workspace();
    let id = ws.launch_tool(AppType::LogViewer);
    assert_eq!(ws.embed(&id).unwrap().state(), EmbedState::Unconfigured);

    let mut updated = settings();
    updated.services.logs_url = Some("http://logs.local/".to_string());
    ws.apply_settings(updated);
    let session = ws.embed(&id).unwrap();
    assert_eq!(session.state(), EmbedState::Loading);
    assert_eq!(session.source_url(), Some("http://logs.local/"));
}

#[test]
fn test_open_note_dedups_by_note_id() {
    let mut ws = workspace();
    let first = ws.open_note("n1", Some("journal/today.md"));
    let second = ws.open_note("n1", None);
    assert_eq!(first, second);
    assert_eq!(ws.tabs().get_tab(&first).unwrap().title, "today.md");
}

#[test]
fn test_note_opened_both_ways_shares_one_tab() {
    let mut ws = workspace();
    let note = ResourceDescriptor::new(
        "res-9",
        "Plan",
        ResourceConfig::parse("note", json!({"noteId": "n9"})),
    );
    let from_resource = ws.open_resource_as_tab(&note, None).unwrap();
    let from_hook = ws.open_note("n9", None);
    assert_eq!(from_hook, from_resource);

    let other = ws.open_note("n10", None);
    let other_resource = ResourceDescriptor::new(
        "res-10",
        "Other",
        ResourceConfig::parse("note", json!({"noteId": "n10"})),
    );
    assert_eq!(ws.open_resource_as_tab(&other_resource, None).unwrap(), other);
    assert_eq!(ws.tabs().tab_count(), 2);
}

// ─── Resources ───

#[test]
fn test_resource_open_is_deduplicated() {
    let mut ws = workspace();
    let r1 = weblink("r1", "https://example.com");
    let first = ws.open_resource_as_tab(&r1, None).unwrap();
    let second = ws.open_resource_as_tab(&r1, None).unwrap();
    assert_eq!(first, second);
    assert_eq!(ws.tabs().tab_count(), 1);
    assert_eq!(ws.embed(&first).unwrap().source_url(), Some("https://example.com"));
}

#[tokio::test]
async fn test_open_all_resources_attaches_sessions() {
    let service = StaticResourceService::new().with_grouping(
        "t1",
        vec![
            weblink("r1", "https://a.dev"),
            ResourceDescriptor::new(
                "r2",
                "Box",
                ResourceConfig::parse("ssh", json!({"host": "box", "username": "ops"})),
            ),
        ],
    );
    let mut ws = workspace_with(settings(), service);
    let ids = ws.open_all_resources_for_task("t1").await;
    assert_eq!(ids.len(), 2);
    assert_eq!(
        ws.embed(&ids[1]).unwrap().source_url(),
        Some("http://term.local/?host=box&port=22&user=ops")
    );
}

#[tokio::test]
async fn test_file_url_prefers_service_address() {
    let service = StaticResourceService::new()
        .with_file_url("docs/a.pdf", "https://cdn.local/signed/a.pdf?sig=1");
    let ws = workspace_with(settings(), service);
    assert_eq!(
        ws.file_url("docs/a.pdf").await,
        "https://cdn.local/signed/a.pdf?sig=1"
    );
}

#[tokio::test]
async fn test_file_url_falls_back_to_storage_address() {
    let ws = workspace();
    assert_eq!(
        ws.file_url("docs/b.pdf").await,
        "http://localhost:8080/api/files/docs%2Fb.pdf"
    );
}

// ─── Panels ───

#[tokio::test(start_paused = true)]
async fn test_panel_auto_hides_from_settings_timeout() {
    let mut s = settings();
    s.panels.ai_sidebar_timeout_ms = 1000;
    let mut ws = workspace_with(s, StaticResourceService::new());

    ws.open_panel(Panel::AiSidebar);
    assert!(ws.has_pending_close(Panel::AiSidebar));
    tokio::time::sleep(Duration::from_millis(700)).await;
    ws.panel_activity(Panel::AiSidebar);
    tokio::time::sleep(Duration::from_millis(700)).await;
    assert!(ws.is_panel_open(Panel::AiSidebar));

    tokio::time::sleep(Duration::from_millis(301)).await;
    assert!(!ws.is_panel_open(Panel::AiSidebar));
}

#[tokio::test(start_paused = true)]
async fn test_auto_hide_notifies_subscriber() {
    let mut s = settings();
    s.panels.terminal_panel_timeout_ms = 250;
    let mut ws = workspace_with(s, StaticResourceService::new());
    let mut closes = ws.subscribe_panel_closes();

    ws.open_panel(Panel::TerminalPanel);
    let closed = closes.recv().await;
    assert_eq!(closed, Some(Panel::TerminalPanel));
    assert!(!ws.is_panel_open(Panel::TerminalPanel));
}

#[tokio::test(start_paused = true)]
async fn test_manual_close_cancels_auto_hide() {
    let mut s = settings();
    s.panels.notes_sidebar_timeout_ms = 500;
    let mut ws = workspace_with(s, StaticResourceService::new());

    ws.toggle_panel(Panel::NotesSidebar);
    ws.toggle_panel(Panel::NotesSidebar);
    assert!(!ws.has_pending_close(Panel::NotesSidebar));
    assert!(!ws.is_panel_open(Panel::NotesSidebar));
}

#[tokio::test(start_paused = true)]
async fn test_panel_without_timeout_stays_open() {
    let mut ws = workspace();
    ws.open_panel(Panel::TerminalPanel);
    tokio::time::sleep(Duration::from_secs(600)).await;
    assert!(ws.is_panel_open(Panel::TerminalPanel));
}

// ─── Shortcuts ───

#[test]
fn test_open_settings_shortcut() {
    let mut ws = workspace();
    let outcome = ws.handle_key_event(&KeyEvent::new(",").ctrl());
    assert!(outcome.is_handled());
    assert!(outcome.prevent_default());
    assert!(ws.overlays().settings_open);
}

#[test]
fn test_escape_closes_overlays_in_order() {
    let mut ws = workspace();
    ws.handle_key_event(&KeyEvent::new(",").ctrl());
    ws.handle_key_event(&KeyEvent::new("/").ctrl());
    ws.open_panel(Panel::NotesSidebar);

    let outcome = ws.handle_key_event(&KeyEvent::new("Escape"));
    assert!(!outcome.prevent_default());
    assert!(!ws.overlays().shortcut_help_open);
    assert!(ws.overlays().settings_open);

    ws.handle_key_event(&KeyEvent::new("Escape"));
    assert!(!ws.overlays().settings_open);
    assert!(ws.is_panel_open(Panel::NotesSidebar));

    ws.handle_key_event(&KeyEvent::new("Escape"));
    assert!(!ws.is_panel_open(Panel::NotesSidebar));
}

#[test]
fn test_tool_shortcut_opens_then_focuses() {
    let mut ws = workspace();
    ws.handle_key_event(&KeyEvent::new("k").ctrl());
    ws.handle_key_event(&KeyEvent::new("t").ctrl().alt());
    ws.handle_key_event(&KeyEvent::new("K").ctrl());

    assert_eq!(ws.tabs().tab_count(), 2);
    assert_eq!(ws.tabs().get_active_tab().unwrap().app_type(), AppType::Search);
}

#[test]
fn test_panel_and_theme_shortcuts() {
    let mut ws = workspace();
    ws.handle_key_event(&KeyEvent::new("A").ctrl().shift());
    assert!(ws.is_panel_open(Panel::AiSidebar));

    ws.handle_key_event(&KeyEvent::new("d").ctrl().shift());
    assert_eq!(ws.settings().general.theme, ThemeMode::Dark);
    ws.handle_key_event(&KeyEvent::new("d").ctrl().shift());
    assert_eq!(ws.settings().general.theme, ThemeMode::Light);
}

#[test]
fn test_unbound_key_changes_nothing() {
    let mut ws = workspace();
    let outcome = ws.handle_key_event(&KeyEvent::new("q").ctrl());
    assert!(!outcome.is_handled());
    assert_eq!(ws.tabs().tab_count(), 0);
    assert!(!ws.overlays().settings_open);
}

#[test]
fn test_every_builtin_shortcut_has_a_command() {
    let ws = workspace();
    for def in ws.shortcuts().list_shortcuts() {
        assert!(WorkspaceCommand::for_shortcut(def.id).is_some(), "{} has no command", def.id);
    }
}

// ─── Lifecycle ───

#[tokio::test(start_paused = true)]
async fn test_shutdown_clears_everything() {
    let mut s = settings();
    s.panels.ai_sidebar_timeout_ms = 100;
    let mut ws = workspace_with(s, StaticResourceService::new());
    let id = ws.launch_tool(AppType::Terminal);
    ws.open_panel(Panel::AiSidebar);
    ws.apply_command(WorkspaceCommand::OpenSettings);

    ws.shutdown();
    assert_eq!(ws.tabs().tab_count(), 0);
    assert!(ws.embed(&id).is_none());
    assert!(!ws.is_panel_open(Panel::AiSidebar));
    assert!(!ws.has_pending_close(Panel::AiSidebar));
    assert!(!ws.overlays().settings_open);
}
