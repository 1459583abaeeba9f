//! HubDeck — workspace core of a multi-service dashboard.
//!
//! Entry point: runs a console demo of the workspace core against an
//! in-memory resource service. The dashboard shell talks to `hubdeck-rpc`.

use std::sync::Arc;
use std::time::Duration;

use hubdeck::app::Workspace;
use hubdeck::logging;
use hubdeck::managers::shortcut_manager::ShortcutManagerTrait;
use hubdeck::managers::tab_manager::TabManagerTrait;
use hubdeck::services::embed_controller::EmbedControllerTrait;
use hubdeck::services::resource_service::StaticResourceService;
use hubdeck::types::panel::Panel;
use hubdeck::types::resource::{ResourceConfig, ResourceDescriptor};
use hubdeck::types::settings::DashboardSettings;
use hubdeck::types::shortcut::{KeyEvent, ModifierPlatform};
use hubdeck::types::tab::AppType;
use serde_json::json;

#[tokio::main]
async fn main() {
    logging::init_from_env();
    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                 HubDeck v{} — Demo Mode                  ║", env!("CARGO_PKG_VERSION"));
    println!("║          Workspace core of a multi-service dashboard         ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let mut workspace = demo_workspace();
    demo_tabs(&mut workspace);
    demo_resources(&mut workspace).await;
    demo_embeds(&mut workspace);
    demo_shortcuts(&mut workspace);
    demo_panels(&mut workspace).await;

    workspace.shutdown();
    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("  ✅ Workspace core demonstrated, {} tabs left after shutdown", workspace.tabs().tab_count());
    println!("═══════════════════════════════════════════════════════════════");
}

fn section(name: &str) {
    println!("───────────────────────────────────────────────────────────────");
    println!("  📦 {}", name);
    println!("───────────────────────────────────────────────────────────────");
}

fn descriptor(id: &str, resource_type: &str, title: &str, config: serde_json::Value) -> ResourceDescriptor {
    ResourceDescriptor::new(id, title, ResourceConfig::parse(resource_type, config))
}

fn demo_workspace() -> Workspace {
    let mut settings = DashboardSettings::default();
    settings.services.search_url = Some("http://localhost:7700/search".to_string());
    settings.services.terminal_url = Some("http://localhost:7681/".to_string());
    settings.panels.ai_sidebar_timeout_ms = 200;

    let service = StaticResourceService::new().with_grouping(
        "task-42",
        vec![
            descriptor("r1", "weblink", "Docs", json!({"url": "https://docs.rs"})),
            descriptor("r2", "pdf", "Data sheet", json!({"storageKey": "sheets/board.pdf", "originalName": "board.pdf"})),
            descriptor("r3", "hologram", "Unknown", json!({})),
            descriptor("r4", "ssh", "Build box", json!({"host": "build.local", "username": "ci"})),
        ],
    );
    Workspace::with_platform(settings, Arc::new(service), ModifierPlatform::Other)
}

fn demo_tabs(ws: &mut Workspace) {
    section("Tab Registry");

    let search = ws.launch_tool(AppType::Search);
    let again = ws.launch_tool(AppType::Search);
    println!("  Launched search twice, same tab = {}", search == again);

    ws.update_tab_props(&search, &json!({"query": "tokio select"})).unwrap();
    let tab = ws.tabs().get_tab(&search).unwrap();
    println!("  Search tab props: {}", serde_json::to_string(&tab.props).unwrap());

    let bad = ws.update_tab_props(&search, &json!({"url": 3}));
    println!("  Foreign prop rejected: {}", bad.unwrap_err());

    let note = ws.open_note("n-7", Some("journal/2024-05-01.md"));
    println!("  Opened note tab titled '{}'", ws.tabs().get_tab(&note).unwrap().title);
    ws.close_tab(&note).unwrap();
    println!("  Closed note, active = {:?}", ws.tabs().get_active_tab().map(|t| t.title.as_str()));
    println!("  ✓ Tabs OK");
    println!();
}

async fn demo_resources(ws: &mut Workspace) {
    section("Resource Resolver");

    let opened = ws.open_all_resources_for_task("task-42").await;
    println!("  Opened {} tabs for task-42 (unknown types skipped)", opened.len());
    for id in &opened {
        let tab = ws.tabs().get_tab(id).unwrap();
        println!("    {:<12} {:?}", tab.title, tab.app_type());
    }

    let again = ws.open_all_resources_for_task("task-42").await;
    println!("  Reopening focuses existing tabs: {}", again == opened);
    println!("  Tab count: {}", ws.tabs().tab_count());
    println!("  ✓ Resources OK");
    println!();
}

fn demo_embeds(ws: &mut Workspace) {
    section("Embedded Services");

    let search = ws.launch_tool(AppType::Search);
    let generation = ws.embed(&search).unwrap().generation();
    println!("  Search view: {}", serde_json::to_string(&ws.embed_view(&search).unwrap()).unwrap());

    ws.update_tab_props(&search, &json!({"query": "serde flatten"})).unwrap();
    let stale = ws.on_embed_loaded(&search, generation);
    println!("  Load signal for old address accepted: {}", stale);

    let current = ws.embed(&search).unwrap().generation();
    ws.on_embed_failed(&search, current, Some("connection refused".to_string()));
    println!("  After failure: {:?}", ws.embed(&search).unwrap().state());

    ws.retry_embed(&search);
    let current = ws.embed(&search).unwrap().generation();
    ws.on_embed_loaded(&search, current);
    println!("  After retry + load: {:?} (generation {})", ws.embed(&search).unwrap().state(), current);

    let logs = ws.launch_tool(AppType::LogViewer);
    println!("  Log viewer without address: {}", serde_json::to_string(&ws.embed_view(&logs).unwrap()).unwrap());
    println!("  ✓ Embeds OK");
    println!();
}

fn demo_shortcuts(ws: &mut Workspace) {
    section("Shortcuts");

    println!("  {} shortcuts registered", ws.shortcuts().list_shortcuts().len());
    let outcome = ws.handle_key_event(&KeyEvent::new(",").ctrl());
    println!("  Ctrl+, → {:?}, settings open = {}", outcome, ws.overlays().settings_open);

    let outcome = ws.handle_key_event(&KeyEvent::new("Escape"));
    println!("  Escape → prevent_default = {}, settings open = {}", outcome.prevent_default(), ws.overlays().settings_open);

    let outcome = ws.handle_key_event(&KeyEvent::new("q").ctrl());
    println!("  Ctrl+Q → {:?}", outcome);

    let theme = ws.settings().general.theme;
    ws.handle_key_event(&KeyEvent::new("D").ctrl().shift());
    println!("  Theme {:?} → {:?}", theme, ws.settings().general.theme);
    println!("  ✓ Shortcuts OK");
    println!();
}

async fn demo_panels(ws: &mut Workspace) {
    section("Panel Auto-hide");

    ws.open_panel(Panel::AiSidebar);
    ws.open_panel(Panel::NotesSidebar);
    println!("  Opened AI sidebar (200 ms) and notes sidebar (no timeout)");

    tokio::time::sleep(Duration::from_millis(120)).await;
    ws.panel_activity(Panel::AiSidebar);
    tokio::time::sleep(Duration::from_millis(120)).await;
    println!("  After activity at 120 ms, AI sidebar open at 240 ms = {}", ws.is_panel_open(Panel::AiSidebar));

    tokio::time::sleep(Duration::from_millis(200)).await;
    println!("  AI sidebar open after idling = {}", ws.is_panel_open(Panel::AiSidebar));
    println!("  Notes sidebar still open = {}", ws.is_panel_open(Panel::NotesSidebar));
    println!("  ✓ Panels OK");
    println!();
}
