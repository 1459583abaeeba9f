//! RPC method handler for the HubDeck JSON-RPC protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! `handle_method` dispatches JSON-RPC method calls to the `Workspace`.

use tokio::sync::Mutex;

use crate::app::Workspace;
use crate::managers::shortcut_manager::ShortcutManagerTrait;
use crate::managers::tab_manager::TabManagerTrait;
use crate::services::embed_controller::EmbedControllerTrait;
use crate::types::panel::Panel;
use crate::types::resource::ResourceDescriptor;
use crate::types::shortcut::KeyEvent;
use crate::types::tab::{AppType, OpenTabRequest, TabProps};

use serde_json::{json, Value};

fn str_param<'a>(params: &'a Value, name: &str) -> Result<&'a str, String> {
    params
        .get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", name))
}

fn panel_param(params: &Value) -> Result<Panel, String> {
    let raw = params.get("panel").cloned().ok_or("missing panel")?;
    serde_json::from_value(raw).map_err(|e| format!("invalid panel: {}", e))
}

fn generation_param(params: &Value) -> Result<u64, String> {
    params
        .get("generation")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| "missing generation".to_string())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, String> {
    serde_json::to_value(value).map_err(|e| e.to_string())
}

/// Dispatch a JSON-RPC method call to the workspace.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub async fn handle_method(
    workspace: &Mutex<Workspace>,
    method: &str,
    params: &Value,
) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true, "version": env!("CARGO_PKG_VERSION")})),

        // ─── Tabs ───
        "tab.open" => {
            let raw = params.get("app_type").cloned().ok_or("missing app_type")?;
            let app_type: AppType =
                serde_json::from_value(raw).map_err(|e| format!("invalid app_type: {}", e))?;
            let props = match params.get("props") {
                Some(p) => TabProps::from_json(app_type, p.clone())
                    .map_err(|e| format!("invalid props: {}", e))?,
                None => TabProps::empty(app_type),
            };
            let title = params
                .get("title")
                .and_then(|v| v.as_str())
                .unwrap_or(app_type.display_name());
            let mut request = OpenTabRequest::new(title, props);
            if let Some(resource_id) = params.get("resource_id").and_then(|v| v.as_str()) {
                request = request.with_resource(resource_id);
            }
            let mut ws = workspace.lock().await;
            let id = ws.open_tab(request);
            Ok(json!({"id": id}))
        }
        "tab.launch" => {
            let raw = params.get("app_type").cloned().ok_or("missing app_type")?;
            let app_type: AppType =
                serde_json::from_value(raw).map_err(|e| format!("invalid app_type: {}", e))?;
            let mut ws = workspace.lock().await;
            Ok(json!({"id": ws.launch_tool(app_type)}))
        }
        "tab.list" => {
            let ws = workspace.lock().await;
            let tabs = to_json(&ws.tabs().get_all_tabs())?;
            Ok(json!({"tabs": tabs, "active_tab_id": ws.tabs().active_tab_id()}))
        }
        "tab.focus" => {
            let id = str_param(params, "id")?;
            let mut ws = workspace.lock().await;
            ws.set_active_tab(id).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "tab.update_props" => {
            let id = str_param(params, "id")?;
            let patch = params.get("props").ok_or("missing props")?;
            let mut ws = workspace.lock().await;
            ws.update_tab_props(id, patch).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "tab.close" => {
            let id = str_param(params, "id")?;
            let mut ws = workspace.lock().await;
            ws.close_tab(id).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true, "active_tab_id": ws.tabs().active_tab_id()}))
        }
        "tab.close_all" => {
            let mut ws = workspace.lock().await;
            let closed = ws.close_all_tabs();
            Ok(json!({"closed": closed.len()}))
        }

        // ─── Resources ───
        "resource.open" => {
            let raw = params.get("resource").cloned().ok_or("missing resource")?;
            let resource: ResourceDescriptor =
                serde_json::from_value(raw).map_err(|e| format!("invalid resource: {}", e))?;
            let task_id = params.get("task_id").and_then(|v| v.as_str());
            let mut ws = workspace.lock().await;
            let id = ws.open_resource_as_tab(&resource, task_id);
            Ok(json!({"id": id}))
        }
        "resource.open_all" => {
            let task_id = str_param(params, "task_id")?;
            let mut ws = workspace.lock().await;
            let ids = ws.open_all_resources_for_task(task_id).await;
            Ok(json!({"ids": ids}))
        }
        "note.open" => {
            let note_id = str_param(params, "note_id")?;
            let note_path = params.get("note_path").and_then(|v| v.as_str());
            let mut ws = workspace.lock().await;
            Ok(json!({"id": ws.open_note(note_id, note_path)}))
        }
        "file.url" => {
            let key = str_param(params, "key")?;
            let ws = workspace.lock().await;
            Ok(json!({"url": ws.file_url(key).await}))
        }

        // ─── Embedded services ───
        "embed.view" => {
            let id = str_param(params, "id")?;
            let ws = workspace.lock().await;
            let session = ws.embed(id).ok_or_else(|| format!("no embedded service for tab {}", id))?;
            Ok(json!({
                "state": session.state(),
                "generation": session.generation(),
                "view": to_json(&session.view())?,
            }))
        }
        "embed.loaded" => {
            let id = str_param(params, "id")?;
            let generation = generation_param(params)?;
            let mut ws = workspace.lock().await;
            Ok(json!({"accepted": ws.on_embed_loaded(id, generation)}))
        }
        "embed.failed" => {
            let id = str_param(params, "id")?;
            let generation = generation_param(params)?;
            let reason = params.get("reason").and_then(|v| v.as_str()).map(str::to_string);
            let mut ws = workspace.lock().await;
            Ok(json!({"accepted": ws.on_embed_failed(id, generation, reason)}))
        }
        "embed.retry" => {
            let id = str_param(params, "id")?;
            let mut ws = workspace.lock().await;
            Ok(json!({"retried": ws.retry_embed(id)}))
        }

        // ─── Panels ───
        "panel.open" => {
            let panel = panel_param(params)?;
            let mut ws = workspace.lock().await;
            ws.open_panel(panel);
            Ok(json!({"open": ws.is_panel_open(panel)}))
        }
        "panel.close" => {
            let panel = panel_param(params)?;
            let mut ws = workspace.lock().await;
            ws.close_panel(panel);
            Ok(json!({"open": ws.is_panel_open(panel)}))
        }
        "panel.toggle" => {
            let panel = panel_param(params)?;
            let mut ws = workspace.lock().await;
            ws.toggle_panel(panel);
            Ok(json!({"open": ws.is_panel_open(panel)}))
        }
        "panel.activity" => {
            let panel = panel_param(params)?;
            let mut ws = workspace.lock().await;
            ws.panel_activity(panel);
            Ok(json!({"ok": true}))
        }
        "panel.state" => {
            let ws = workspace.lock().await;
            let panels: serde_json::Map<String, Value> = Panel::ALL
                .iter()
                .map(|p| (p.key().to_string(), json!(ws.is_panel_open(*p))))
                .collect();
            Ok(json!({"panels": panels, "overlays": to_json(ws.overlays())?}))
        }

        // ─── Keyboard ───
        "key.dispatch" => {
            let raw = params.get("event").cloned().unwrap_or_else(|| params.clone());
            let event: KeyEvent =
                serde_json::from_value(raw).map_err(|e| format!("invalid key event: {}", e))?;
            let mut ws = workspace.lock().await;
            let outcome = ws.handle_key_event(&event);
            Ok(json!({
                "handled": outcome.is_handled(),
                "prevent_default": outcome.prevent_default(),
            }))
        }
        "shortcut.list" => {
            let ws = workspace.lock().await;
            to_json(&ws.shortcuts().list_shortcuts())
        }

        // ─── Settings ───
        "settings.get" => {
            let ws = workspace.lock().await;
            to_json(ws.settings())
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
