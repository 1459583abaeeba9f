//! HubDeck RPC Server — JSON-RPC over stdin/stdout for the dashboard shell.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"tab.open", "params":{"app_type":"search"}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//! Events:   {"event":"ready",...} and {"event":"panel.closed","panel":"ai-sidebar"}

use std::sync::Arc;
use std::time::Instant;

use hubdeck::app::Workspace;
use hubdeck::logging;
use hubdeck::rpc_handler::handle_method;
use hubdeck::services::resource_service::{
    HttpResourceService, ResourceService, StaticResourceService,
};
use hubdeck::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use hubdeck::types::settings::DashboardSettings;

use log::{error, info, warn};
use serde_json::{json, Value};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;

/// Simple rate limiter: max requests per second.
struct RateLimiter {
    window_start: Instant,
    request_count: u32,
    max_per_second: u32,
}

impl RateLimiter {
    fn new(max_per_second: u32) -> Self {
        Self { window_start: Instant::now(), request_count: 0, max_per_second }
    }

    /// Returns true if the request is allowed, false if rate-limited.
    fn check(&mut self) -> bool {
        let elapsed = self.window_start.elapsed();
        if elapsed.as_secs() >= 1 {
            self.window_start = Instant::now();
            self.request_count = 0;
        }
        self.request_count += 1;
        self.request_count <= self.max_per_second
    }
}

fn load_settings() -> DashboardSettings {
    let mut engine = SettingsEngine::new(std::env::var("HUBDECK_CONFIG").ok());
    match engine.load() {
        Ok(settings) => settings,
        Err(e) => {
            warn!("using default settings, {} could not be read: {}", engine.get_config_path(), e);
            DashboardSettings::default()
        }
    }
}

fn resource_service(settings: &DashboardSettings) -> Arc<dyn ResourceService> {
    let base = std::env::var("HUBDECK_RESOURCE_API")
        .ok()
        .or_else(|| settings.services.resource_api_url.clone());
    match base {
        Some(base) => match HttpResourceService::new(base.clone()) {
            Ok(service) => {
                info!("resource API at {}", base);
                Arc::new(service)
            }
            Err(e) => {
                error!("resource API client could not be built: {}", e);
                Arc::new(StaticResourceService::new())
            }
        },
        None => {
            warn!("no resource API configured, task resources will be empty");
            Arc::new(StaticResourceService::new())
        }
    }
}

async fn write_line(out: &mut io::Stdout, value: &Value) -> std::io::Result<()> {
    out.write_all(value.to_string().as_bytes()).await?;
    out.write_all(b"\n").await?;
    out.flush().await
}

/// Handle one request line. Blank lines produce no response.
async fn handle_line(
    workspace: &Mutex<Workspace>,
    rate_limiter: &mut RateLimiter,
    line: &str,
) -> Option<Value> {
    if line.trim().is_empty() {
        return None;
    }

    let req: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => return Some(json!({"id":null,"error":format!("parse error: {}",e)})),
    };

    let id = req.get("id").cloned().unwrap_or(Value::Null);

    if !rate_limiter.check() {
        return Some(json!({"id": id, "error": "rate limit exceeded"}));
    }

    let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
    let params = req.get("params").cloned().unwrap_or(json!({}));

    let response = match handle_method(workspace, method, &params).await {
        Ok(val) => json!({"id": id, "result": val}),
        Err(err) => json!({"id": id, "error": err}),
    };
    Some(response)
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    logging::init_from_env();
    let settings = load_settings();
    let service = resource_service(&settings);
    let mut ws = Workspace::new(settings, service);
    let mut panel_closes = ws.subscribe_panel_closes();
    let workspace = Mutex::new(ws);

    let mut stdout = io::stdout();

    // Signal ready
    let ready = json!({"event":"ready","version":env!("CARGO_PKG_VERSION")});
    write_line(&mut stdout, &ready).await?;

    // Max 200 RPC requests per second
    let mut rate_limiter = RateLimiter::new(200);

    let mut lines = BufReader::new(io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if let Some(response) = handle_line(&workspace, &mut rate_limiter, &line).await {
                    write_line(&mut stdout, &response).await?;
                }
            }
            Some(panel) = panel_closes.recv() => {
                let event = json!({"event": "panel.closed", "panel": panel.key()});
                write_line(&mut stdout, &event).await?;
            }
        }
    }

    workspace.lock().await.shutdown();
    Ok(())
}
