//! RPC method handler for the Tabshell JSON-lines protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! `handle_method` dispatches chrome requests to the navigation controller,
//! settings engine, and host bridge held by the `App` struct.

use std::sync::Mutex;

use serde_json::{json, Value};

use crate::app::App;
use crate::managers::session_store::SessionStoreTrait;
use crate::services::settings_engine::SettingsEngineTrait;
use crate::types::events::{BackendEvent, EventOutcome};
use crate::types::tab::TabId;

fn str_param<'a>(params: &'a Value, key: &str) -> Result<&'a str, String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", key))
}

fn tab_id_param(params: &Value, key: &str) -> Result<TabId, String> {
    str_param(params, key).map(TabId::from)
}

/// Builds a backend event from `{"kind": .., "payload": ..}` params.
fn event_param(params: &Value) -> Result<BackendEvent, String> {
    let kind = str_param(params, "kind")?;
    let wire = match params.get("payload") {
        Some(payload) if !payload.is_null() => json!({"kind": kind, "payload": payload}),
        _ => json!({"kind": kind}),
    };
    serde_json::from_value(wire).map_err(|e| format!("invalid event: {}", e))
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub fn handle_method(app: &Mutex<App>, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        // ─── Session ───
        "session.get" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            serde_json::to_value(a.navigation.snapshot()).map_err(|e| e.to_string())
        }

        // ─── Tabs ───
        "tab.open" => {
            let url = params.get("url").and_then(|v| v.as_str());
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let id = a.navigation.open_tab(url);
            Ok(json!({"id": id}))
        }
        "tab.close" => {
            let id = tab_id_param(params, "id")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.navigation.close_tab(&id).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "tab.activate" => {
            let id = tab_id_param(params, "id")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.navigation.activate_tab(&id).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "tab.reorder" => {
            let id = tab_id_param(params, "id")?;
            let index = params.get("index").and_then(|v| v.as_u64()).ok_or("missing index")? as usize;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.navigation.reorder_tab(&id, index).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "tab.active" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let tab = a.navigation.store().get_active_tab().ok_or("No active tab")?;
            serde_json::to_value(tab).map_err(|e| e.to_string())
        }
        "tab.event" => {
            let id = tab_id_param(params, "tabId")?;
            let event = event_param(params)?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let outcome = a.navigation.on_backend_event(&id, event);
            Ok(json!({"applied": outcome == EventOutcome::Applied}))
        }

        // ─── Navigation ───
        "nav.navigate" => {
            let url = str_param(params, "url")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let resolved = a.navigation.navigate_to(url).map_err(|e| e.to_string())?;
            Ok(json!({"url": resolved}))
        }
        "nav.reload" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.navigation.reload().map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "nav.back" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let url = a.navigation.go_back().map_err(|e| e.to_string())?;
            Ok(json!({"url": url}))
        }
        "nav.forward" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let url = a.navigation.go_forward().map_err(|e| e.to_string())?;
            Ok(json!({"url": url}))
        }

        // ─── Settings ───
        "settings.get" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            serde_json::to_value(a.settings_engine.get_settings()).map_err(|e| e.to_string())
        }
        "settings.set" => {
            let key = str_param(params, "key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.settings_engine.set_value(key, value).map_err(|e| e.to_string())?;
            a.apply_settings();
            Ok(json!({"ok": true}))
        }
        "settings.reset" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.settings_engine.reset().map_err(|e| e.to_string())?;
            a.apply_settings();
            Ok(json!({"ok": true}))
        }

        // ─── Chrome ───
        "chrome.toggle_sidebar" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            Ok(json!({"sidebar_open": a.toggle_sidebar()}))
        }
        "chrome.toggle_dark_mode" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            Ok(json!({"dark_mode": a.toggle_dark_mode()}))
        }

        // ─── Host ───
        "app.version" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            Ok(json!({"name": a.host.app_name(), "version": a.host.app_version()}))
        }

        // ─── Ping ───
        "ping" => Ok(json!({"pong": true})),

        _ => Err(format!("unknown method: {}", method)),
    }
}
