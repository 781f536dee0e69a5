//! Unit tests for the RPC handler: every JSON-lines method dispatched by `handle_method`.
//!
//! These tests exercise the same code path used by the `tabshell-rpc` binary,
//! with settings in a temporary directory and a backend that only records loads.

use std::sync::{Arc, Mutex};

use serde_json::json;
use tempfile::TempDir;

use tabshell::app::App;
use tabshell::rpc_handler::handle_method;
use tabshell::services::page_load_backend::PageLoadBackend;
use tabshell::types::tab::TabId;

#[derive(Default)]
struct RecordingBackend {
    loads: Mutex<Vec<(TabId, String)>>,
}

impl PageLoadBackend for RecordingBackend {
    fn start_load(&self, tab_id: &TabId, url: &str) {
        self.loads.lock().unwrap().push((tab_id.clone(), url.to_string()));
    }
}

/// Create a fresh App with sequential tab ids, backed by a temp settings file.
fn setup() -> (Mutex<App>, Arc<RecordingBackend>, TempDir) {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let path = tmp.path().join("settings.json");
    std::fs::write(&path, r#"{"session": {"id_scheme": "sequential", "history_limit": 10}}"#)
        .expect("Failed to write settings");

    let backend = Arc::new(RecordingBackend::default());
    let app = App::new(Some(path.to_string_lossy().to_string()), backend.clone())
        .expect("Failed to init App");
    (Mutex::new(app), backend, tmp)
}

// ─── Ping ───

#[test]
fn test_ping() {
    let (app, _backend, _tmp) = setup();
    let res = handle_method(&app, "ping", &json!({})).unwrap();
    assert_eq!(res, json!({"pong": true}));
}

// ─── Unknown method ───

#[test]
fn test_unknown_method_returns_error() {
    let (app, _backend, _tmp) = setup();
    let res = handle_method(&app, "nonexistent.method", &json!({}));
    assert!(res.unwrap_err().contains("unknown method"));
}

// ─── Session ───

#[test]
fn test_session_get_initial() {
    let (app, _backend, _tmp) = setup();
    let res = handle_method(&app, "session.get", &json!({})).unwrap();

    assert_eq!(res["activeId"], "1");
    let tabs = res["tabs"].as_array().unwrap();
    assert_eq!(tabs.len(), 1);
    assert_eq!(tabs[0]["id"], "1");
    assert_eq!(tabs[0]["url"], "about:blank");
    assert_eq!(tabs[0]["title"], "New Tab");
    assert_eq!(tabs[0]["isActive"], true);
    assert_eq!(tabs[0]["isLoading"], false);
}

// ─── Tabs ───

#[test]
fn test_tab_open_activates_new_tab() {
    let (app, backend, _tmp) = setup();

    let res = handle_method(&app, "tab.open", &json!({"url": "https://example.com"})).unwrap();
    assert_eq!(res, json!({"id": "2"}));

    let active = handle_method(&app, "tab.active", &json!({})).unwrap();
    assert_eq!(active["id"], "2");
    assert_eq!(active["url"], "https://example.com");
    assert_eq!(active["isLoading"], false);
    assert!(backend.loads.lock().unwrap().is_empty());
}

#[test]
fn test_tab_close_and_activate() {
    let (app, _backend, _tmp) = setup();
    handle_method(&app, "tab.open", &json!({})).unwrap();
    handle_method(&app, "tab.activate", &json!({"id": "1"})).unwrap();

    let res = handle_method(&app, "tab.close", &json!({"id": "1"})).unwrap();
    assert_eq!(res, json!({"ok": true}));

    let session = handle_method(&app, "session.get", &json!({})).unwrap();
    assert_eq!(session["activeId"], "2");
    assert_eq!(session["tabs"].as_array().unwrap().len(), 1);
}

#[test]
fn test_tab_close_unknown_id() {
    let (app, _backend, _tmp) = setup();
    let err = handle_method(&app, "tab.close", &json!({"id": "99"})).unwrap_err();
    assert_eq!(err, "Tab not found: 99");
}

#[test]
fn test_tab_close_missing_param() {
    let (app, _backend, _tmp) = setup();
    let err = handle_method(&app, "tab.close", &json!({})).unwrap_err();
    assert_eq!(err, "missing id");
}

#[test]
fn test_tab_reorder() {
    let (app, _backend, _tmp) = setup();
    handle_method(&app, "tab.open", &json!({})).unwrap();
    handle_method(&app, "tab.open", &json!({})).unwrap();

    handle_method(&app, "tab.reorder", &json!({"id": "3", "index": 0})).unwrap();

    let session = handle_method(&app, "session.get", &json!({})).unwrap();
    let ids: Vec<&str> = session["tabs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["3", "1", "2"]);

    let err = handle_method(&app, "tab.reorder", &json!({"id": "3", "index": 7})).unwrap_err();
    assert_eq!(err, "Invalid tab index: 7");
}

#[test]
fn test_tab_event_applies_and_drops() {
    let (app, _backend, _tmp) = setup();
    handle_method(&app, "nav.navigate", &json!({"url": "https://example.com"})).unwrap();

    let res = handle_method(
        &app,
        "tab.event",
        &json!({"tabId": "1", "kind": "titleChanged", "payload": "Example Domain"}),
    )
    .unwrap();
    assert_eq!(res, json!({"applied": true}));

    handle_method(&app, "tab.event", &json!({"tabId": "1", "kind": "loadFinished"})).unwrap();
    let active = handle_method(&app, "tab.active", &json!({})).unwrap();
    assert_eq!(active["title"], "Example Domain");
    assert_eq!(active["isLoading"], false);

    let res = handle_method(&app, "tab.event", &json!({"tabId": "42", "kind": "loadFinished"}))
        .unwrap();
    assert_eq!(res, json!({"applied": false}));
}

#[test]
fn test_tab_event_invalid_kind() {
    let (app, _backend, _tmp) = setup();
    let err = handle_method(&app, "tab.event", &json!({"tabId": "1", "kind": "exploded"}))
        .unwrap_err();
    assert!(err.starts_with("invalid event"));
}

// ─── Navigation ───

#[test]
fn test_nav_navigate_starts_load() {
    let (app, backend, _tmp) = setup();

    let res = handle_method(&app, "nav.navigate", &json!({"url": "example.com"})).unwrap();
    assert_eq!(res, json!({"url": "https://example.com"}));

    let active = handle_method(&app, "tab.active", &json!({})).unwrap();
    assert_eq!(active["isLoading"], true);
    assert_eq!(
        backend.loads.lock().unwrap().as_slice(),
        &[(TabId::from("1"), "https://example.com".to_string())]
    );
}

#[test]
fn test_nav_navigate_blank_is_error() {
    let (app, _backend, _tmp) = setup();
    let err = handle_method(&app, "nav.navigate", &json!({"url": " "})).unwrap_err();
    assert!(err.starts_with("Invalid URL"));
}

#[test]
fn test_nav_back_forward_and_reload() {
    let (app, backend, _tmp) = setup();
    handle_method(&app, "nav.navigate", &json!({"url": "https://a.com"})).unwrap();

    let back = handle_method(&app, "nav.back", &json!({})).unwrap();
    assert_eq!(back, json!({"url": "about:blank"}));
    let back_again = handle_method(&app, "nav.back", &json!({})).unwrap();
    assert_eq!(back_again, json!({"url": null}));

    let forward = handle_method(&app, "nav.forward", &json!({})).unwrap();
    assert_eq!(forward, json!({"url": "https://a.com"}));

    handle_method(&app, "nav.reload", &json!({})).unwrap();
    assert_eq!(backend.loads.lock().unwrap().len(), 4);
}

// ─── Settings ───

#[test]
fn test_settings_get_and_set() {
    let (app, _backend, _tmp) = setup();

    let settings = handle_method(&app, "settings.get", &json!({})).unwrap();
    assert_eq!(settings["session"]["id_scheme"], "sequential");

    handle_method(
        &app,
        "settings.set",
        &json!({"key": "general.default_search_engine", "value": "google"}),
    )
    .unwrap();

    let res = handle_method(&app, "nav.navigate", &json!({"url": "hello world"})).unwrap();
    assert_eq!(res["url"], "https://www.google.com/search?q=hello+world");
}

#[test]
fn test_settings_set_invalid_key() {
    let (app, _backend, _tmp) = setup();
    let err = handle_method(&app, "settings.set", &json!({"key": "general.bogus", "value": 1}))
        .unwrap_err();
    assert!(err.contains("Invalid settings key"));
}

#[test]
fn test_settings_set_failed_write_changes_nothing() {
    let tmp = TempDir::new().unwrap();
    let blocker = tmp.path().join("not-a-dir");
    std::fs::write(&blocker, "").unwrap();
    let path = blocker.join("settings.json").to_string_lossy().to_string();
    let app = Mutex::new(App::new(Some(path), Arc::new(RecordingBackend::default())).unwrap());

    let err = handle_method(
        &app,
        "settings.set",
        &json!({"key": "general.default_search_engine", "value": "google"}),
    )
    .unwrap_err();
    assert!(err.starts_with("Settings I/O error"));

    let settings = handle_method(&app, "settings.get", &json!({})).unwrap();
    assert_eq!(settings["general"]["default_search_engine"], "duckduckgo");
    let res = handle_method(&app, "nav.navigate", &json!({"url": "rust traits"})).unwrap();
    assert_eq!(res["url"], "https://duckduckgo.com/?q=rust+traits");
}

#[test]
fn test_settings_reset_applies_defaults() {
    let (app, _backend, _tmp) = setup();
    handle_method(
        &app,
        "settings.set",
        &json!({"key": "general.default_search_engine", "value": "google"}),
    )
    .unwrap();

    let res = handle_method(&app, "settings.reset", &json!({})).unwrap();
    assert_eq!(res, json!({"ok": true}));

    let settings = handle_method(&app, "settings.get", &json!({})).unwrap();
    assert_eq!(settings["general"]["default_search_engine"], "duckduckgo");
    let res = handle_method(&app, "nav.navigate", &json!({"url": "hello world"})).unwrap();
    assert_eq!(res["url"], "https://duckduckgo.com/?q=hello+world");
}

// ─── Chrome ───

#[test]
fn test_chrome_toggles() {
    let (app, _backend, _tmp) = setup();

    let res = handle_method(&app, "chrome.toggle_sidebar", &json!({})).unwrap();
    assert_eq!(res, json!({"sidebar_open": false}));
    let res = handle_method(&app, "chrome.toggle_dark_mode", &json!({})).unwrap();
    assert_eq!(res, json!({"dark_mode": false}));
    let res = handle_method(&app, "chrome.toggle_dark_mode", &json!({})).unwrap();
    assert_eq!(res, json!({"dark_mode": true}));
}

// ─── Host ───

#[test]
fn test_app_version() {
    let (app, _backend, _tmp) = setup();
    let res = handle_method(&app, "app.version", &json!({})).unwrap();
    assert_eq!(res["name"], "tabshell");
    assert_eq!(res["version"], env!("CARGO_PKG_VERSION"));
}
