//! Tabshell RPC Server: JSON lines over stdin/stdout for the chrome process.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"nav.navigate", "params":{"url":"..."}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//! Pushed:   {"event":"session","data":{...}} after every state change,
//!           {"event":"notification","data":{...}} for load failures.
//!
//! Runs on a single-threaded runtime: requests and backend events are applied
//! one at a time, each to completion.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use tabshell::app::App;
use tabshell::rpc_handler::handle_method;
use tabshell::services::page_load_backend::SimulatedBackend;
use tabshell::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use tabshell::types::settings::ShellSettings;

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
        if self.window_start.elapsed().as_secs() >= 1 {
            self.window_start = Instant::now();
            self.request_count = 0;
        }
        self.request_count += 1;
        self.request_count <= self.max_per_second
    }
}

fn emit(value: &Value) {
    let mut out = io::stdout().lock();
    let _ = writeln!(out, "{}", value);
    let _ = out.flush();
}

fn respond(app: &Mutex<App>, rate_limiter: &mut RateLimiter, line: &str) {
    let req: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => {
            emit(&json!({"id": null, "error": format!("parse error: {}", e)}));
            return;
        }
    };

    let id = req.get("id").cloned().unwrap_or(Value::Null);

    if !rate_limiter.check() {
        warn!("Rate limit exceeded");
        emit(&json!({"id": id, "error": "rate limit exceeded"}));
        return;
    }

    let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
    let params = req.get("params").cloned().unwrap_or(json!({}));

    let response = match handle_method(app, method, &params) {
        Ok(val) => json!({"id": id, "result": val}),
        Err(err) => json!({"id": id, "error": err}),
    };
    emit(&response);
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // A failed load leaves the engine holding defaults.
    let mut settings_engine = SettingsEngine::new(None);
    let load_result = settings_engine.load();
    let settings: ShellSettings = settings_engine.get_settings().clone();
    tabshell::logging::init(&settings.logging.filter);
    if let Err(e) = load_result {
        warn!(error = %e, "Falling back to default settings");
    }

    let (backend, mut events) =
        SimulatedBackend::channel(Duration::from_millis(settings.backend.simulated_latency_ms));
    let app = Mutex::new(App::with_settings(settings_engine, Arc::new(backend)));

    let (mut session, mut diagnostics) = match app.lock() {
        Ok(mut a) => {
            a.startup();
            (a.navigation.subscribe(), a.navigation.diagnostics())
        }
        Err(e) => {
            eprintln!("failed to start: {}", e);
            return;
        }
    };

    emit(&json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")}));
    let initial = session.borrow_and_update().clone();
    emit(&json!({"event": "session", "data": initial}));
    info!("Listening on stdin");

    let mut rate_limiter = RateLimiter::new(settings.rpc.max_requests_per_second);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if !line.trim().is_empty() {
                        respond(&app, &mut rate_limiter, &line);
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "stdin closed");
                    break;
                }
            },
            Some(event) = events.recv() => {
                if let Ok(mut a) = app.lock() {
                    a.navigation.handle(event);
                }
            }
            Ok(()) = session.changed() => {
                let snapshot = session.borrow_and_update().clone();
                emit(&json!({"event": "session", "data": snapshot}));
            }
            Ok(notification) = diagnostics.recv() => {
                emit(&json!({"event": "notification", "data": notification}));
            }
        }
    }

    if let Ok(mut a) = app.lock() {
        a.shutdown();
    };
}
