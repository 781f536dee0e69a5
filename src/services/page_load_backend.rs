//! Page load backend contract and an in-process simulation of it.
//!
//! A backend receives `start_load` commands and later reports lifecycle events
//! for that tab on an event channel. Events for one tab arrive in order; events
//! for different tabs may interleave freely.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::{debug, warn};
use url::Url;

use crate::types::events::{BackendEvent, TabEvent};
use crate::types::tab::{TabId, DEFAULT_TITLE};

/// Performs page loads on behalf of the navigation controller.
pub trait PageLoadBackend: Send + Sync {
    /// Begins loading `url` into the tab. Returns immediately.
    fn start_load(&self, tab_id: &TabId, url: &str);

    /// Best-effort cancellation of an in-flight load. Events may still arrive afterwards.
    fn cancel_load(&self, _tab_id: &TabId) {}
}

/// Backend that fakes page loads with tokio tasks.
///
/// Each load emits `loadStarted`, waits for the configured latency, then
/// reports a title and favicon derived from the URL followed by `loadFinished`,
/// or `loadFailed` for URLs it cannot "render".
pub struct SimulatedBackend {
    events: mpsc::UnboundedSender<TabEvent>,
    latency: Duration,
    loads: Mutex<HashMap<TabId, AbortHandle>>,
}

/// What a simulated load resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedPage {
    pub title: String,
    pub favicon: Option<String>,
}

impl SimulatedBackend {
    pub fn new(events: mpsc::UnboundedSender<TabEvent>, latency: Duration) -> Self {
        Self {
            events,
            latency,
            loads: Mutex::new(HashMap::new()),
        }
    }

    /// Creates a backend together with the receiving end of its event channel.
    pub fn channel(latency: Duration) -> (Self, mpsc::UnboundedReceiver<TabEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx, latency), rx)
    }

    /// Resolves `url` the way the simulated renderer would.
    pub fn resolve(url: &str) -> Result<SimulatedPage, String> {
        let parsed = Url::parse(url).map_err(|e| format!("invalid url: {}", e))?;
        match parsed.scheme() {
            "about" => Ok(SimulatedPage {
                title: match parsed.path() {
                    "settings" => "Settings".to_string(),
                    _ => DEFAULT_TITLE.to_string(),
                },
                favicon: None,
            }),
            "http" | "https" => {
                let host = parsed.host_str().ok_or("missing host")?;
                Ok(SimulatedPage {
                    title: host.trim_start_matches("www.").to_string(),
                    favicon: Some(format!("{}/favicon.ico", parsed.origin().ascii_serialization())),
                })
            }
            "file" => Ok(SimulatedPage {
                title: parsed
                    .path_segments()
                    .and_then(|s| s.filter(|p| !p.is_empty()).last())
                    .unwrap_or("/")
                    .to_string(),
                favicon: None,
            }),
            other => Err(format!("unsupported scheme: {}", other)),
        }
    }

    fn send(events: &mpsc::UnboundedSender<TabEvent>, tab_id: &TabId, event: BackendEvent) {
        // A closed receiver means the shell is shutting down.
        let _ = events.send(TabEvent::new(tab_id.clone(), event));
    }

    async fn simulate(events: mpsc::UnboundedSender<TabEvent>, tab_id: TabId, url: String, latency: Duration) {
        Self::send(&events, &tab_id, BackendEvent::LoadStarted);
        tokio::time::sleep(latency).await;
        match Self::resolve(&url) {
            Ok(page) => {
                Self::send(&events, &tab_id, BackendEvent::TitleChanged(page.title));
                if let Some(favicon) = page.favicon {
                    Self::send(&events, &tab_id, BackendEvent::FaviconChanged(favicon));
                }
                Self::send(&events, &tab_id, BackendEvent::LoadFinished);
            }
            Err(reason) => Self::send(&events, &tab_id, BackendEvent::LoadFailed(reason)),
        }
    }
}

impl PageLoadBackend for SimulatedBackend {
    fn start_load(&self, tab_id: &TabId, url: &str) {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                warn!(tab_id = %tab_id, error = %e, "No async runtime for page load");
                Self::send(&self.events, tab_id, BackendEvent::LoadFailed(e.to_string()));
                return;
            }
        };

        let task = runtime.spawn(Self::simulate(
            self.events.clone(),
            tab_id.clone(),
            url.to_string(),
            self.latency,
        ));
        debug!(tab_id = %tab_id, url, "Started simulated load");

        if let Ok(mut loads) = self.loads.lock() {
            if let Some(previous) = loads.insert(tab_id.clone(), task.abort_handle()) {
                previous.abort();
            }
        }
    }

    fn cancel_load(&self, tab_id: &TabId) {
        if let Ok(mut loads) = self.loads.lock() {
            if let Some(load) = loads.remove(tab_id) {
                debug!(tab_id = %tab_id, "Cancelled simulated load");
                load.abort();
            }
        }
    }
}
