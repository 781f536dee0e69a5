//! Navigation Controller for Tabshell.
//!
//! Translates chrome intents (open, close, navigate, reload, back/forward) and
//! page load backend events into session store mutations. All writes to the
//! session go through here; the chrome only ever reads snapshots.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, error, warn};
use url::Url;

use crate::managers::session_store::{SessionStore, SessionStoreTrait};
use crate::services::page_load_backend::PageLoadBackend;
use crate::types::errors::{NavigationError, SessionError};
use crate::types::events::{BackendEvent, EventOutcome, TabEvent};
use crate::types::notification::Notification;
use crate::types::session::SessionSnapshot;
use crate::types::settings::SearchEngine;
use crate::types::tab::{TabId, TabRecord, TabUpdate};

/// Schemes accepted verbatim from the address bar even without `//`.
const OPAQUE_SCHEMES: &[&str] = &["about", "data", "file", "mailto", "view-source"];

const DIAGNOSTICS_CAPACITY: usize = 64;

/// Knobs the controller takes from settings.
#[derive(Debug, Clone, Default)]
pub struct NavigationConfig {
    pub search_engine: Option<SearchEngine>,
    pub notifications_enabled: bool,
}

/// Turns address bar input into a navigation target.
///
/// Absolute URLs are kept exactly as typed. Bare hosts get `https://`.
/// Anything else becomes a query for `search_engine`.
pub fn resolve_input(input: &str, search_engine: Option<&SearchEngine>) -> Result<String, NavigationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(NavigationError::InvalidUrl(input.to_string()));
    }

    if let Ok(parsed) = Url::parse(trimmed) {
        if trimmed.contains("://") || OPAQUE_SCHEMES.contains(&parsed.scheme()) {
            return Ok(trimmed.to_string());
        }
    }

    if looks_like_host(trimmed) {
        let candidate = format!("https://{}", trimmed);
        if Url::parse(&candidate).is_ok() {
            return Ok(candidate);
        }
    }

    search_engine
        .map(|engine| engine.search_url(trimmed))
        .ok_or_else(|| NavigationError::InvalidUrl(input.to_string()))
}

fn looks_like_host(input: &str) -> bool {
    if input.chars().any(char::is_whitespace) {
        return false;
    }
    let host = input.split(['/', '?', '#']).next().unwrap_or(input);
    let host = host.split(':').next().unwrap_or(host);
    host == "localhost" || (host.contains('.') && !host.starts_with('.') && !host.ends_with('.'))
}

/// Mediates between the chrome, the session store, and the page load backend.
pub struct NavigationController {
    store: SessionStore,
    backend: Arc<dyn PageLoadBackend>,
    config: NavigationConfig,
    diagnostics: broadcast::Sender<Notification>,
}

impl NavigationController {
    pub fn new(store: SessionStore, backend: Arc<dyn PageLoadBackend>, config: NavigationConfig) -> Self {
        let (diagnostics, _) = broadcast::channel(DIAGNOSTICS_CAPACITY);
        Self {
            store,
            backend,
            config,
            diagnostics,
        }
    }

    /// Read-only view of the session.
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.store.subscribe()
    }

    /// Receiver for load failure notifications.
    pub fn diagnostics(&self) -> broadcast::Receiver<Notification> {
        self.diagnostics.subscribe()
    }

    pub fn set_config(&mut self, config: NavigationConfig) {
        self.config = config;
    }

    pub fn open_tab(&mut self, url: Option<&str>) -> TabId {
        self.store.open_tab(url)
    }

    /// Closes the tab and asks the backend to abandon its load. Events that
    /// still arrive for the id are dropped by `on_backend_event`.
    pub fn close_tab(&mut self, tab_id: &TabId) -> Result<(), SessionError> {
        self.store.close_tab(tab_id)?;
        self.backend.cancel_load(tab_id);
        Ok(())
    }

    pub fn activate_tab(&mut self, tab_id: &TabId) -> Result<(), SessionError> {
        self.store.activate_tab(tab_id)
    }

    pub fn reorder_tab(&mut self, tab_id: &TabId, new_index: usize) -> Result<(), SessionError> {
        self.store.reorder_tab(tab_id, new_index)
    }

    pub fn get_active_tab(&self) -> Option<&TabRecord> {
        self.store.get_active_tab()
    }

    /// Navigates the active tab. Returns the URL actually loaded.
    pub fn navigate_to(&mut self, input: &str) -> Result<String, NavigationError> {
        let url = resolve_input(input, self.config.search_engine.as_ref())?;
        let tab_id = self.active_tab_id()?;

        self.store.begin_navigation(&tab_id, &url)?;
        self.backend.start_load(&tab_id, &url);
        debug!(tab_id = %tab_id, url = %url, "Navigating");
        Ok(url)
    }

    /// Reloads the active tab's current URL.
    pub fn reload(&mut self) -> Result<(), NavigationError> {
        let tab_id = self.active_tab_id()?;
        let url = self
            .store
            .get_tab(&tab_id)
            .map(|t| t.url.clone())
            .ok_or_else(|| SessionError::TabNotFound(tab_id.clone()))?;

        self.store.update_tab(&tab_id, &TabUpdate::loading(true))?;
        self.backend.start_load(&tab_id, &url);
        debug!(tab_id = %tab_id, url = %url, "Reloading");
        Ok(())
    }

    /// Steps the active tab back. `None` when already at the oldest entry.
    pub fn go_back(&mut self) -> Result<Option<String>, NavigationError> {
        self.traverse(-1)
    }

    /// Steps the active tab forward. `None` when already at the newest entry.
    pub fn go_forward(&mut self) -> Result<Option<String>, NavigationError> {
        self.traverse(1)
    }

    fn traverse(&mut self, delta: isize) -> Result<Option<String>, NavigationError> {
        let tab_id = self.active_tab_id()?;
        let Some(url) = self.store.traverse_history(&tab_id, delta)? else {
            return Ok(None);
        };
        self.backend.start_load(&tab_id, &url);
        debug!(tab_id = %tab_id, url = %url, delta, "Traversing history");
        Ok(Some(url))
    }

    /// Applies one backend event. Events for tabs that no longer exist are dropped.
    pub fn on_backend_event(&mut self, tab_id: &TabId, event: BackendEvent) -> EventOutcome {
        let Some(url) = self.store.get_tab(tab_id).map(|t| t.url.clone()) else {
            debug!(tab_id = %tab_id, kind = event.kind(), "Dropping event for closed tab");
            return EventOutcome::Dropped;
        };

        let update = match event {
            BackendEvent::LoadStarted => TabUpdate::loading(true),
            BackendEvent::TitleChanged(title) => TabUpdate::title(title),
            BackendEvent::FaviconChanged(favicon) => TabUpdate::favicon(favicon),
            BackendEvent::LoadFinished => TabUpdate::loading(false),
            BackendEvent::LoadFailed(reason) => {
                warn!(tab_id = %tab_id, url = %url, reason = %reason, "Page load failed");
                if self.config.notifications_enabled {
                    // No subscribers is fine.
                    let _ = self
                        .diagnostics
                        .send(Notification::load_failed(tab_id, &url, &reason));
                }
                TabUpdate::loading(false)
            }
        };

        match self.store.update_tab(tab_id, &update) {
            Ok(()) => EventOutcome::Applied,
            Err(_) => EventOutcome::Dropped,
        }
    }

    pub fn handle(&mut self, event: TabEvent) -> EventOutcome {
        self.on_backend_event(&event.tab_id, event.event)
    }

    /// Applies everything already queued on `events` without waiting.
    /// Returns how many events were applied.
    pub fn drain(&mut self, events: &mut mpsc::UnboundedReceiver<TabEvent>) -> usize {
        let mut applied = 0;
        while let Ok(event) = events.try_recv() {
            if self.handle(event) == EventOutcome::Applied {
                applied += 1;
            }
        }
        applied
    }

    /// Applies events in arrival order until the channel closes.
    pub async fn pump(&mut self, events: &mut mpsc::UnboundedReceiver<TabEvent>) {
        while let Some(event) = events.recv().await {
            self.handle(event);
        }
    }

    /// Asks the backend to abandon every in-flight load.
    pub fn cancel_all_loads(&self) {
        for tab in self.store.tabs().iter().filter(|t| t.is_loading) {
            self.backend.cancel_load(&tab.id);
        }
    }

    fn active_tab_id(&self) -> Result<TabId, NavigationError> {
        match self.store.get_active_tab() {
            Some(tab) => Ok(tab.id.clone()),
            None => {
                error!(active_id = %self.store.active_id(), "Session has no active tab");
                Err(NavigationError::NoActiveTab)
            }
        }
    }
}
