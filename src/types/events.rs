use serde::{Deserialize, Serialize};

use super::tab::TabId;

/// Lifecycle event reported by the page load backend for one tab.
///
/// Serialized as `{"kind": "titleChanged", "payload": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "camelCase")]
pub enum BackendEvent {
    LoadStarted,
    TitleChanged(String),
    FaviconChanged(String),
    LoadFinished,
    LoadFailed(String),
}

impl BackendEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            BackendEvent::LoadStarted => "loadStarted",
            BackendEvent::TitleChanged(_) => "titleChanged",
            BackendEvent::FaviconChanged(_) => "faviconChanged",
            BackendEvent::LoadFinished => "loadFinished",
            BackendEvent::LoadFailed(_) => "loadFailed",
        }
    }
}

/// A backend event addressed to a tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabEvent {
    pub tab_id: TabId,
    pub event: BackendEvent,
}

impl TabEvent {
    pub fn new(tab_id: TabId, event: BackendEvent) -> Self {
        Self { tab_id, event }
    }
}

/// What happened to an event handed to the navigation controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Applied,
    /// The target tab no longer exists (closed mid-load).
    Dropped,
}
