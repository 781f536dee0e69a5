use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::tab::TabId;

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Warning,
    Error,
    Success,
}

/// A non-fatal diagnostic for the chrome to display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub tab_id: Option<TabId>,
    /// Display time in milliseconds; `None` keeps it until dismissed.
    pub duration_ms: Option<u64>,
}

impl Notification {
    pub fn new(kind: NotificationKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            title: title.into(),
            message: message.into(),
            tab_id: None,
            duration_ms: None,
        }
    }

    /// Diagnostic for a page that failed to load.
    pub fn load_failed(tab_id: &TabId, url: &str, reason: &str) -> Self {
        Self {
            tab_id: Some(tab_id.clone()),
            duration_ms: Some(5000),
            ..Self::new(
                NotificationKind::Error,
                "Page failed to load",
                format!("{}: {}", url, reason),
            )
        }
    }
}
