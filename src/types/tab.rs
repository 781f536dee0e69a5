use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// URL a tab shows before anything has been loaded into it.
pub const BLANK_URL: &str = "about:blank";

/// Title shown until the page reports its own.
pub const DEFAULT_TITLE: &str = "New Tab";

/// Opaque tab identifier. Assigned once at creation, never reused within a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(String);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TabId {
    fn from(s: &str) -> Self {
        TabId(s.to_string())
    }
}

impl From<String> for TabId {
    fn from(s: String) -> Self {
        TabId(s)
    }
}

/// Source of fresh tab ids.
pub trait TabIdGenerator: Send {
    fn next_id(&mut self) -> TabId;
}

/// Random v4 UUIDs.
#[derive(Debug, Default)]
pub struct UuidTabIds;

impl TabIdGenerator for UuidTabIds {
    fn next_id(&mut self) -> TabId {
        TabId(Uuid::new_v4().to_string())
    }
}

/// Decimal counter starting at 1. Strictly increasing, so an id is never handed out twice.
#[derive(Debug)]
pub struct SequentialTabIds {
    next: u64,
}

impl SequentialTabIds {
    pub fn new() -> Self {
        Self { next: 1 }
    }
}

impl Default for SequentialTabIds {
    fn default() -> Self {
        Self::new()
    }
}

impl TabIdGenerator for SequentialTabIds {
    fn next_id(&mut self) -> TabId {
        let id = self.next;
        self.next += 1;
        TabId(id.to_string())
    }
}

/// Per-tab back/forward list. `index` always points at the entry currently shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationHistory {
    entries: Vec<String>,
    index: usize,
    limit: usize,
}

impl NavigationHistory {
    pub fn new(initial_url: &str, limit: usize) -> Self {
        Self {
            entries: vec![initial_url.to_string()],
            index: 0,
            limit: limit.max(1),
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> &str {
        &self.entries[self.index]
    }

    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// Records a new visit: forward entries are discarded, the oldest entry is
    /// evicted once the limit is exceeded. Revisiting the current entry records nothing.
    pub fn push(&mut self, url: &str) {
        if url == self.current() {
            return;
        }
        self.entries.truncate(self.index + 1);
        self.entries.push(url.to_string());
        if self.entries.len() > self.limit {
            let excess = self.entries.len() - self.limit;
            self.entries.drain(..excess);
        }
        self.index = self.entries.len() - 1;
    }

    /// Moves the index by `delta`. Returns the new current URL, or `None`
    /// (index unchanged) if the move would leave the list.
    pub fn step(&mut self, delta: isize) -> Option<&str> {
        let target = self.index as isize + delta;
        if target < 0 || target as usize >= self.entries.len() {
            return None;
        }
        self.index = target as usize;
        Some(self.current())
    }
}

/// A browser tab as seen by the tab strip and address bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabRecord {
    pub id: TabId,
    pub url: String,
    pub title: String,
    pub is_active: bool,
    pub is_loading: bool,
    pub favicon: Option<String>,
    pub history: NavigationHistory,
}

impl TabRecord {
    pub fn new(id: TabId, url: &str, history_limit: usize) -> Self {
        Self {
            id,
            url: url.to_string(),
            title: DEFAULT_TITLE.to_string(),
            is_active: false,
            is_loading: false,
            favicon: None,
            history: NavigationHistory::new(url, history_limit),
        }
    }

    /// Merges the set fields of `update` into this record.
    pub fn apply(&mut self, update: &TabUpdate) {
        if let Some(ref url) = update.url {
            self.url = url.clone();
        }
        if let Some(ref title) = update.title {
            self.title = title.clone();
        }
        if let Some(is_loading) = update.is_loading {
            self.is_loading = is_loading;
        }
        if let Some(ref favicon) = update.favicon {
            self.favicon = Some(favicon.clone());
        }
    }
}

/// Partial set of fields for `update_tab`. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabUpdate {
    pub url: Option<String>,
    pub title: Option<String>,
    pub is_loading: Option<bool>,
    pub favicon: Option<String>,
}

impl TabUpdate {
    pub fn loading(is_loading: bool) -> Self {
        Self {
            is_loading: Some(is_loading),
            ..Self::default()
        }
    }

    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn favicon(favicon: impl Into<String>) -> Self {
        Self {
            favicon: Some(favicon.into()),
            ..Self::default()
        }
    }

    pub fn with_loading(mut self, is_loading: bool) -> Self {
        self.is_loading = Some(is_loading);
        self
    }
}
