// Tabshell Session Store
// Owns the ordered tab list and the active selection, and publishes snapshots on change.

use std::collections::HashSet;

use tokio::sync::watch;
use tracing::{debug, info};

use crate::types::errors::SessionError;
use crate::types::session::SessionSnapshot;
use crate::types::tab::{TabId, TabIdGenerator, TabRecord, TabUpdate, BLANK_URL};

/// Trait defining the session store interface.
pub trait SessionStoreTrait {
    fn open_tab(&mut self, url: Option<&str>) -> TabId;
    fn close_tab(&mut self, tab_id: &TabId) -> Result<(), SessionError>;
    fn activate_tab(&mut self, tab_id: &TabId) -> Result<(), SessionError>;
    fn update_tab(&mut self, tab_id: &TabId, update: &TabUpdate) -> Result<(), SessionError>;
    fn reorder_tab(&mut self, tab_id: &TabId, new_index: usize) -> Result<(), SessionError>;
    fn get_tab(&self, tab_id: &TabId) -> Option<&TabRecord>;
    fn get_active_tab(&self) -> Option<&TabRecord>;
    fn tabs(&self) -> &[TabRecord];
    fn active_id(&self) -> &TabId;
    fn tab_count(&self) -> usize;
    fn snapshot(&self) -> SessionSnapshot;
}

/// Owner of the ordered tab list and the active selection.
///
/// Starts with one blank active tab and never becomes observably empty:
/// closing the last tab replaces it with a fresh blank one. Every successful
/// mutation publishes a new [`SessionSnapshot`] to subscribers.
pub struct SessionStore {
    tabs: Vec<TabRecord>,
    active_id: TabId,
    ids: Box<dyn TabIdGenerator>,
    history_limit: usize,
    changes: watch::Sender<SessionSnapshot>,
    revision: u64,
}

impl SessionStore {
    pub fn new(mut ids: Box<dyn TabIdGenerator>, history_limit: usize) -> Self {
        let first = TabRecord {
            is_active: true,
            ..TabRecord::new(ids.next_id(), BLANK_URL, history_limit)
        };
        let active_id = first.id.clone();
        let tabs = vec![first];
        let (changes, _) = watch::channel(SessionSnapshot {
            tabs: tabs.clone(),
            active_id: active_id.clone(),
        });

        Self {
            tabs,
            active_id,
            ids,
            history_limit,
            changes,
            revision: 0,
        }
    }

    /// Receiver that observes a fresh snapshot after every successful mutation.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.changes.subscribe()
    }

    /// Number of snapshots published so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Points the tab at `url`, marks it loading and records the visit in its
    /// back/forward list, publishing a single snapshot.
    pub fn begin_navigation(&mut self, tab_id: &TabId, url: &str) -> Result<(), SessionError> {
        let idx = self.require(tab_id)?;
        let tab = &mut self.tabs[idx];
        tab.apply(&TabUpdate::url(url).with_loading(true));
        tab.history.push(url);
        self.publish();
        Ok(())
    }

    /// Moves the tab's history index by `delta`, points the tab at the entry
    /// now current and marks it loading, publishing a single snapshot.
    /// Returns `None` with nothing changed when there is no entry in that direction.
    pub fn traverse_history(&mut self, tab_id: &TabId, delta: isize) -> Result<Option<String>, SessionError> {
        let idx = self.require(tab_id)?;
        let tab = &mut self.tabs[idx];
        let Some(url) = tab.history.step(delta).map(str::to_string) else {
            return Ok(None);
        };
        tab.apply(&TabUpdate::url(url.clone()).with_loading(true));
        self.publish();
        Ok(Some(url))
    }

    /// Verifies the session shape: non-empty, one active tab matching `active_id`, unique ids.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.tabs.is_empty() {
            return Err("session is empty".to_string());
        }
        let active: Vec<&TabRecord> = self.tabs.iter().filter(|t| t.is_active).collect();
        if active.len() != 1 {
            return Err(format!("expected exactly one active tab, found {}", active.len()));
        }
        if active[0].id != self.active_id {
            return Err(format!(
                "active flag on {} but active id is {}",
                active[0].id, self.active_id
            ));
        }
        let mut seen = HashSet::new();
        for tab in &self.tabs {
            if !seen.insert(&tab.id) {
                return Err(format!("duplicate tab id {}", tab.id));
            }
        }
        Ok(())
    }

    fn find_tab_index(&self, tab_id: &TabId) -> Option<usize> {
        self.tabs.iter().position(|t| &t.id == tab_id)
    }

    fn require(&self, tab_id: &TabId) -> Result<usize, SessionError> {
        self.find_tab_index(tab_id)
            .ok_or_else(|| SessionError::TabNotFound(tab_id.clone()))
    }

    /// Appends a tab without touching the active selection or publishing.
    fn push_tab(&mut self, url: &str) -> TabId {
        let id = self.ids.next_id();
        self.tabs
            .push(TabRecord::new(id.clone(), url, self.history_limit));
        id
    }

    /// Points the selection at `tab_id` and keeps the denormalized flags in step.
    fn set_active(&mut self, tab_id: TabId) {
        for tab in &mut self.tabs {
            tab.is_active = tab.id == tab_id;
        }
        self.active_id = tab_id;
    }

    fn publish(&mut self) {
        debug_assert!(self.check_invariants().is_ok(), "{:?}", self.check_invariants());
        self.revision += 1;
        self.changes.send_replace(self.snapshot());
    }
}

impl SessionStoreTrait for SessionStore {
    /// Append a new tab at the end of the strip and make it active.
    fn open_tab(&mut self, url: Option<&str>) -> TabId {
        let id = self.push_tab(url.unwrap_or(BLANK_URL));
        self.set_active(id.clone());
        info!(tab_id = %id, "Opened tab");
        self.publish();
        id
    }

    /// Close a tab. Activation moves to the leftmost remaining tab if the closed
    /// tab was active; closing the last tab opens a fresh blank one.
    fn close_tab(&mut self, tab_id: &TabId) -> Result<(), SessionError> {
        let idx = self.require(tab_id)?;
        let was_active = &self.active_id == tab_id;
        self.tabs.remove(idx);

        if self.tabs.is_empty() {
            let replacement = self.push_tab(BLANK_URL);
            info!(closed = %tab_id, replacement = %replacement, "Closed last tab, opened blank replacement");
            self.set_active(replacement);
        } else if was_active {
            let leftmost = self.tabs[0].id.clone();
            info!(closed = %tab_id, active = %leftmost, "Closed active tab");
            self.set_active(leftmost);
        } else {
            info!(closed = %tab_id, "Closed tab");
        }

        self.publish();
        Ok(())
    }

    fn activate_tab(&mut self, tab_id: &TabId) -> Result<(), SessionError> {
        self.require(tab_id)?;
        self.set_active(tab_id.clone());
        debug!(tab_id = %tab_id, "Activated tab");
        self.publish();
        Ok(())
    }

    /// Merge `update` into the tab with this id, wherever it sits in the strip.
    fn update_tab(&mut self, tab_id: &TabId, update: &TabUpdate) -> Result<(), SessionError> {
        let idx = self.require(tab_id)?;
        self.tabs[idx].apply(update);
        debug!(tab_id = %tab_id, ?update, "Updated tab");
        self.publish();
        Ok(())
    }

    /// Move a tab to a new position in the strip.
    fn reorder_tab(&mut self, tab_id: &TabId, new_index: usize) -> Result<(), SessionError> {
        let idx = self.require(tab_id)?;
        if new_index >= self.tabs.len() {
            return Err(SessionError::InvalidIndex(new_index));
        }
        let tab = self.tabs.remove(idx);
        self.tabs.insert(new_index, tab);
        debug!(tab_id = %tab_id, from = idx, to = new_index, "Reordered tab");
        self.publish();
        Ok(())
    }

    fn get_tab(&self, tab_id: &TabId) -> Option<&TabRecord> {
        self.tabs.iter().find(|t| &t.id == tab_id)
    }

    fn get_active_tab(&self) -> Option<&TabRecord> {
        self.get_tab(&self.active_id)
    }

    fn tabs(&self) -> &[TabRecord] {
        &self.tabs
    }

    fn active_id(&self) -> &TabId {
        &self.active_id
    }

    fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            tabs: self.tabs.clone(),
            active_id: self.active_id.clone(),
        }
    }
}
