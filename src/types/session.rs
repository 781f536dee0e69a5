use serde::{Deserialize, Serialize};

use super::tab::{TabId, TabRecord};

/// Owned copy of the session state handed to readers.
///
/// Mutating a snapshot never touches the store it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub tabs: Vec<TabRecord>,
    pub active_id: TabId,
}

impl SessionSnapshot {
    pub fn active_tab(&self) -> Option<&TabRecord> {
        self.tabs.iter().find(|t| t.id == self.active_id)
    }

    pub fn ids(&self) -> Vec<TabId> {
        self.tabs.iter().map(|t| t.id.clone()).collect()
    }
}
