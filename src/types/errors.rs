use thiserror::Error;

use super::tab::TabId;

// === SessionError ===

/// Errors related to tab session operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Tab with the given ID was not found.
    #[error("Tab not found: {0}")]
    TabNotFound(TabId),
    /// The provided tab index is out of bounds.
    #[error("Invalid tab index: {0}")]
    InvalidIndex(usize),
}

// === NavigationError ===

/// Errors related to navigation requests from the chrome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    /// No tab is active. Unreachable while the session invariants hold.
    #[error("No active tab")]
    NoActiveTab,
    /// The address bar input could not be turned into a navigation target.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// The underlying session operation failed.
    #[error(transparent)]
    Session(#[from] SessionError),
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    #[error("Settings I/O error: {0}")]
    IoError(String),
    /// Failed to serialize or deserialize settings.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    /// The provided settings key is invalid.
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    /// The provided settings value is invalid.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}
