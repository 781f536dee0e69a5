//! App Core for Tabshell.
//!
//! Central struct wiring settings, the session core, the page load backend and
//! the host bridge together, and managing application lifecycle.

use std::sync::Arc;

use tracing::{info, warn};

use crate::managers::navigation_controller::{NavigationConfig, NavigationController};
use crate::managers::session_store::SessionStore;
use crate::services::host_bridge::{CargoHostBridge, HostBridge};
use crate::services::page_load_backend::PageLoadBackend;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::types::errors::SettingsError;
use crate::types::settings::{IdScheme, ShellSettings, ThemeMode};
use crate::types::tab::{SequentialTabIds, TabIdGenerator, UuidTabIds, BLANK_URL};

/// View state of the window chrome around the tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChromeState {
    pub sidebar_open: bool,
    pub dark_mode: bool,
}

impl ChromeState {
    pub fn from_settings(settings: &ShellSettings) -> Self {
        Self {
            sidebar_open: settings.appearance.sidebar_open,
            dark_mode: settings.appearance.theme != ThemeMode::Light,
        }
    }
}

/// Central application struct.
pub struct App {
    pub settings_engine: SettingsEngine,
    pub navigation: NavigationController,
    pub host: Box<dyn HostBridge>,
    pub chrome: ChromeState,
}

impl App {
    /// Creates a new App, loading settings from `config_path` (or the platform default).
    pub fn new(config_path: Option<String>, backend: Arc<dyn PageLoadBackend>) -> Result<Self, SettingsError> {
        let mut settings_engine = SettingsEngine::new(config_path);
        settings_engine.load()?;
        Ok(Self::with_settings(settings_engine, backend))
    }

    /// Creates an App around an already loaded settings engine.
    pub fn with_settings(settings_engine: SettingsEngine, backend: Arc<dyn PageLoadBackend>) -> Self {
        let settings = settings_engine.get_settings().clone();

        let ids: Box<dyn TabIdGenerator> = match settings.session.id_scheme {
            IdScheme::Uuid => Box::new(UuidTabIds),
            IdScheme::Sequential => Box::new(SequentialTabIds::new()),
        };
        let store = SessionStore::new(ids, settings.session.history_limit);
        let navigation = NavigationController::new(store, backend, Self::navigation_config(&settings));

        Self {
            settings_engine,
            navigation,
            host: Box::new(CargoHostBridge),
            chrome: ChromeState::from_settings(&settings),
        }
    }

    pub fn navigation_config(settings: &ShellSettings) -> NavigationConfig {
        NavigationConfig {
            search_engine: settings.general.search_engine().cloned(),
            notifications_enabled: settings.general.notifications_enabled,
        }
    }

    /// Re-reads the settings that take effect at runtime.
    pub fn apply_settings(&mut self) {
        let config = Self::navigation_config(self.settings_engine.get_settings());
        self.navigation.set_config(config);
    }

    /// Startup sequence: load the homepage into the initial tab if one is configured.
    pub fn startup(&mut self) {
        let homepage = self.settings_engine.get_settings().general.homepage.clone();
        if homepage.is_empty() || homepage == BLANK_URL {
            return;
        }
        match self.navigation.navigate_to(&homepage) {
            Ok(url) => info!(url = %url, "Loading homepage"),
            Err(e) => warn!(homepage = %homepage, error = %e, "Could not load homepage"),
        }
    }

    /// Shutdown sequence: abandon in-flight loads.
    pub fn shutdown(&mut self) {
        self.navigation.cancel_all_loads();
        info!("Shell shut down");
    }

    pub fn toggle_sidebar(&mut self) -> bool {
        self.chrome.sidebar_open = !self.chrome.sidebar_open;
        self.chrome.sidebar_open
    }

    pub fn toggle_dark_mode(&mut self) -> bool {
        self.chrome.dark_mode = !self.chrome.dark_mode;
        self.chrome.dark_mode
    }
}
