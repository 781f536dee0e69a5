use serde::{Deserialize, Serialize};

use super::tab::BLANK_URL;

/// Top-level shell settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ShellSettings {
    #[serde(default)]
    pub general: GeneralSettings,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub appearance: AppearanceSettings,
    #[serde(default)]
    pub privacy: PrivacySettings,
    #[serde(default)]
    pub backend: BackendSettings,
    #[serde(default)]
    pub rpc: RpcSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// General browser settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralSettings {
    pub language: String,
    pub homepage: String,
    pub default_search_engine: String,
    pub search_engines: Vec<SearchEngine>,
    pub notifications_enabled: bool,
    pub save_history: bool,
    pub enable_sync: bool,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            homepage: BLANK_URL.to_string(),
            default_search_engine: "duckduckgo".to_string(),
            search_engines: SearchEngine::builtin(),
            notifications_enabled: true,
            save_history: true,
            enable_sync: false,
        }
    }
}

impl GeneralSettings {
    /// The configured default engine, falling back to the first known one.
    pub fn search_engine(&self) -> Option<&SearchEngine> {
        self.search_engines
            .iter()
            .find(|e| e.id == self.default_search_engine)
            .or_else(|| self.search_engines.first())
    }
}

/// A search provider. `url` contains a `{query}` placeholder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchEngine {
    pub id: String,
    pub name: String,
    pub url: String,
    pub is_private: bool,
}

impl SearchEngine {
    pub fn builtin() -> Vec<SearchEngine> {
        vec![
            SearchEngine {
                id: "duckduckgo".to_string(),
                name: "DuckDuckGo".to_string(),
                url: "https://duckduckgo.com/?q={query}".to_string(),
                is_private: true,
            },
            SearchEngine {
                id: "startpage".to_string(),
                name: "Startpage".to_string(),
                url: "https://www.startpage.com/do/search?q={query}".to_string(),
                is_private: true,
            },
            SearchEngine {
                id: "google".to_string(),
                name: "Google".to_string(),
                url: "https://www.google.com/search?q={query}".to_string(),
                is_private: false,
            },
        ]
    }

    /// Builds the result page URL for `query`.
    pub fn search_url(&self, query: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
        self.url.replace("{query}", &encoded)
    }
}

/// How tab ids are generated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IdScheme {
    Uuid,
    Sequential,
}

/// Tab session settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionSettings {
    pub id_scheme: IdScheme,
    pub history_limit: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            id_scheme: IdScheme::Uuid,
            history_limit: 50,
        }
    }
}

/// Appearance and chrome layout settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppearanceSettings {
    pub theme: ThemeMode,
    pub sidebar_open: bool,
}

impl Default for AppearanceSettings {
    fn default() -> Self {
        Self {
            theme: ThemeMode::Dark,
            sidebar_open: true,
        }
    }
}

/// Theme mode selection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ThemeMode {
    Dark,
    Light,
    System,
}

/// Network privacy preferences. Stored and reported only; the network layer
/// that would act on them lives outside this crate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrivacySettings {
    pub auto_start_vpn: bool,
    pub auto_connect_tor: bool,
    pub dns_over_https: bool,
    pub block_tracking: bool,
    pub block_scripts: bool,
}

impl Default for PrivacySettings {
    fn default() -> Self {
        Self {
            auto_start_vpn: false,
            auto_connect_tor: false,
            dns_over_https: true,
            block_tracking: true,
            block_scripts: false,
        }
    }
}

/// Simulated page load backend tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackendSettings {
    pub simulated_latency_ms: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            simulated_latency_ms: 150,
        }
    }
}

/// JSON-lines server settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RpcSettings {
    pub max_requests_per_second: u32,
}

impl Default for RpcSettings {
    fn default() -> Self {
        Self {
            max_requests_per_second: 200,
        }
    }
}

/// Log output settings. `RUST_LOG` takes precedence when set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSettings {
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}
