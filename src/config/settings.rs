//! Settings structures for bookscout configuration

use crate::search::SearchMode;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Main settings structure matching settings.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub search: SearchSettings,
    pub outgoing: OutgoingSettings,
    pub providers: Vec<ProviderConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            general: GeneralSettings::default(),
            search: SearchSettings::default(),
            outgoing: OutgoingSettings::default(),
            providers: default_providers(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables (BOOKSCOUT_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("BOOKSCOUT_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Ok(val) = std::env::var("BOOKSCOUT_PROVIDER") {
            self.search.provider = val;
        }
        if let Ok(val) = std::env::var("BOOKSCOUT_API_KEY") {
            let provider = self.search.provider.clone();
            if let Some(config) = self.get_provider_mut(&provider) {
                config.api_key = Some(val);
            }
        }
        if let Ok(val) = std::env::var("BOOKSCOUT_PAGE_SIZE") {
            if let Ok(size) = val.parse() {
                self.search.page_size = size;
            }
        }
    }

    /// Get provider config by name
    pub fn get_provider(&self, name: &str) -> Option<&ProviderConfig> {
        self.providers.iter().find(|p| p.name == name)
    }

    fn get_provider_mut(&mut self, name: &str) -> Option<&mut ProviderConfig> {
        self.providers.iter_mut().find(|p| p.name == name)
    }

    /// Get all enabled providers
    pub fn enabled_providers(&self) -> Vec<&ProviderConfig> {
        self.providers.iter().filter(|p| !p.disabled).collect()
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug mode
    pub debug: bool,
    /// Instance name used in logs and the user agent
    pub instance_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "bookscout".to_string(),
        }
    }
}

/// Search behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Search provider to use
    pub provider: String,
    /// Autocomplete backend to use
    pub suggest_backend: String,
    /// Results fetched per page
    pub page_size: u32,
    /// Quiescence window before a suggestion fetch fires (milliseconds)
    pub suggest_debounce_ms: u64,
    /// Maximum suggestions requested per fetch
    pub suggest_limit: u32,
    /// Search mode a fresh session starts in
    pub default_mode: SearchMode,
    /// Highest page index load-more may reach
    pub max_page: u32,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            provider: "google_books".to_string(),
            suggest_backend: "google_books".to_string(),
            page_size: crate::DEFAULT_PAGE_SIZE,
            suggest_debounce_ms: crate::DEFAULT_DEBOUNCE_MS,
            suggest_limit: 5,
            default_mode: SearchMode::Title,
            max_page: 100,
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Default request timeout in seconds
    pub request_timeout: f64,
    /// Maximum request timeout
    pub max_request_timeout: Option<f64>,
    /// Pool max size
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy settings
    pub proxies: ProxySettings,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 5.0,
            max_request_timeout: Some(30.0),
            pool_maxsize: 20,
            verify_ssl: true,
            proxies: ProxySettings::default(),
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

/// Individual provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Provider name (unique identifier)
    pub name: String,
    /// Provider module to use
    pub provider: String,
    /// Whether this provider is disabled
    pub disabled: bool,
    /// Custom timeout for this provider
    pub timeout: Option<f64>,
    /// API key if required
    pub api_key: Option<String>,
    /// Additional provider-specific settings
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            provider: String::new(),
            disabled: false,
            timeout: None,
            api_key: None,
            extra: HashMap::new(),
        }
    }
}

/// Default provider configurations
fn default_providers() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig {
            name: "google_books".to_string(),
            provider: "google_books".to_string(),
            ..Default::default()
        },
        ProviderConfig {
            name: "open_library".to_string(),
            provider: "open_library".to_string(),
            ..Default::default()
        },
    ]
}
