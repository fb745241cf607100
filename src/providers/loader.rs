//! Provider loader for initializing the configured catalog provider

use super::google_books::GoogleBooks;
use super::open_library::OpenLibrary;
use super::traits::SearchProvider;
use crate::config::{ProviderConfig, Settings};
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

/// Loader that selects and initializes the search provider from settings
pub struct ProviderLoader;

impl ProviderLoader {
    /// Load the provider named by `settings.search.provider`
    pub fn load(settings: &Settings) -> Result<Arc<dyn SearchProvider>> {
        let name = &settings.search.provider;
        let config = settings
            .get_provider(name)
            .cloned()
            .unwrap_or_else(|| ProviderConfig {
                name: name.clone(),
                provider: name.clone(),
                ..Default::default()
            });

        if config.disabled {
            anyhow::bail!("Configured provider is disabled: {}", name);
        }

        let provider = Self::create_provider(&config.provider, &config)?;
        info!("Loaded provider: {} ({})", config.name, config.provider);
        Ok(provider)
    }

    /// Create a provider instance by type name
    pub fn create_provider(
        provider_type: &str,
        config: &ProviderConfig,
    ) -> Result<Arc<dyn SearchProvider>> {
        let mut provider: Box<dyn SearchProvider> = match provider_type {
            "google_books" => Box::new(GoogleBooks::new()),
            "open_library" => Box::new(OpenLibrary::new()),
            _ => {
                return Err(anyhow::anyhow!("Unknown provider type: {}", provider_type));
            }
        };

        provider.init(config)?;

        Ok(Arc::from(provider))
    }

    /// Get the list of available provider types
    pub fn available_providers() -> Vec<&'static str> {
        vec!["google_books", "open_library"]
    }
}
