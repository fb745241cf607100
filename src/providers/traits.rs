//! Provider traits and request/response types

use crate::config::ProviderConfig;
use crate::results::{ProviderError, ResultPage};
use crate::search::SearchMode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Parameters for building one catalog search request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// User search term, before provider-specific shaping
    pub term: String,
    /// Whether the term names a title or an author
    pub mode: SearchMode,
    /// Page index (0-based)
    pub page: u32,
    /// Results per page
    pub page_size: u32,
    /// Language code forwarded to providers that filter by it
    pub lang: String,
}

impl SearchRequest {
    /// Create request parameters for a page-0 title search
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            mode: SearchMode::Title,
            page: 0,
            page_size: crate::DEFAULT_PAGE_SIZE,
            lang: "en".to_string(),
        }
    }

    /// Set the search mode
    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the page index
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Set the page size
    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = size.max(1);
        self
    }

    /// Absolute offset of the first item on this page
    pub fn start_index(&self) -> u32 {
        self.page * self.page_size
    }

    /// Check if the term is blank
    pub fn is_blank(&self) -> bool {
        self.term.trim().is_empty()
    }
}

/// HTTP request to be made against a provider (catalog APIs are GET-only)
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    /// URL to request
    pub url: String,
    /// Query parameters
    pub params: HashMap<String, String>,
    /// Request headers
    pub headers: HashMap<String, String>,
}

impl ProviderRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            params: HashMap::new(),
            headers: HashMap::new(),
        }
    }

    /// Add a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }
}

/// HTTP response from a provider request
#[derive(Debug)]
pub struct ProviderResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub text: String,
    /// Response URL (after redirects)
    pub url: String,
}

impl ProviderResponse {
    /// Parse the body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, ProviderError> {
        serde_json::from_str(&self.text).map_err(|e| ProviderError::Parse(e.to_string()))
    }

    /// Check if the response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check if the response indicates rate limiting
    pub fn is_rate_limited(&self) -> bool {
        self.status == 429
    }
}

/// Main trait every catalog search provider implements.
///
/// Providers build requests and parse responses; the controller owns the
/// transport, timeouts, and staleness decisions.
pub trait SearchProvider: Send + Sync {
    /// Provider name
    fn name(&self) -> &str;

    /// Results per page this provider is asked for
    fn page_size(&self) -> u32 {
        crate::DEFAULT_PAGE_SIZE
    }

    /// Build the HTTP request for a search
    fn request(&self, params: &SearchRequest) -> Result<ProviderRequest, ProviderError>;

    /// Parse the HTTP response into a result page answering `page`
    fn response(&self, response: ProviderResponse, page: u32) -> Result<ResultPage, ProviderError>;

    /// Optional initialization from configuration (called once on startup)
    fn init(&mut self, _config: &ProviderConfig) -> anyhow::Result<()> {
        Ok(())
    }
}
