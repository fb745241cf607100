//! Suggestion backend implementations

use crate::network::HttpClient;
use crate::results::{ProviderError, SuggestionItem};
use crate::search::SearchMode;
use async_trait::async_trait;

/// How many suggestions a backend asks the provider for
const SUGGEST_LIMIT: u32 = 5;

/// Trait for autocomplete suggestion backends
#[async_trait]
pub trait SuggestionBackend: Send + Sync {
    /// Backend name
    fn name(&self) -> &str;

    /// Fetch suggestions for partial input. One call, no retry, no caching.
    async fn suggest(
        &self,
        client: &HttpClient,
        text: &str,
        mode: SearchMode,
    ) -> Result<Vec<SuggestionItem>, ProviderError>;
}

/// Get a backend by name
pub fn get_backend(name: &str) -> Option<Box<dyn SuggestionBackend>> {
    match name.to_lowercase().as_str() {
        "google_books" | "google" => Some(Box::new(GoogleBooks::new())),
        "open_library" | "ol" => Some(Box::new(OpenLibrary::new())),
        _ => None,
    }
}

/// List available backends
pub fn list_backends() -> Vec<&'static str> {
    vec!["google_books", "open_library"]
}

/// Google Books autocomplete backend
pub struct GoogleBooks {
    api_url: String,
}

impl GoogleBooks {
    pub fn new() -> Self {
        Self {
            api_url: "https://www.googleapis.com/books/v1/volumes".to_string(),
        }
    }

    /// Point the backend at a different endpoint (used by tests)
    pub fn with_api_url(url: impl Into<String>) -> Self {
        Self { api_url: url.into() }
    }
}

impl Default for GoogleBooks {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SuggestionBackend for GoogleBooks {
    fn name(&self) -> &str {
        "google_books"
    }

    async fn suggest(
        &self,
        client: &HttpClient,
        text: &str,
        mode: SearchMode,
    ) -> Result<Vec<SuggestionItem>, ProviderError> {
        let query = match mode {
            SearchMode::Title => format!("intitle:{}", text),
            SearchMode::Author => format!("inauthor:{}", text),
        };

        let request = crate::providers::ProviderRequest::get(&self.api_url)
            .param("q", query)
            .param("maxResults", SUGGEST_LIMIT.to_string())
            .param("projection", "lite");

        let response = client.execute(request).await?;

        if !response.is_success() {
            return Err(ProviderError::Http(response.status));
        }

        let json: serde_json::Value = response.json()?;

        let mut suggestions = Vec::new();
        if let Some(items) = json.get("items").and_then(|v| v.as_array()) {
            for item in items {
                let info = match item.get("volumeInfo") {
                    Some(info) => info,
                    None => continue,
                };
                let suggestion = match mode {
                    SearchMode::Title => info
                        .get("title")
                        .and_then(|v| v.as_str())
                        .map(SuggestionItem::title),
                    SearchMode::Author => info
                        .get("authors")
                        .and_then(|v| v.as_array())
                        .and_then(|arr| arr.first())
                        .and_then(|a| a.as_str())
                        .map(SuggestionItem::author),
                };
                // Volumes repeat titles and authors across editions
                if let Some(s) = suggestion {
                    if !suggestions.contains(&s) {
                        suggestions.push(s);
                    }
                }
            }
        }

        Ok(suggestions)
    }
}

/// Open Library autocomplete backend
pub struct OpenLibrary {
    base_url: String,
}

impl OpenLibrary {
    pub fn new() -> Self {
        Self {
            base_url: "https://openlibrary.org".to_string(),
        }
    }

    /// Point the backend at a different endpoint (used by tests)
    pub fn with_base_url(url: impl Into<String>) -> Self {
        Self {
            base_url: url.into(),
        }
    }
}

impl Default for OpenLibrary {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SuggestionBackend for OpenLibrary {
    fn name(&self) -> &str {
        "open_library"
    }

    async fn suggest(
        &self,
        client: &HttpClient,
        text: &str,
        mode: SearchMode,
    ) -> Result<Vec<SuggestionItem>, ProviderError> {
        let request = match mode {
            SearchMode::Title => {
                crate::providers::ProviderRequest::get(format!("{}/search.json", self.base_url))
                    .param("title", text)
                    .param("limit", SUGGEST_LIMIT.to_string())
                    .param("fields", "title")
            }
            SearchMode::Author => crate::providers::ProviderRequest::get(format!(
                "{}/search/authors.json",
                self.base_url
            ))
            .param("q", text)
            .param("limit", SUGGEST_LIMIT.to_string()),
        };

        let response = client.execute(request).await?;

        if !response.is_success() {
            return Err(ProviderError::Http(response.status));
        }

        let json: serde_json::Value = response.json()?;

        let suggestions = json
            .get("docs")
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|doc| match mode {
                        SearchMode::Title => doc
                            .get("title")
                            .and_then(|v| v.as_str())
                            .map(SuggestionItem::title),
                        SearchMode::Author => doc
                            .get("name")
                            .and_then(|v| v.as_str())
                            .map(SuggestionItem::author),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(suggestions)
    }
}
