//! Result type definitions

use serde::{Deserialize, Serialize};

/// A single book summary returned by a catalog provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Book {
    /// Provider-scoped volume identifier
    pub id: String,
    /// The title of the book
    pub title: String,
    /// Author names, in the order the provider lists them
    #[serde(default)]
    pub authors: Vec<String>,
    /// Description or synopsis snippet
    pub description: Option<String>,
    /// Publisher name
    pub publisher: Option<String>,
    /// Published date as the provider reports it (year or full date)
    pub published_date: Option<String>,
    /// Subject/genre labels
    #[serde(default)]
    pub categories: Vec<String>,
    /// Page count, when the provider knows it
    pub page_count: Option<u32>,
    /// Cover thumbnail URL
    pub thumbnail: Option<String>,
    /// Link to the provider's detail page
    pub info_url: Option<String>,
    /// Provider that returned this book
    pub provider: String,
}

impl Book {
    /// Create a new book summary
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            authors: vec![],
            description: None,
            publisher: None,
            published_date: None,
            categories: vec![],
            page_count: None,
            thumbnail: None,
            info_url: None,
            provider: provider.into(),
        }
    }

    /// Add authors
    pub fn with_authors(mut self, authors: Vec<String>) -> Self {
        self.authors = authors;
        self
    }

    /// Add a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a cover thumbnail URL
    pub fn with_thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail = Some(url.into());
        self
    }

    /// Display string for the author list
    pub fn author_line(&self) -> String {
        self.authors.join(", ")
    }
}

/// One page of results from a provider, tagged with the page index it answers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultPage {
    /// Books on this page, in provider order
    pub items: Vec<Book>,
    /// Total matches the provider reports for the whole query
    pub total_items: u64,
    /// Zero-based page index this page answers
    pub page: u32,
}

impl ResultPage {
    /// Create a new result page
    pub fn new(items: Vec<Book>, total_items: u64, page: u32) -> Self {
        Self {
            items,
            total_items,
            page,
        }
    }

    /// An empty page-0 reply
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// A page counts as empty when it carries no items, regardless of the
    /// total the provider claims (nonzero total with no items is a provider
    /// anomaly and is handled the same as a true empty reply).
    pub fn is_effectively_empty(&self) -> bool {
        self.items.is_empty() || self.total_items == 0
    }
}

/// A single autocomplete suggestion
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SuggestionItem {
    /// Suggested completion text
    pub text: String,
    /// What the suggestion names
    pub kind: SuggestionKind,
}

impl SuggestionItem {
    pub fn title(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: SuggestionKind::Title,
        }
    }

    pub fn author(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: SuggestionKind::Author,
        }
    }
}

/// Kind tag for a suggestion
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Title,
    Author,
}

/// Provider failure kinds
#[derive(Debug, Clone, thiserror::Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProviderError {
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP error: {0}")]
    Http(u16),
    #[error("failed to parse provider response: {0}")]
    Parse(String),
    #[error("access denied")]
    AccessDenied,
    #[error("quota exceeded")]
    QuotaExceeded,
}
