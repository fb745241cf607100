//! Open Library catalog provider
//!
//! Uses the search API at `/search.json`. Pagination is 1-indexed via
//! `page`/`limit`; author searches go through the dedicated `author` field
//! instead of the general query parameter.

use super::traits::*;
use crate::results::{Book, ProviderError, ResultPage};
use crate::search::SearchMode;

const DEFAULT_API_URL: &str = "https://openlibrary.org/search.json";
const COVERS_URL: &str = "https://covers.openlibrary.org/b/id";

/// Open Library search provider
pub struct OpenLibrary {
    api_url: String,
}

impl OpenLibrary {
    pub fn new() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
        }
    }

    /// Point the provider at a different endpoint (used by tests)
    pub fn with_api_url(url: impl Into<String>) -> Self {
        Self {
            api_url: url.into(),
        }
    }

    fn parse_doc(doc: &serde_json::Value, provider_name: &str) -> Option<Book> {
        let key = doc.get("key").and_then(|v| v.as_str())?;
        let title = doc.get("title").and_then(|v| v.as_str())?;

        let mut book = Book::new(key, title, provider_name);

        book.authors = doc
            .get("author_name")
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|a| a.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default();

        book.published_date = doc
            .get("first_publish_year")
            .and_then(|v| v.as_u64())
            .map(|y| y.to_string());

        book.publisher = doc
            .get("publisher")
            .and_then(|v| v.as_array())
            .and_then(|arr| arr.first())
            .and_then(|p| p.as_str())
            .map(String::from);

        book.categories = doc
            .get("subject")
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .take(5)
                    .filter_map(|s| s.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default();

        book.page_count = doc
            .get("number_of_pages_median")
            .and_then(|v| v.as_u64())
            .map(|n| n as u32);

        book.thumbnail = doc
            .get("cover_i")
            .and_then(|v| v.as_u64())
            .map(|id| format!("{}/{}-M.jpg", COVERS_URL, id));

        book.info_url = Some(format!("https://openlibrary.org{}", key));

        Some(book)
    }
}

impl Default for OpenLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchProvider for OpenLibrary {
    fn name(&self) -> &str {
        "open_library"
    }

    fn request(&self, params: &SearchRequest) -> Result<ProviderRequest, ProviderError> {
        let query_field = match params.mode {
            SearchMode::Title => "title",
            SearchMode::Author => "author",
        };

        let request = ProviderRequest::get(&self.api_url)
            .param(query_field, params.term.clone())
            // Open Library pages are 1-indexed
            .param("page", (params.page + 1).to_string())
            .param("limit", params.page_size.to_string())
            .param(
                "fields",
                "key,title,author_name,first_publish_year,cover_i,subject,publisher,number_of_pages_median",
            );

        Ok(request)
    }

    fn response(&self, response: ProviderResponse, page: u32) -> Result<ResultPage, ProviderError> {
        if !response.is_success() {
            return Err(match response.status {
                403 => ProviderError::AccessDenied,
                429 => ProviderError::QuotaExceeded,
                status => ProviderError::Http(status),
            });
        }

        let json: serde_json::Value = response.json()?;

        let total_items = json.get("numFound").and_then(|v| v.as_u64()).unwrap_or(0);

        let items = json
            .get("docs")
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|doc| Self::parse_doc(doc, self.name()))
                    .collect()
            })
            .unwrap_or_default();

        Ok(ResultPage::new(items, total_items, page))
    }
}
