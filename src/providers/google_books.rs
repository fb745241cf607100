//! Google Books catalog provider
//!
//! Uses the official volumes API. Pagination is offset-based via
//! `startIndex`/`maxResults`; author searches qualify the query with the
//! `inauthor:` operator so the provider restricts matching to author names.

use super::traits::*;
use crate::config::ProviderConfig;
use crate::results::{Book, ProviderError, ResultPage};
use crate::search::SearchMode;

const DEFAULT_API_URL: &str = "https://www.googleapis.com/books/v1/volumes";

/// Google Books volumes search provider
pub struct GoogleBooks {
    api_url: String,
    api_key: Option<String>,
}

impl GoogleBooks {
    pub fn new() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
        }
    }

    /// Point the provider at a different endpoint (used by tests)
    pub fn with_api_url(url: impl Into<String>) -> Self {
        Self {
            api_url: url.into(),
            api_key: None,
        }
    }

    fn parse_volume(item: &serde_json::Value, provider_name: &str) -> Option<Book> {
        let id = item.get("id").and_then(|v| v.as_str())?;
        let info = item.get("volumeInfo")?;
        let title = info.get("title").and_then(|v| v.as_str())?;

        let mut book = Book::new(id, title, provider_name);

        book.authors = info
            .get("authors")
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|a| a.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default();

        book.description = info
            .get("description")
            .and_then(|v| v.as_str())
            .map(String::from);

        book.publisher = info
            .get("publisher")
            .and_then(|v| v.as_str())
            .map(String::from);

        book.published_date = info
            .get("publishedDate")
            .and_then(|v| v.as_str())
            .map(String::from);

        book.categories = info
            .get("categories")
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|c| c.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default();

        book.page_count = info
            .get("pageCount")
            .and_then(|v| v.as_u64())
            .map(|n| n as u32);

        book.thumbnail = info
            .get("imageLinks")
            .and_then(|l| l.get("thumbnail").or_else(|| l.get("smallThumbnail")))
            .and_then(|v| v.as_str())
            .map(String::from);

        book.info_url = info
            .get("infoLink")
            .and_then(|v| v.as_str())
            .map(String::from);

        Some(book)
    }
}

impl Default for GoogleBooks {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchProvider for GoogleBooks {
    fn name(&self) -> &str {
        "google_books"
    }

    fn request(&self, params: &SearchRequest) -> Result<ProviderRequest, ProviderError> {
        let query = match params.mode {
            SearchMode::Title => params.term.clone(),
            SearchMode::Author => format!("inauthor:{}", params.term),
        };

        let mut request = ProviderRequest::get(&self.api_url)
            .param("q", query)
            .param("startIndex", params.start_index().to_string())
            .param("maxResults", params.page_size.to_string())
            .param("printType", "books");

        if let Some(ref key) = self.api_key {
            request = request.param("key", key.clone());
        }

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

        let total_items = json.get("totalItems").and_then(|v| v.as_u64()).unwrap_or(0);

        let items = json
            .get("items")
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|item| Self::parse_volume(item, self.name()))
                    .collect()
            })
            .unwrap_or_default();

        Ok(ResultPage::new(items, total_items, page))
    }

    fn init(&mut self, config: &ProviderConfig) -> anyhow::Result<()> {
        self.api_key = config.api_key.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RESPONSE: &str = r#"{
        "kind": "books#volumes",
        "totalItems": 45,
        "items": [
            {
                "id": "B1",
                "volumeInfo": {
                    "title": "Dune",
                    "authors": ["Frank Herbert"],
                    "publisher": "Chilton Books",
                    "publishedDate": "1965",
                    "description": "Desert planet epic",
                    "pageCount": 412,
                    "categories": ["Fiction"],
                    "imageLinks": {"thumbnail": "https://books.example/dune.jpg"},
                    "infoLink": "https://books.example/dune"
                }
            },
            {
                "id": "B2",
                "volumeInfo": {
                    "title": "Dune Messiah",
                    "authors": ["Frank Herbert"]
                }
            }
        ]
    }"#;

    #[test]
    fn test_title_request() {
        let provider = GoogleBooks::new();
        let params = SearchRequest::new("dune");
        let request = provider.request(&params).unwrap();

        assert!(request.url.contains("googleapis.com"));
        assert_eq!(request.params.get("q").unwrap(), "dune");
        assert_eq!(request.params.get("startIndex").unwrap(), "0");
        assert_eq!(request.params.get("maxResults").unwrap(), "10");
    }

    #[test]
    fn test_author_request_is_qualified() {
        let provider = GoogleBooks::new();
        let params = SearchRequest::new("asimov").with_mode(SearchMode::Author);
        let request = provider.request(&params).unwrap();

        assert_eq!(request.params.get("q").unwrap(), "inauthor:asimov");
    }

    #[test]
    fn test_pagination_offset() {
        let provider = GoogleBooks::new();
        let params = SearchRequest::new("dune").with_page(2).with_page_size(10);
        let request = provider.request(&params).unwrap();

        assert_eq!(request.params.get("startIndex").unwrap(), "20");
    }

    #[test]
    fn test_api_key_propagation() {
        let mut provider = GoogleBooks::new();
        let config = ProviderConfig {
            api_key: Some("secret".to_string()),
            ..Default::default()
        };
        provider.init(&config).unwrap();

        let request = provider.request(&SearchRequest::new("dune")).unwrap();
        assert_eq!(request.params.get("key").unwrap(), "secret");
    }

    #[test]
    fn test_response_parsing() {
        let provider = GoogleBooks::new();
        let response = ProviderResponse {
            status: 200,
            text: SAMPLE_RESPONSE.to_string(),
            url: DEFAULT_API_URL.to_string(),
        };

        let page = provider.response(response, 0).unwrap();
        assert_eq!(page.total_items, 45);
        assert_eq!(page.len(), 2);
        assert_eq!(page.page, 0);

        let dune = &page.items[0];
        assert_eq!(dune.id, "B1");
        assert_eq!(dune.author_line(), "Frank Herbert");
        assert_eq!(dune.page_count, Some(412));
        assert!(dune.thumbnail.is_some());

        // Sparse volumes still parse
        assert_eq!(page.items[1].title, "Dune Messiah");
        assert!(page.items[1].thumbnail.is_none());
    }

    #[test]
    fn test_error_classification() {
        let provider = GoogleBooks::new();
        let forbidden = ProviderResponse {
            status: 403,
            text: String::new(),
            url: String::new(),
        };
        assert_eq!(
            provider.response(forbidden, 0).unwrap_err(),
            ProviderError::AccessDenied
        );

        let throttled = ProviderResponse {
            status: 429,
            text: String::new(),
            url: String::new(),
        };
        assert_eq!(
            provider.response(throttled, 0).unwrap_err(),
            ProviderError::QuotaExceeded
        );
    }
}
