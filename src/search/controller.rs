//! Search execution and session orchestration
//!
//! The controller owns one [`SearchSession`] and is the only writer to it.
//! Every issued request carries a sequence number from a monotonically
//! increasing counter; a reply is applied only if its number is still the
//! newest at arrival time. Network calls are never force-aborted;
//! superseded replies are simply discarded, so applied results stay ordered
//! by request issuance even when the network reorders completions.

use super::models::{SearchError, SearchMode};
use super::session::{SearchSession, SessionStatus};
use crate::network::HttpClient;
use crate::providers::{SearchProvider, SearchRequest};
use crate::results::{Book, ProviderError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Pagination-aware search controller over one catalog provider
pub struct SearchController {
    /// HTTP client for provider requests
    client: HttpClient,
    /// The catalog provider this controller searches
    provider: Arc<dyn SearchProvider>,
    /// The session this controller owns
    session: Arc<RwLock<SearchSession>>,
    /// Issuance counter for stale-response rejection
    seq: AtomicU64,
    /// Last genre term applied from navigation state
    last_genre: RwLock<Option<String>>,
    /// Results per page
    page_size: u32,
    /// Per-request timeout
    request_timeout: Duration,
    /// Highest page index load-more may reach
    max_page: u32,
}

impl SearchController {
    /// Create a controller for a provider
    pub fn new(client: HttpClient, provider: Arc<dyn SearchProvider>) -> Self {
        let page_size = provider.page_size();
        Self {
            client,
            provider,
            session: Arc::new(RwLock::new(SearchSession::default())),
            seq: AtomicU64::new(0),
            last_genre: RwLock::new(None),
            page_size,
            request_timeout: Duration::from_secs(5),
            max_page: 100,
        }
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the page size
    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = size.max(1);
        self
    }

    /// Set the highest page index load-more may reach
    pub fn with_max_page(mut self, max_page: u32) -> Self {
        self.max_page = max_page;
        self
    }

    /// Run a search for `term` at `page`.
    ///
    /// Page 0 starts a new session (prior accumulation is discarded on
    /// success); higher pages append. A blank term is rejected without
    /// touching state or the provider. On provider failure the session is
    /// cleared and the error returned; the caller decides about retrying.
    pub async fn search(&self, term: &str, mode: SearchMode, page: u32) -> Result<(), SearchError> {
        if term.trim().is_empty() {
            debug!("Ignoring search with blank term");
            return Err(SearchError::BlankQuery);
        }

        let params = SearchRequest {
            term: term.to_string(),
            mode,
            page,
            page_size: self.page_size,
            lang: "en".to_string(),
        };
        let request = self.provider.request(&params)?;

        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.session.write().unwrap().begin(term, mode);

        debug!(
            "Searching {} for '{}' ({} mode, page {}, start {})",
            self.provider.name(),
            term,
            mode,
            page,
            params.start_index()
        );

        let outcome = match timeout(self.request_timeout, self.client.execute(request)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout),
        };

        // A newer request was issued while this one was in flight; its
        // owner decides the session state now.
        if self.seq.load(Ordering::SeqCst) != seq {
            debug!("Discarding stale response for '{}' (page {})", term, page);
            return Ok(());
        }

        match outcome.and_then(|response| self.provider.response(response, page)) {
            Ok(result_page) => {
                let mut session = self.session.write().unwrap();
                if page > 0 && !session.expects_append(page) {
                    debug!(
                        "Discarding out-of-order page {} (expected {})",
                        page,
                        session.page_index() + 1
                    );
                    return Ok(());
                }
                info!(
                    "{} returned {} items (total {}) for '{}' page {}",
                    self.provider.name(),
                    result_page.len(),
                    result_page.total_items,
                    term,
                    page
                );
                session.apply_page(result_page);
                Ok(())
            }
            Err(e) => {
                warn!("Search failed on {}: {}", self.provider.name(), e);
                self.session.write().unwrap().fail();
                Err(e.into())
            }
        }
    }

    /// Fetch and append the next page of the current session.
    ///
    /// Fails with [`SearchError::NoMoreResults`], leaving state unchanged,
    /// once everything the provider reported has been loaded.
    pub async fn load_more(&self) -> Result<(), SearchError> {
        let (term, mode, next_page) = {
            let session = self.session.read().unwrap();
            if !session.has_more() {
                return Err(SearchError::NoMoreResults);
            }
            (
                session.query().to_string(),
                session.mode(),
                session.page_index() + 1,
            )
        };

        if next_page > self.max_page {
            return Err(SearchError::NoMoreResults);
        }

        self.search(&term, mode, next_page).await
    }

    /// Start a fresh page-0 search for `term` in the current mode,
    /// bypassing form submission (preset filters, genre links)
    pub async fn quick_search(&self, term: &str) -> Result<(), SearchError> {
        let mode = self.session.read().unwrap().mode();
        self.search(term, mode, 0).await
    }

    /// Switch search mode, resetting the session and clearing the query.
    ///
    /// In-flight replies are invalidated; pending suggestions belong to the
    /// debouncer and are reset by its owner.
    pub fn change_mode(&self, mode: SearchMode) {
        self.seq.fetch_add(1, Ordering::SeqCst);
        self.session.write().unwrap().reset(mode);
        debug!("Switched to {} mode", mode);
    }

    /// Apply a genre term arriving from navigation/URL state.
    ///
    /// Triggers a quick search once per distinct incoming term; repeated
    /// delivery of the same term is a no-op.
    pub async fn apply_genre(&self, term: &str) -> Result<(), SearchError> {
        {
            let mut last = self.last_genre.write().unwrap();
            if last.as_deref() == Some(term) {
                debug!("Genre '{}' already applied", term);
                return Ok(());
            }
            *last = Some(term.to_string());
        }
        self.quick_search(term).await
    }

    /// Snapshot of the current session
    pub fn session(&self) -> SearchSession {
        self.session.read().unwrap().clone()
    }

    /// Current session status
    pub fn status(&self) -> SessionStatus {
        self.session.read().unwrap().status()
    }

    /// Loaded results so far
    pub fn results(&self) -> Vec<Book> {
        self.session.read().unwrap().results().to_vec()
    }

    /// Index of the most recently applied page
    pub fn page_index(&self) -> u32 {
        self.session.read().unwrap().page_index()
    }

    /// Total matches the provider reported for the current query
    pub fn total_available(&self) -> u64 {
        self.session.read().unwrap().total_available()
    }

    /// Whether more results can be loaded
    pub fn has_more(&self) -> bool {
        self.session.read().unwrap().has_more()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::google_books::GoogleBooks;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn volumes_body(prefix: &str, count: usize, total: u64) -> String {
        let items: Vec<String> = (0..count)
            .map(|i| {
                format!(
                    r#"{{"id":"{prefix}{i}","volumeInfo":{{"title":"{prefix} {i}"}}}}"#,
                    prefix = prefix,
                    i = i
                )
            })
            .collect();
        format!(
            r#"{{"totalItems":{},"items":[{}]}}"#,
            total,
            items.join(",")
        )
    }

    fn controller_for(server: &MockServer) -> SearchController {
        let provider: Arc<dyn SearchProvider> = Arc::new(GoogleBooks::with_api_url(format!(
            "{}/volumes",
            server.uri()
        )));
        SearchController::new(HttpClient::new().unwrap(), provider)
    }

    #[tokio::test]
    async fn test_new_search_replaces() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "dune"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(volumes_body("a", 10, 45), "application/json"),
            )
            .mount(&server)
            .await;

        let controller = controller_for(&server);
        controller.search("dune", SearchMode::Title, 0).await.unwrap();

        assert_eq!(controller.results().len(), 10);
        assert_eq!(controller.total_available(), 45);
        assert_eq!(controller.status(), SessionStatus::Loaded);
        assert_eq!(controller.page_index(), 0);
    }

    #[tokio::test]
    async fn test_load_more_appends() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("startIndex", "0"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(volumes_body("a", 10, 45), "application/json"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("startIndex", "10"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(volumes_body("b", 10, 45), "application/json"),
            )
            .mount(&server)
            .await;

        let controller = controller_for(&server);
        controller.search("dune", SearchMode::Title, 0).await.unwrap();
        controller.load_more().await.unwrap();

        assert_eq!(controller.results().len(), 20);
        assert_eq!(controller.page_index(), 1);
        assert_eq!(controller.total_available(), 45);
        // Prior items survive the append
        assert_eq!(controller.results()[0].id, "a0");
        assert_eq!(controller.results()[10].id, "b0");
    }

    #[tokio::test]
    async fn test_blank_search_is_rejected_without_provider_call() {
        let server = MockServer::start().await;
        let controller = controller_for(&server);

        let err = controller.search("   ", SearchMode::Title, 0).await.unwrap_err();
        assert_eq!(err, SearchError::BlankQuery);
        assert_eq!(controller.status(), SessionStatus::Idle);
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_author_mode_qualifies_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "inauthor:asimov"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(volumes_body("a", 5, 5), "application/json"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let controller = controller_for(&server);
        controller
            .search("asimov", SearchMode::Author, 0)
            .await
            .unwrap();

        assert_eq!(controller.results().len(), 5);
    }

    #[tokio::test]
    async fn test_empty_page_zero_sets_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(r#"{"totalItems":0,"items":[]}"#, "application/json"),
            )
            .mount(&server)
            .await;

        let controller = controller_for(&server);
        controller.search("zzzz", SearchMode::Title, 0).await.unwrap();

        assert_eq!(controller.status(), SessionStatus::Empty);
        assert!(controller.results().is_empty());
    }

    #[tokio::test]
    async fn test_anomalous_total_with_no_items_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(r#"{"totalItems":5}"#, "application/json"),
            )
            .mount(&server)
            .await;

        let controller = controller_for(&server);
        controller.search("zzzz", SearchMode::Title, 0).await.unwrap();

        assert_eq!(controller.status(), SessionStatus::Empty);
        assert_eq!(controller.total_available(), 0);
    }

    #[tokio::test]
    async fn test_provider_error_clears_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "dune"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(volumes_body("a", 10, 45), "application/json"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("q", "broken"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let controller = controller_for(&server);
        controller.search("dune", SearchMode::Title, 0).await.unwrap();

        let err = controller
            .search("broken", SearchMode::Title, 0)
            .await
            .unwrap_err();
        assert_eq!(err, SearchError::Provider(ProviderError::Http(500)));
        assert_eq!(controller.status(), SessionStatus::Empty);
        assert!(controller.results().is_empty());
        assert_eq!(controller.total_available(), 0);
    }

    #[tokio::test]
    async fn test_exhausted_load_more_is_idempotent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(volumes_body("a", 3, 3), "application/json"),
            )
            .mount(&server)
            .await;

        let controller = controller_for(&server);
        controller.search("dune", SearchMode::Title, 0).await.unwrap();
        let before = controller.session();

        let err = controller.load_more().await.unwrap_err();
        assert_eq!(err, SearchError::NoMoreResults);

        let after = controller.session();
        assert_eq!(after.results().len(), before.results().len());
        assert_eq!(after.page_index(), before.page_index());
        assert_eq!(after.status(), before.status());
    }

    #[tokio::test]
    async fn test_load_more_on_idle_session() {
        let server = MockServer::start().await;
        let controller = controller_for(&server);

        assert_eq!(
            controller.load_more().await.unwrap_err(),
            SearchError::NoMoreResults
        );
    }

    #[tokio::test]
    async fn test_change_mode_resets_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(volumes_body("a", 10, 45), "application/json"),
            )
            .mount(&server)
            .await;

        let controller = controller_for(&server);
        controller.search("dune", SearchMode::Title, 0).await.unwrap();

        controller.change_mode(SearchMode::Author);

        let session = controller.session();
        assert_eq!(session.query(), "");
        assert_eq!(session.mode(), SearchMode::Author);
        assert_eq!(session.page_index(), 0);
        assert!(session.results().is_empty());
        assert_eq!(session.status(), SessionStatus::Idle);
    }

    #[tokio::test]
    async fn test_genre_applied_once_per_distinct_term() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "fantasy"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(volumes_body("f", 10, 30), "application/json"),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("q", "mystery"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(volumes_body("m", 10, 20), "application/json"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let controller = controller_for(&server);
        controller.apply_genre("fantasy").await.unwrap();
        controller.apply_genre("fantasy").await.unwrap();
        assert_eq!(controller.session().query(), "fantasy");

        controller.apply_genre("mystery").await.unwrap();
        assert_eq!(controller.session().query(), "mystery");
    }

    #[tokio::test]
    async fn test_stale_response_does_not_overwrite_newer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "slow dune"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(volumes_body("slow", 10, 99), "application/json")
                    .set_delay(Duration::from_millis(300)),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("q", "fast dune"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(volumes_body("fast", 10, 45), "application/json"),
            )
            .mount(&server)
            .await;

        let controller = controller_for(&server);
        // Both searches run concurrently; the slow one was issued first and
        // resolves last. Its reply must not clobber the newer result.
        let (first, second) = tokio::join!(
            controller.search("slow dune", SearchMode::Title, 0),
            controller.search("fast dune", SearchMode::Title, 0),
        );
        first.unwrap();
        second.unwrap();

        assert_eq!(controller.session().query(), "fast dune");
        assert_eq!(controller.total_available(), 45);
        assert_eq!(controller.results()[0].id, "fast0");
    }

    #[tokio::test]
    async fn test_rapid_page_one_requests_apply_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("startIndex", "0"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(volumes_body("a", 10, 45), "application/json"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("startIndex", "10"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(volumes_body("b", 10, 45), "application/json"),
            )
            .mount(&server)
            .await;

        let controller = controller_for(&server);
        controller.search("dune", SearchMode::Title, 0).await.unwrap();

        // Two rapid clicks both target page 1; only one append lands.
        let (first, second) = tokio::join!(
            controller.search("dune", SearchMode::Title, 1),
            controller.search("dune", SearchMode::Title, 1),
        );
        first.unwrap();
        second.unwrap();

        assert_eq!(controller.results().len(), 20);
        assert_eq!(controller.page_index(), 1);
    }
}
