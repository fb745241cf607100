//! Session state for one logical search
//!
//! A session aggregates the query, mode, and every page fetched so far.
//! Fields are private; the controller mutates a session only through the
//! transition methods here, which keep the accumulation invariants true:
//! `results.len() <= total_available` at all times, and `page_index` moves
//! by exactly one per appended page.

use super::models::SearchMode;
use crate::results::{Book, ResultPage};
use serde::{Deserialize, Serialize};

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// No search has run yet
    #[default]
    Idle,
    /// A request is in flight
    Searching,
    /// At least one page of results is loaded
    Loaded,
    /// The search completed with nothing to show (no matches, or the
    /// provider failed)
    Empty,
}

/// The accumulated state of one logical search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSession {
    query: String,
    mode: SearchMode,
    page_index: u32,
    results: Vec<Book>,
    total_available: u64,
    status: SessionStatus,
}

impl SearchSession {
    /// Create an idle session in the given mode
    pub fn new(mode: SearchMode) -> Self {
        Self {
            query: String::new(),
            mode,
            page_index: 0,
            results: vec![],
            total_available: 0,
            status: SessionStatus::Idle,
        }
    }

    /// Record that a search has been issued
    pub(crate) fn begin(&mut self, term: &str, mode: SearchMode) {
        self.query = term.to_string();
        self.mode = mode;
        self.status = SessionStatus::Searching;
    }

    /// Apply a provider page.
    ///
    /// Page 0 replaces the accumulation and takes the provider total;
    /// later pages append and leave the total untouched. An appended page
    /// that would overshoot the total is truncated.
    pub(crate) fn apply_page(&mut self, page: ResultPage) {
        if page.page == 0 {
            if page.is_effectively_empty() {
                self.results.clear();
                self.total_available = 0;
                self.status = SessionStatus::Empty;
            } else {
                self.total_available = page.total_items;
                self.results = page.items;
                self.truncate_to_total();
                self.status = SessionStatus::Loaded;
            }
            self.page_index = 0;
        } else {
            self.results.extend(page.items);
            self.truncate_to_total();
            self.page_index = page.page;
            self.status = SessionStatus::Loaded;
        }
    }

    /// Record a failed search: stale results must not stay on display
    pub(crate) fn fail(&mut self) {
        self.results.clear();
        self.total_available = 0;
        self.page_index = 0;
        self.status = SessionStatus::Empty;
    }

    /// Reset to idle, clearing the query (mode switch / discontinuous change)
    pub(crate) fn reset(&mut self, mode: SearchMode) {
        self.query.clear();
        self.mode = mode;
        self.page_index = 0;
        self.results.clear();
        self.total_available = 0;
        self.status = SessionStatus::Idle;
    }

    fn truncate_to_total(&mut self) {
        if self.results.len() as u64 > self.total_available {
            self.results.truncate(self.total_available as usize);
        }
    }

    /// Whether an append targeting `page` is the one this session expects
    pub(crate) fn expects_append(&self, page: u32) -> bool {
        self.status == SessionStatus::Searching && page == self.page_index + 1
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    pub fn results(&self) -> &[Book] {
        &self.results
    }

    pub fn total_available(&self) -> u64 {
        self.total_available
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Whether the provider reports more results than are loaded
    pub fn has_more(&self) -> bool {
        (self.results.len() as u64) < self.total_available
    }
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new(SearchMode::default())
    }
}
