//! Debounced suggestion fetching
//!
//! Rapid keystrokes schedule and reschedule a single pending fetch task;
//! only input that survives the quiescence window reaches the backend.
//! Staleness is decided by a sequence number checked after the delay and
//! again after the fetch, so a superseded request never publishes: the
//! last submitted text wins, not the last reply to arrive.

use super::backends::SuggestionBackend;
use crate::network::HttpClient;
use crate::results::SuggestionItem;
use crate::search::SearchMode;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// Debouncer in front of a suggestion backend.
///
/// Suggestions are published on a watch channel; subscribers always see the
/// list for the most recently submitted text. Backend failures publish an
/// empty list; callers never learn the error identity, only that
/// suggestions are unavailable.
pub struct SuggestDebouncer {
    client: HttpClient,
    backend: Arc<dyn SuggestionBackend>,
    delay: Duration,
    /// Submission counter; replies from older submissions are discarded
    seq: Arc<AtomicU64>,
    /// Single pending-task slot; scheduling cancels the previous task
    pending: Mutex<Option<JoinHandle<()>>>,
    tx: Arc<watch::Sender<Vec<SuggestionItem>>>,
}

impl SuggestDebouncer {
    /// Create a debouncer with the default quiescence window
    pub fn new(client: HttpClient, backend: Arc<dyn SuggestionBackend>) -> Self {
        let (tx, _rx) = watch::channel(Vec::new());
        Self {
            client,
            backend,
            delay: Duration::from_millis(crate::DEFAULT_DEBOUNCE_MS),
            seq: Arc::new(AtomicU64::new(0)),
            pending: Mutex::new(None),
            tx: Arc::new(tx),
        }
    }

    /// Set the quiescence window
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Subscribe to published suggestion lists
    pub fn subscribe(&self) -> watch::Receiver<Vec<SuggestionItem>> {
        self.tx.subscribe()
    }

    /// Submit the current input text.
    ///
    /// Restarts the delay window; only the last call within a window
    /// triggers a fetch. Blank text publishes an empty list immediately
    /// without contacting the backend.
    pub fn submit(&self, text: &str, mode: SearchMode) {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.cancel_pending();

        let trimmed = text.trim();
        if trimmed.is_empty() {
            let _ = self.tx.send(Vec::new());
            return;
        }

        let text = trimmed.to_string();
        let client = self.client.clone();
        let backend = self.backend.clone();
        let counter = self.seq.clone();
        let tx = self.tx.clone();
        let delay = self.delay;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if counter.load(Ordering::SeqCst) != seq {
                return;
            }

            let suggestions = match backend.suggest(&client, &text, mode).await {
                Ok(list) => list,
                Err(e) => {
                    debug!("Suggestion fetch for '{}' failed: {}", text, e);
                    Vec::new()
                }
            };

            // A newer submission may have arrived while the fetch was in
            // flight; its task owns the channel now.
            if counter.load(Ordering::SeqCst) == seq {
                let _ = tx.send(suggestions);
            }
        });

        *self.pending.lock().unwrap() = Some(handle);
    }

    /// Drop pending work and publish an empty list (mode switch, selection)
    pub fn reset(&self) {
        self.seq.fetch_add(1, Ordering::SeqCst);
        self.cancel_pending();
        let _ = self.tx.send(Vec::new());
    }

    fn cancel_pending(&self) {
        if let Some(handle) = self.pending.lock().unwrap().take() {
            handle.abort();
        }
    }
}
