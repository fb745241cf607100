//! Debounced autocomplete suggestions
//!
//! Provides suggestion fetching from the catalog providers, debounced so
//! rapid typing issues at most one request per quiescent period.

mod backends;
mod debouncer;

pub use backends::{get_backend, list_backends, GoogleBooks, OpenLibrary, SuggestionBackend};
pub use debouncer::SuggestDebouncer;

use crate::network::HttpClient;
use crate::results::SuggestionItem;
use crate::search::SearchMode;
use anyhow::Result;

/// Fetch suggestions from a backend by name, without debouncing
pub async fn fetch_suggestions(
    client: &HttpClient,
    backend: &str,
    text: &str,
    mode: SearchMode,
) -> Result<Vec<SuggestionItem>> {
    let backend = get_backend(backend)
        .ok_or_else(|| anyhow::anyhow!("Unknown suggestion backend: {}", backend))?;

    Ok(backend.suggest(client, text, mode).await?)
}
