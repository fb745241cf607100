//! Bookscout: an incremental book-search core written in Rust
//!
//! Wraps external book-catalog APIs behind provider adapters and drives
//! them through a pagination-aware search controller with debounced
//! autocomplete suggestions.

pub mod config;
pub mod network;
pub mod providers;
pub mod results;
pub mod search;
pub mod suggest;

pub use config::Settings;
pub use providers::{ProviderLoader, SearchProvider};
pub use results::{Book, ProviderError, ResultPage, SuggestionItem};
pub use search::{SearchController, SearchError, SearchMode, SearchSession, SessionStatus};
pub use suggest::SuggestDebouncer;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default number of results fetched per page
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Default quiescence window for suggestion debouncing in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
