//! Result types shared across providers, suggestions, and sessions

mod types;

pub use types::{Book, ProviderError, ResultPage, SuggestionItem, SuggestionKind};
