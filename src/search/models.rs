//! Search mode and error models

use crate::results::ProviderError;
use serde::{Deserialize, Serialize};

/// What the search term names
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Match against book titles
    #[default]
    Title,
    /// Match against author names
    Author,
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Title => write!(f, "title"),
            Self::Author => write!(f, "author"),
        }
    }
}

/// Errors surfaced by controller operations
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum SearchError {
    /// The provider call failed; the session has been cleared and the
    /// caller should offer a retry
    #[error(transparent)]
    Provider(#[from] ProviderError),
    /// The search term was blank; state is untouched
    #[error("search term must not be blank")]
    BlankQuery,
    /// Everything the provider reported has already been loaded; state is
    /// untouched
    #[error("no more results to load")]
    NoMoreResults,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_display() {
        assert_eq!(SearchMode::Title.to_string(), "title");
        assert_eq!(SearchMode::Author.to_string(), "author");
    }

    #[test]
    fn test_mode_serde_lowercase() {
        let mode: SearchMode = serde_json::from_str("\"author\"").unwrap();
        assert_eq!(mode, SearchMode::Author);
        assert_eq!(serde_json::to_string(&SearchMode::Title).unwrap(), "\"title\"");
    }

    #[test]
    fn test_provider_error_conversion() {
        let err: SearchError = ProviderError::Timeout.into();
        assert_eq!(err, SearchError::Provider(ProviderError::Timeout));
    }
}
