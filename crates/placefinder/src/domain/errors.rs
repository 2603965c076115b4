//! Domain Errors
//!
//! Error types for search operations.
//!
//! `ProviderError` is what the provider ports return. It never reaches the
//! observable state: the orchestrator normalizes it into `SearchError`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Search errors as seen by the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SearchError {
    /// Superseded by a newer operation of the same class
    #[error("Search cancelled")]
    Cancelled,

    /// Valid query with zero matches
    #[error("No results found for '{0}'")]
    NotFound(String),

    /// Provider-level failure (network, service, malformed response)
    #[error("Search failed: {0}")]
    Failed(String),
}

impl SearchError {
    /// Only `Failed` warrants an alert; the other variants are soft states.
    pub fn is_user_visible(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Errors reported by provider implementations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("Request cancelled")]
    Cancelled,

    #[error("No matches")]
    NotFound,

    #[error("Rate limited by provider")]
    RateLimited,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Service error ({status}): {message}")]
    Service { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Provider unavailable: {0}")]
    Unavailable(String),
}

impl ProviderError {
    /// Normalize into the public taxonomy for the given query.
    pub fn into_search_error(self, query: &str) -> SearchError {
        match self {
            Self::Cancelled => SearchError::Cancelled,
            Self::NotFound => SearchError::NotFound(query.to_string()),
            other => SearchError::Failed(other.to_string()),
        }
    }
}
