//! Geo Search Provider Port
//!
//! Abstract interface for place autocomplete and full search.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{CompletionSuggestion, PlaceHandle, PlaceResult};
use crate::domain::errors::ProviderError;
use crate::domain::value_objects::{Coordinate, ResultTypeFilter};

/// Autocomplete entry as returned by a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCompletion {
    pub title: String,
    pub subtitle: String,
}

impl RawCompletion {
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
        }
    }
}

impl From<RawCompletion> for CompletionSuggestion {
    fn from(raw: RawCompletion) -> Self {
        CompletionSuggestion::new(raw.title, raw.subtitle)
    }
}

/// Full-search hit as returned by a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPlace {
    pub name: Option<String>,
    pub coordinate: Option<Coordinate>,
    pub handle: PlaceHandle,
}

impl RawPlace {
    /// Map into a `PlaceResult`, or `None` when the coordinate is
    /// missing or out of range.
    pub fn into_place(self) -> Option<PlaceResult> {
        let coordinate = self.coordinate.filter(Coordinate::is_valid)?;
        Some(PlaceResult::new(self.name, coordinate, self.handle))
    }
}

/// Full-search request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub result_types: ResultTypeFilter,
    pub limit: usize,
}

/// Autocomplete request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub fragment: String,
    pub result_types: ResultTypeFilter,
    pub limit: usize,
}

/// Service interface for place search
///
/// Cancellation is cooperative: callers drop the returned future.
/// An empty match set for `search` must be reported as
/// `ProviderError::NotFound`.
#[async_trait]
pub trait GeoSearchProvider: Send + Sync {
    /// Ranked suggestions for a partial query
    async fn autocomplete(
        &self,
        request: &CompletionRequest,
    ) -> Result<Vec<RawCompletion>, ProviderError>;

    /// Resolve a complete query into places
    async fn search(&self, request: &SearchRequest) -> Result<Vec<RawPlace>, ProviderError>;

    /// Provider name (e.g., "nominatim")
    fn name(&self) -> &str;
}
