//! OrchestratorState - observable snapshot of the search session

use serde::{Deserialize, Serialize};

use crate::domain::entities::{CompletionSuggestion, PlaceResult, PreviewScene};
use crate::domain::errors::SearchError;
use crate::domain::value_objects::Viewport;

/// Immutable snapshot published after every mutation.
///
/// `viewport` is `None` exactly when `results` is empty, and `selection`
/// (when set) is always one of `results`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrchestratorState {
    pub fragment: String,
    pub completions: Vec<CompletionSuggestion>,
    /// Suggestions for `fragment` are still outstanding
    #[serde(default)]
    pub completing: bool,
    pub results: Vec<PlaceResult>,
    pub viewport: Option<Viewport>,
    pub error: Option<SearchError>,
    pub selection: Option<PlaceResult>,
    pub preview: Option<PreviewScene>,
}

impl OrchestratorState {
    pub fn has_results(&self) -> bool {
        !self.results.is_empty()
    }

    /// Whether the presentation layer should show an alert
    pub fn is_error_presented(&self) -> bool {
        self.error.as_ref().is_some_and(SearchError::is_user_visible)
    }

    pub fn result_names(&self) -> Vec<&str> {
        self.results.iter().map(|r| r.name.as_str()).collect()
    }
}
