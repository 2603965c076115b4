//! Placefinder Library
//!
//! Location search orchestration: incremental autocomplete, cancellable
//! full search, map viewport framing and street-level previews.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure types and logic
//!   - `entities/`: CompletionSuggestion, PlaceResult, PreviewScene
//!   - `value_objects/`: Coordinate, CoordinateSpan, Viewport, ResultType
//!   - `services/`: Region framing for result sets
//!   - `errors`: SearchError (public) and ProviderError (ports)
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `services/`: GeoSearchProvider, PreviewSceneProvider
//!
//! - **Application** (`application/`): SearchOrchestrator and AutocompleteFeed
//!
//! # Usage
//!
//! ```rust,ignore
//! use placefinder::{OrchestratorConfig, SearchOrchestrator, NoPreviewScenes};
//!
//! let orchestrator = SearchOrchestrator::new(provider, NoPreviewScenes, OrchestratorConfig::default());
//! orchestrator.update_fragment("coff");
//! orchestrator.search("coffee").await;
//! let state = orchestrator.state();
//! ```

pub mod application;
pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use application::{
    AutocompleteFeed, CompletionDelegate, FeedConfig, OrchestratorConfig, PreviewOutcome,
    SearchOrchestrator, SearchOutcome,
};
pub use domain::{
    CompletionSuggestion, Coordinate, CoordinateSpan, OrchestratorState, PlaceHandle,
    PlaceResult, PreviewScene, ProviderError, RegionConfig, ResultType, ResultTypeFilter,
    SearchError, Viewport, UNKNOWN_PLACE_NAME,
};
pub use ports::{
    CompletionRequest, GeoSearchProvider, NoPreviewScenes, PreviewSceneProvider, RawCompletion,
    RawPlace, SearchRequest,
};
