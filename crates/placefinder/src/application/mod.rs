//! Application Layer
//!
//! Use cases built on the domain and ports:
//! - `SearchOrchestrator`: session state, supersession, publishing
//! - `AutocompleteFeed`: sequence-gated suggestion delivery

mod config;
mod feed;
mod orchestrator;
mod slot;

pub use config::{OrchestratorConfig, DEFAULT_COMPLETION_LIMIT, DEFAULT_SEARCH_LIMIT};
pub use feed::{AutocompleteFeed, CompletionDelegate, FeedConfig};
pub use orchestrator::{PreviewOutcome, SearchOrchestrator, SearchOutcome};
