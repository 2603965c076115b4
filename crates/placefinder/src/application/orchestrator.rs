//! Search Orchestrator (Use Case)
//!
//! Owns the search session state and mediates between the presentation
//! layer and the providers.
//!
//! All writes to the state happen under one mutex (which also guards the
//! operation slots) and are published through a `watch` channel. Provider
//! calls run outside the lock; when they complete, the owning operation
//! checks that its slot generation is still live before writing anything.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::application::config::OrchestratorConfig;
use crate::application::feed::{AutocompleteFeed, CompletionDelegate};
use crate::application::slot::OperationSlot;
use crate::domain::entities::{CompletionSuggestion, PlaceResult};
use crate::domain::errors::{ProviderError, SearchError};
use crate::domain::services::region_for;
use crate::domain::state::OrchestratorState;
use crate::ports::{GeoSearchProvider, PreviewSceneProvider, RawCompletion, RawPlace, SearchRequest};

/// What a `search` call did to the state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Empty query: results cleared without contacting the provider
    Cleared,
    /// Results replaced (`count` may be zero if every hit lacked a coordinate)
    Applied { count: usize },
    /// Provider found nothing; results cleared, no error
    NotFound,
    /// Provider failed; results cleared, error set
    Failed,
    /// A newer search took over; state untouched
    Superseded,
}

/// What a `select` call did to the state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewOutcome {
    Cleared,
    Found,
    NoScene,
    Failed,
    Superseded,
    /// The result is not part of the current result list; state untouched
    NotInResults,
}

/// Location search orchestrator
///
/// Cheap to clone; clones share the same session.
pub struct SearchOrchestrator<P, S> {
    shared: Arc<Shared<P, S>>,
}

impl<P, S> Clone for SearchOrchestrator<P, S> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

struct Shared<P, S> {
    geo: Arc<P>,
    preview: S,
    feed: AutocompleteFeed<P>,
    config: OrchestratorConfig,
    slots: Mutex<Slots>,
    state: watch::Sender<OrchestratorState>,
}

#[derive(Default)]
struct Slots {
    search: OperationSlot,
    preview: OperationSlot,
}

impl<P, S> SearchOrchestrator<P, S>
where
    P: GeoSearchProvider + 'static,
    S: PreviewSceneProvider + 'static,
{
    pub fn new(geo: Arc<P>, preview: S, config: OrchestratorConfig) -> Self {
        let (state, _) = watch::channel(OrchestratorState::default());

        let shared = Arc::new_cyclic(|weak: &Weak<Shared<P, S>>| {
            let delegate: Weak<dyn CompletionDelegate> = weak.clone();
            Shared {
                feed: AutocompleteFeed::new(geo.clone(), delegate, config.feed_config()),
                geo,
                preview,
                config,
                slots: Mutex::new(Slots::default()),
                state,
            }
        });

        Self { shared }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.shared.config
    }

    /// Current snapshot
    pub fn state(&self) -> OrchestratorState {
        self.shared.state.borrow().clone()
    }

    /// Observe every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<OrchestratorState> {
        self.shared.state.subscribe()
    }

    /// Whether a full search is in flight
    pub fn is_searching(&self) -> bool {
        self.shared.slots().search.in_flight()
    }

    /// Record a new fragment and request suggestions for it.
    ///
    /// Clears `completions` and `error` immediately; suggestions arrive later
    /// through the autocomplete feed. Must be called within a tokio runtime.
    pub fn update_fragment(&self, text: &str) {
        let sequence = {
            let _slots = self.shared.slots();
            self.shared.state.send_modify(|state| {
                state.fragment = text.to_string();
                state.completions.clear();
                state.completing = !text.trim().is_empty();
                state.error = None;
            });
            self.shared.feed.advance()
        };

        self.shared.feed.request(sequence, text);
    }

    /// Resolve `query` into place results.
    ///
    /// Supersedes any search still in flight. An empty query clears the
    /// results without suspending; whitespace is sent to the provider as is.
    pub async fn search(&self, query: &str) -> SearchOutcome {
        if query.is_empty() {
            let mut slots = self.shared.slots();
            slots.search.invalidate();
            self.shared.replace_results(&mut slots, Vec::new(), None);
            return SearchOutcome::Cleared;
        }

        let ticket = {
            let mut slots = self.shared.slots();
            let ticket = slots.search.begin();
            self.shared.state.send_modify(|state| state.error = None);
            ticket
        };

        info!(query, provider = self.shared.geo.name(), "➡️ Performing search");

        let request = SearchRequest {
            query: query.to_string(),
            result_types: self.shared.config.result_types,
            limit: self.shared.config.search_limit,
        };
        let outcome = ticket.run(self.shared.geo.search(&request)).await;

        let mut slots = self.shared.slots();
        if !slots.search.is_live(&ticket) {
            debug!(query, "Search superseded, discarding outcome");
            return SearchOutcome::Superseded;
        }
        slots.search.finish(&ticket);

        match outcome {
            Ok(raw) => {
                let received = raw.len();
                let places: Vec<PlaceResult> =
                    raw.into_iter().filter_map(RawPlace::into_place).collect();
                let count = places.len();
                if count < received {
                    debug!(
                        query,
                        dropped = received - count,
                        "Dropped results without a resolvable coordinate"
                    );
                }

                self.shared.replace_results(&mut slots, places, None);
                info!(query, count, "✅ Search successful");
                SearchOutcome::Applied { count }
            }
            Err(error) => match error.into_search_error(query) {
                SearchError::Cancelled => {
                    debug!(query, "Search cancelled by provider");
                    SearchOutcome::Superseded
                }
                SearchError::NotFound(_) => {
                    info!(query, "ℹ️ No results found");
                    self.shared.replace_results(&mut slots, Vec::new(), None);
                    SearchOutcome::NotFound
                }
                failure => {
                    warn!(query, error = %failure, "❌ Search failed");
                    self.shared
                        .replace_results(&mut slots, Vec::new(), Some(failure));
                    SearchOutcome::Failed
                }
            },
        }
    }

    /// Search for a suggestion as `"{title}, {subtitle}"`
    pub async fn search_from_completion(&self, completion: &CompletionSuggestion) -> SearchOutcome {
        self.search(&completion.query()).await
    }

    /// Change the selection and load its preview scene.
    ///
    /// A newer selection supersedes a lookup still in flight. Preview
    /// failures only clear the scene; they never set `error`.
    pub async fn select(&self, result: Option<&PlaceResult>) -> PreviewOutcome {
        let (ticket, target) = {
            let mut slots = self.shared.slots();

            let Some(result) = result else {
                slots.preview.invalidate();
                self.shared.state.send_modify(|state| {
                    state.selection = None;
                    state.preview = None;
                });
                return PreviewOutcome::Cleared;
            };

            let known = self.shared.state.borrow().results.contains(result);
            if !known {
                debug!(name = %result.name, "Ignoring selection outside current results");
                return PreviewOutcome::NotInResults;
            }

            let ticket = slots.preview.begin();
            let target = result.clone();
            self.shared.state.send_modify(|state| {
                state.selection = Some(target.clone());
                state.preview = None;
            });
            (ticket, target)
        };

        info!(name = %target.name, "Fetching preview scene");
        let outcome = ticket
            .run(self.shared.preview.lookup_scene(target.coordinate))
            .await;

        let mut slots = self.shared.slots();
        if !slots.preview.is_live(&ticket) {
            debug!(name = %target.name, "Preview lookup superseded");
            return PreviewOutcome::Superseded;
        }
        slots.preview.finish(&ticket);

        match outcome {
            Ok(Some(scene)) => {
                info!(name = %target.name, scene = %scene.id, "Preview scene fetched");
                self.shared
                    .state
                    .send_modify(|state| state.preview = Some(scene));
                PreviewOutcome::Found
            }
            Ok(None) => {
                info!(name = %target.name, "No preview scene available");
                PreviewOutcome::NoScene
            }
            Err(ProviderError::Cancelled) => PreviewOutcome::Superseded,
            Err(error) => {
                warn!(name = %target.name, error = %error, "❌ Failed to fetch preview scene");
                self.shared.state.send_modify(|state| state.preview = None);
                PreviewOutcome::Failed
            }
        }
    }

    /// Acknowledge the current error
    pub fn dismiss_error(&self) {
        let _slots = self.shared.slots();
        self.shared.state.send_modify(|state| state.error = None);
    }

    /// Delegate callback: a new suggestion list arrived.
    ///
    /// Applied unconditionally; use this when the provider pushes
    /// suggestions through its own mechanism instead of the built-in feed.
    pub fn on_completions_updated(&self, completions: Vec<RawCompletion>) {
        let _slots = self.shared.slots();
        self.shared.apply_completions(completions);
    }

    /// Delegate callback: the suggestion lookup failed
    pub fn on_completions_failed(&self, error: ProviderError) {
        let _slots = self.shared.slots();
        self.shared.apply_completion_failure(error);
    }
}

impl<P, S> Shared<P, S> {
    fn slots(&self) -> MutexGuard<'_, Slots> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace results, viewport and error in one publish.
    ///
    /// A selection that is not part of the new results is dropped together
    /// with its preview.
    fn replace_results(
        &self,
        slots: &mut Slots,
        results: Vec<PlaceResult>,
        error: Option<SearchError>,
    ) {
        let viewport = region_for(&results, &self.config.region);
        let mut selection_dropped = false;

        self.state.send_modify(|state| {
            if state
                .selection
                .as_ref()
                .is_some_and(|selected| !results.contains(selected))
            {
                state.selection = None;
                state.preview = None;
                selection_dropped = true;
            }
            state.results = results;
            state.viewport = viewport;
            state.error = error;
        });

        if selection_dropped {
            slots.preview.invalidate();
        }
    }

    fn apply_completions(&self, completions: Vec<RawCompletion>) {
        let completions: Vec<CompletionSuggestion> =
            completions.into_iter().map(CompletionSuggestion::from).collect();
        debug!(count = completions.len(), "Completions updated");

        self.state.send_modify(|state| {
            state.completions = completions;
            state.completing = false;
            state.error = None;
        });
    }

    fn apply_completion_failure(&self, error: ProviderError) {
        warn!(error = %error, "❌ Completer failed");
        self.state.send_modify(|state| {
            state.completions.clear();
            state.completing = false;
            state.error = Some(SearchError::Failed(error.to_string()));
        });
    }
}

impl<P, S> CompletionDelegate for Shared<P, S>
where
    P: GeoSearchProvider + 'static,
    S: PreviewSceneProvider + 'static,
{
    fn completions_updated(&self, sequence: u64, completions: Vec<RawCompletion>) {
        let _slots = self.slots();
        if !self.feed.is_current(sequence) {
            debug!(sequence, "Discarding superseded completions");
            return;
        }
        self.apply_completions(completions);
    }

    fn completions_failed(&self, sequence: u64, error: ProviderError) {
        let _slots = self.slots();
        if !self.feed.is_current(sequence) {
            debug!(sequence, "Discarding superseded completion failure");
            return;
        }
        self.apply_completion_failure(error);
    }
}
