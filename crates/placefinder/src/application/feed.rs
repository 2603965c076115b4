//! Autocomplete feed - push-style delivery over a one-shot provider
//!
//! Every fragment gets a sequence number. Only the delivery for the latest
//! sequence reaches the delegate; older ones are dropped, so providers that
//! do not coalesce requests can never reorder the suggestion list.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tracing::{debug, warn};

use crate::domain::errors::ProviderError;
use crate::domain::value_objects::ResultTypeFilter;
use crate::ports::{CompletionRequest, GeoSearchProvider, RawCompletion};

/// Receiver of autocomplete deliveries
pub trait CompletionDelegate: Send + Sync {
    /// A full replacement list for fragment `sequence`
    fn completions_updated(&self, sequence: u64, completions: Vec<RawCompletion>);

    /// The lookup for fragment `sequence` failed
    fn completions_failed(&self, sequence: u64, error: ProviderError);
}

/// Feed configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedConfig {
    /// Quiet period before a fragment is sent to the provider
    pub debounce: Duration,
    pub result_types: ResultTypeFilter,
    pub limit: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::ZERO,
            result_types: ResultTypeFilter::default(),
            limit: 8,
        }
    }
}

/// Sequence-gated autocomplete feed
pub struct AutocompleteFeed<P> {
    provider: Arc<P>,
    delegate: Weak<dyn CompletionDelegate>,
    sequence: Arc<AtomicU64>,
    config: FeedConfig,
}

impl<P: GeoSearchProvider + 'static> AutocompleteFeed<P> {
    pub fn new(provider: Arc<P>, delegate: Weak<dyn CompletionDelegate>, config: FeedConfig) -> Self {
        Self {
            provider,
            delegate,
            sequence: Arc::new(AtomicU64::new(0)),
            config,
        }
    }

    /// Reserve the sequence number for the next fragment.
    ///
    /// From this point on, deliveries for earlier fragments are stale.
    pub fn advance(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn latest_sequence(&self) -> u64 {
        self.sequence.load(Ordering::Acquire)
    }

    pub fn is_current(&self, sequence: u64) -> bool {
        self.latest_sequence() == sequence
    }

    /// Advance and request in one step
    pub fn set_fragment(&self, fragment: &str) -> u64 {
        let sequence = self.advance();
        self.request(sequence, fragment);
        sequence
    }

    /// Look up suggestions for `fragment` under a reserved `sequence`.
    ///
    /// Blank fragments are answered with an empty list immediately. Other
    /// fragments are looked up on a spawned task, so this must be called from
    /// within a tokio runtime.
    pub fn request(&self, sequence: u64, fragment: &str) {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            deliver(&self.sequence, &self.delegate, sequence, Ok(Vec::new()));
            return;
        }

        let Ok(runtime) = Handle::try_current() else {
            warn!("Autocomplete requested outside of a tokio runtime");
            deliver(
                &self.sequence,
                &self.delegate,
                sequence,
                Err(ProviderError::Unavailable("no async runtime".to_string())),
            );
            return;
        };

        let request = CompletionRequest {
            fragment: fragment.to_string(),
            result_types: self.config.result_types,
            limit: self.config.limit,
        };
        let provider = self.provider.clone();
        let latest = self.sequence.clone();
        let delegate = self.delegate.clone();
        let debounce = self.config.debounce;

        runtime.spawn(async move {
            if !debounce.is_zero() {
                tokio::time::sleep(debounce).await;
                if latest.load(Ordering::Acquire) != sequence {
                    debug!(sequence, "Fragment superseded during debounce");
                    return;
                }
            }

            let outcome = provider.autocomplete(&request).await;
            deliver(&latest, &delegate, sequence, outcome);
        });
    }
}

fn deliver(
    latest: &AtomicU64,
    delegate: &Weak<dyn CompletionDelegate>,
    sequence: u64,
    outcome: Result<Vec<RawCompletion>, ProviderError>,
) {
    if latest.load(Ordering::Acquire) != sequence {
        debug!(sequence, "Discarding stale autocomplete delivery");
        return;
    }

    let Some(delegate) = delegate.upgrade() else {
        return;
    };

    match outcome {
        Ok(completions) => delegate.completions_updated(sequence, completions),
        Err(ProviderError::NotFound) => delegate.completions_updated(sequence, Vec::new()),
        Err(ProviderError::Cancelled) => debug!(sequence, "Autocomplete cancelled"),
        Err(error) => delegate.completions_failed(sequence, error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{RawPlace, SearchRequest};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    type Reply = Result<Vec<RawCompletion>, ProviderError>;

    #[derive(Default)]
    struct GatedProvider {
        gates: Mutex<HashMap<String, oneshot::Receiver<Reply>>>,
        calls: Mutex<Vec<String>>,
    }

    impl GatedProvider {
        fn gate(&self, fragment: &str) -> oneshot::Sender<Reply> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().unwrap().insert(fragment.to_string(), rx);
            tx
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GeoSearchProvider for GatedProvider {
        async fn autocomplete(&self, request: &CompletionRequest) -> Reply {
            self.calls.lock().unwrap().push(request.fragment.clone());
            let gate = self.gates.lock().unwrap().remove(&request.fragment);
            match gate {
                Some(rx) => rx.await.unwrap_or(Err(ProviderError::Cancelled)),
                None => Ok(vec![RawCompletion::new(request.fragment.clone(), "")]),
            }
        }

        async fn search(&self, _request: &SearchRequest) -> Result<Vec<RawPlace>, ProviderError> {
            Err(ProviderError::NotFound)
        }

        fn name(&self) -> &str {
            "gated"
        }
    }

    #[derive(Default)]
    struct Recorder {
        deliveries: Mutex<Vec<(u64, Result<Vec<String>, ProviderError>)>>,
    }

    impl Recorder {
        fn deliveries(&self) -> Vec<(u64, Result<Vec<String>, ProviderError>)> {
            self.deliveries.lock().unwrap().clone()
        }
    }

    impl CompletionDelegate for Recorder {
        fn completions_updated(&self, sequence: u64, completions: Vec<RawCompletion>) {
            let titles = completions.into_iter().map(|c| c.title).collect();
            self.deliveries.lock().unwrap().push((sequence, Ok(titles)));
        }

        fn completions_failed(&self, sequence: u64, error: ProviderError) {
            self.deliveries.lock().unwrap().push((sequence, Err(error)));
        }
    }

    fn feed(
        provider: &Arc<GatedProvider>,
        recorder: &Arc<Recorder>,
        config: FeedConfig,
    ) -> AutocompleteFeed<GatedProvider> {
        let delegate = Arc::downgrade(recorder);
        let delegate: Weak<dyn CompletionDelegate> = delegate;
        AutocompleteFeed::new(provider.clone(), delegate, config)
    }

    async fn settle() {
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_blank_fragment_delivers_empty_list_without_provider() {
        let provider = Arc::new(GatedProvider::default());
        let recorder = Arc::new(Recorder::default());
        let feed = feed(&provider, &recorder, FeedConfig::default());

        let sequence = feed.set_fragment("   ");

        assert_eq!(recorder.deliveries(), vec![(sequence, Ok(vec![]))]);
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_stale_delivery_is_discarded() {
        let provider = Arc::new(GatedProvider::default());
        let recorder = Arc::new(Recorder::default());
        let feed = feed(&provider, &recorder, FeedConfig::default());

        let slow = provider.gate("ca");
        feed.set_fragment("ca");
        settle().await;
        let latest = feed.set_fragment("cat");
        settle().await;

        let _ = slow.send(Ok(vec![RawCompletion::new("Cairo", "Egypt")]));
        settle().await;

        assert_eq!(recorder.deliveries(), vec![(latest, Ok(vec!["cat".to_string()]))]);
        assert_eq!(provider.calls(), vec!["ca".to_string(), "cat".to_string()]);
    }

    #[tokio::test]
    async fn test_failure_and_not_found_mapping() {
        let provider = Arc::new(GatedProvider::default());
        let recorder = Arc::new(Recorder::default());
        let feed = feed(&provider, &recorder, FeedConfig::default());

        let gate = provider.gate("offline");
        let first = feed.set_fragment("offline");
        settle().await;
        let _ = gate.send(Err(ProviderError::Network("unreachable".to_string())));
        settle().await;

        let gate = provider.gate("zzzxyz");
        let second = feed.set_fragment("zzzxyz");
        settle().await;
        let _ = gate.send(Err(ProviderError::NotFound));
        settle().await;

        assert_eq!(
            recorder.deliveries(),
            vec![
                (first, Err(ProviderError::Network("unreachable".to_string()))),
                (second, Ok(vec![])),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_skips_superseded_fragments() {
        let provider = Arc::new(GatedProvider::default());
        let recorder = Arc::new(Recorder::default());
        let config = FeedConfig {
            debounce: Duration::from_millis(300),
            ..FeedConfig::default()
        };
        let feed = feed(&provider, &recorder, config);

        feed.set_fragment("b");
        feed.set_fragment("be");
        let latest = feed.set_fragment("ber");

        tokio::time::sleep(Duration::from_millis(400)).await;
        settle().await;

        assert_eq!(provider.calls(), vec!["ber".to_string()]);
        assert_eq!(recorder.deliveries(), vec![(latest, Ok(vec!["ber".to_string()]))]);
    }

    #[tokio::test]
    async fn test_dropped_delegate_is_ignored() {
        let provider = Arc::new(GatedProvider::default());
        let recorder = Arc::new(Recorder::default());
        let feed = feed(&provider, &recorder, FeedConfig::default());
        drop(recorder);

        feed.set_fragment("paris");
        settle().await;

        assert_eq!(provider.calls(), vec!["paris".to_string()]);
    }
}
