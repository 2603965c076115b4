//! Orchestrator configuration

use std::time::Duration;

use crate::application::feed::FeedConfig;
use crate::domain::services::RegionConfig;
use crate::domain::value_objects::ResultTypeFilter;

pub const DEFAULT_SEARCH_LIMIT: usize = 25;
pub const DEFAULT_COMPLETION_LIMIT: usize = 8;

/// SearchOrchestrator configuration
#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorConfig {
    /// Result types requested from the provider (points of interest by default)
    pub result_types: ResultTypeFilter,
    /// Maximum results per full search
    pub search_limit: usize,
    /// Maximum suggestions per autocomplete delivery
    pub completion_limit: usize,
    pub region: RegionConfig,
    /// Provider-side settle time for autocomplete fragments
    pub debounce: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            result_types: ResultTypeFilter::default(),
            search_limit: DEFAULT_SEARCH_LIMIT,
            completion_limit: DEFAULT_COMPLETION_LIMIT,
            region: RegionConfig::default(),
            debounce: Duration::ZERO,
        }
    }
}

impl OrchestratorConfig {
    pub fn with_result_types(mut self, result_types: ResultTypeFilter) -> Self {
        self.result_types = result_types;
        self
    }

    pub fn with_search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit;
        self
    }

    pub fn with_completion_limit(mut self, limit: usize) -> Self {
        self.completion_limit = limit;
        self
    }

    pub fn with_region(mut self, region: RegionConfig) -> Self {
        self.region = region;
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub(crate) fn feed_config(&self) -> FeedConfig {
        FeedConfig {
            debounce: self.debounce,
            result_types: self.result_types,
            limit: self.completion_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = OrchestratorConfig::default()
            .with_result_types(ResultTypeFilter::all())
            .with_search_limit(5)
            .with_completion_limit(3)
            .with_debounce(Duration::from_millis(250));

        assert_eq!(config.result_types, ResultTypeFilter::all());
        assert_eq!(config.search_limit, 5);

        let feed = config.feed_config();
        assert_eq!(feed.limit, 3);
        assert_eq!(feed.debounce, Duration::from_millis(250));
        assert_eq!(feed.result_types, ResultTypeFilter::all());
    }
}
