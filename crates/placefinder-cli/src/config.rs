//! Placefinder CLI settings
//!
//! Provider endpoints, the Mapillary token and search limits, kept as TOML
//! in the platform config directory.

use anyhow::{Context, Result};
use placefinder::{OrchestratorConfig, ResultTypeFilter};
use placefinder_osm::{MapillaryConfig, NominatimConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

const CONFIG_DIR: &str = "placefinder";
const CONFIG_FILE: &str = "config.toml";

/// CLI Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_nominatim_url")]
    pub nominatim_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default = "default_mapillary_url")]
    pub mapillary_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapillary_token: Option<String>,
    #[serde(default = "default_preview_radius")]
    pub preview_radius_meters: f64,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,
    #[serde(default = "default_completion_limit")]
    pub completion_limit: usize,
    /// Also return street addresses, not only points of interest
    #[serde(default)]
    pub include_addresses: bool,
}

fn default_nominatim_url() -> String {
    NominatimConfig::default().base_url
}

fn default_user_agent() -> String {
    NominatimConfig::default().user_agent
}

fn default_mapillary_url() -> String {
    MapillaryConfig::default().base_url
}

fn default_preview_radius() -> f64 {
    MapillaryConfig::default().radius_meters
}

fn default_debounce_ms() -> u64 {
    250
}

fn default_search_limit() -> usize {
    OrchestratorConfig::default().search_limit
}

fn default_completion_limit() -> usize {
    OrchestratorConfig::default().completion_limit
}

impl Default for Config {
    fn default() -> Self {
        Self {
            nominatim_url: default_nominatim_url(),
            user_agent: default_user_agent(),
            email: None,
            mapillary_url: default_mapillary_url(),
            mapillary_token: None,
            preview_radius_meters: default_preview_radius(),
            debounce_ms: default_debounce_ms(),
            search_limit: default_search_limit(),
            completion_limit: default_completion_limit(),
            include_addresses: false,
        }
    }
}

impl Config {
    /// `~/.config/placefinder` (platform config dir)
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|base| base.join(CONFIG_DIR))
            .context("No platform config directory to store placefinder settings in")
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Read the stored settings; a missing file means all defaults
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read placefinder settings at {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Invalid placefinder settings in {}", path.display()))
    }

    /// Persist settings, creating the directory on first use
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Cannot create {}", dir.display()))?;
        }

        let content = toml::to_string_pretty(self).context("Cannot encode placefinder settings")?;
        fs::write(&path, content)
            .with_context(|| format!("Cannot write placefinder settings to {}", path.display()))
    }

    pub fn set_mapillary_token(&mut self, token: String) {
        self.mapillary_token = Some(token);
    }

    pub fn result_types(&self) -> ResultTypeFilter {
        if self.include_addresses {
            ResultTypeFilter::all()
        } else {
            ResultTypeFilter::points_of_interest()
        }
    }

    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig::default()
            .with_result_types(self.result_types())
            .with_search_limit(self.search_limit)
            .with_completion_limit(self.completion_limit)
            .with_debounce(Duration::from_millis(self.debounce_ms))
    }

    pub fn nominatim_config(&self) -> NominatimConfig {
        let config = NominatimConfig::new(self.user_agent.clone()).with_base_url(&self.nominatim_url);
        match &self.email {
            Some(email) => config.with_email(email),
            None => config,
        }
    }

    /// Mapillary settings, if a token is stored
    pub fn mapillary_config(&self) -> Option<MapillaryConfig> {
        let token = self.mapillary_token.as_deref().filter(|t| !t.trim().is_empty())?;
        Some(
            MapillaryConfig::new(token)
                .with_base_url(&self.mapillary_url)
                .with_radius(self.preview_radius_meters),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_round_trip() {
        let mut config = Config {
            email: Some("dev@example.com".to_string()),
            include_addresses: true,
            search_limit: 10,
            ..Config::default()
        };
        config.set_mapillary_token("MLY|123|abc".to_string());

        let content = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&content).unwrap();

        assert_eq!(parsed, config);
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let parsed: Config = toml::from_str("email = \"dev@example.com\"\n").unwrap();

        assert_eq!(parsed.nominatim_url, "https://nominatim.openstreetmap.org");
        assert_eq!(parsed.search_limit, 25);
        assert_eq!(parsed.completion_limit, 8);
        assert_eq!(parsed.mapillary_token, None);
        assert!(!parsed.include_addresses);
        assert_eq!(parsed.email.as_deref(), Some("dev@example.com"));
    }

    #[test]
    fn test_settings_live_under_app_directory() {
        if let Ok(path) = Config::config_path() {
            assert!(path.ends_with("placefinder/config.toml"));
        }
    }

    #[test]
    fn test_derived_provider_configs() {
        let mut config = Config::default();
        assert!(config.mapillary_config().is_none());
        assert_eq!(config.result_types(), ResultTypeFilter::points_of_interest());

        config.set_mapillary_token("MLY|1|x".to_string());
        config.include_addresses = true;
        config.debounce_ms = 400;

        let mapillary = config.mapillary_config().unwrap();
        assert_eq!(mapillary.access_token, "MLY|1|x");
        assert_eq!(mapillary.radius_meters, config.preview_radius_meters);

        let orchestrator = config.orchestrator_config();
        assert_eq!(orchestrator.result_types, ResultTypeFilter::all());
        assert_eq!(orchestrator.debounce, Duration::from_millis(400));
    }
}
