//! Provider configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_MAPILLARY_URL: &str = "https://graph.mapillary.com";
pub const DEFAULT_USER_AGENT: &str = concat!("placefinder/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_PREVIEW_RADIUS_METERS: f64 = 50.0;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the Nominatim geocoder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NominatimConfig {
    /// Service root, without trailing `/search`
    pub base_url: String,
    /// Identifying User-Agent (required by the public instance's usage policy)
    pub user_agent: String,
    /// Contact address sent with every request
    pub email: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl NominatimConfig {
    /// Create a configuration for the public instance with the given User-Agent
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_NOMINATIM_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            email: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Configuration for Mapillary preview lookups
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapillaryConfig {
    pub base_url: String,
    /// Client access token (`MLY|...`)
    pub access_token: String,
    /// Search radius around the selected place
    pub radius_meters: f64,
    pub timeout: Duration,
}

impl MapillaryConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_radius(mut self, radius_meters: f64) -> Self {
        self.radius_meters = radius_meters;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for MapillaryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_MAPILLARY_URL.to_string(),
            access_token: String::new(),
            radius_meters: DEFAULT_PREVIEW_RADIUS_METERS,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
