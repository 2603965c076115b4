//! PreviewScene - street-level imagery handle for a selected place

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Coordinate;

/// Handle to a preview scene near a coordinate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewScene {
    /// Provider-local scene identifier
    pub id: String,
    /// Where the imagery was captured
    pub coordinate: Coordinate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captured_at: Option<DateTime<Utc>>,
}

impl PreviewScene {
    pub fn new(id: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            id: id.into(),
            coordinate,
            image_url: None,
            captured_at: None,
        }
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn with_captured_at(mut self, captured_at: DateTime<Utc>) -> Self {
        self.captured_at = Some(captured_at);
        self
    }
}
