//! Mapillary preview scene provider

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use placefinder::domain::services::metric_span;
use placefinder::{Coordinate, PreviewScene, PreviewSceneProvider, ProviderError};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::{MapillaryConfig, DEFAULT_USER_AGENT};
use crate::http::{build_client, parse_error, read_body, transport_error};

const IMAGE_FIELDS: &str = "id,captured_at,thumb_1024_url,computed_geometry";

/// Street-level previews from the Mapillary Graph API
#[derive(Clone)]
pub struct MapillaryPreview {
    client: Client,
    config: MapillaryConfig,
}

impl MapillaryPreview {
    /// Fails with `Unavailable` when no access token is configured
    pub fn new(config: MapillaryConfig) -> Result<Self, ProviderError> {
        if config.access_token.trim().is_empty() {
            return Err(ProviderError::Unavailable(
                "Mapillary access token is not configured".to_string(),
            ));
        }

        let client = build_client(DEFAULT_USER_AGENT, config.timeout)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &MapillaryConfig {
        &self.config
    }
}

#[async_trait]
impl PreviewSceneProvider for MapillaryPreview {
    async fn lookup_scene(
        &self,
        coordinate: Coordinate,
    ) -> Result<Option<PreviewScene>, ProviderError> {
        let url = format!("{}/images", self.config.base_url.trim_end_matches('/'));
        let bbox = bounding_box(coordinate, self.config.radius_meters);

        debug!(%coordinate, bbox = %bbox, "Querying Mapillary");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("access_token", self.config.access_token.as_str()),
                ("fields", IMAGE_FIELDS),
                ("bbox", bbox.as_str()),
                ("limit", "1"),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        let body = read_body(response).await?;
        parse_scene(&body, coordinate)
    }
}

// ============================================
// Response Types
// ============================================

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    #[serde(default)]
    data: Vec<ImageRecord>,
}

#[derive(Debug, Deserialize)]
struct ImageRecord {
    id: String,
    /// Epoch milliseconds
    #[serde(default)]
    captured_at: Option<i64>,
    #[serde(default)]
    thumb_1024_url: Option<String>,
    #[serde(default)]
    computed_geometry: Option<PointGeometry>,
}

/// GeoJSON point, `[longitude, latitude]`
#[derive(Debug, Deserialize)]
struct PointGeometry {
    coordinates: Vec<f64>,
}

impl ImageRecord {
    fn into_scene(self, requested: Coordinate) -> PreviewScene {
        let coordinate = self
            .computed_geometry
            .and_then(|geometry| match geometry.coordinates.as_slice() {
                [longitude, latitude, ..] => Some(Coordinate::new(*latitude, *longitude)),
                _ => None,
            })
            .filter(Coordinate::is_valid)
            .unwrap_or(requested);

        let mut scene = PreviewScene::new(self.id, coordinate);
        if let Some(url) = self.thumb_1024_url {
            scene = scene.with_image_url(url);
        }
        if let Some(captured_at) = self.captured_at.and_then(DateTime::<Utc>::from_timestamp_millis) {
            scene = scene.with_captured_at(captured_at);
        }
        scene
    }
}

// ============================================
// Helper Functions
// ============================================

/// `minLon,minLat,maxLon,maxLat` of a square `radius_meters` around `center`
fn bounding_box(center: Coordinate, radius_meters: f64) -> String {
    let span = metric_span(center, radius_meters * 2.0);
    let half_lat = span.latitude_delta / 2.0;
    let half_lon = span.longitude_delta / 2.0;

    format!(
        "{:.6},{:.6},{:.6},{:.6}",
        (center.longitude - half_lon).max(-180.0),
        (center.latitude - half_lat).max(-90.0),
        (center.longitude + half_lon).min(180.0),
        (center.latitude + half_lat).min(90.0),
    )
}

fn parse_scene(body: &str, requested: Coordinate) -> Result<Option<PreviewScene>, ProviderError> {
    let response: ImagesResponse = serde_json::from_str(body).map_err(parse_error)?;

    Ok(response
        .data
        .into_iter()
        .next()
        .map(|record| record.into_scene(requested)))
}
