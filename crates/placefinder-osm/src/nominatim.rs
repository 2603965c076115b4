//! Nominatim geocoder provider
//!
//! Both autocomplete and full search go through `/search`; autocomplete
//! only asks for fewer hits and keeps the display name split into a title
//! and a subtitle.

use async_trait::async_trait;
use placefinder::{
    CompletionRequest, Coordinate, GeoSearchProvider, PlaceHandle, ProviderError, RawCompletion,
    RawPlace, ResultTypeFilter, SearchRequest,
};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

use crate::config::NominatimConfig;
use crate::http::{build_client, parse_error, read_body, transport_error};

const PROVIDER_NAME: &str = "nominatim";
/// Upper bound accepted by Nominatim's `limit` parameter
const MAX_LIMIT: usize = 40;

/// Nominatim-backed implementation of `GeoSearchProvider`
#[derive(Clone)]
pub struct NominatimProvider {
    client: Client,
    config: NominatimConfig,
}

impl NominatimProvider {
    pub fn new(config: NominatimConfig) -> Result<Self, ProviderError> {
        let client = build_client(&config.user_agent, config.timeout)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &NominatimConfig {
        &self.config
    }

    async fn lookup(
        &self,
        query: &str,
        result_types: ResultTypeFilter,
        limit: usize,
    ) -> Result<Vec<(NominatimPlace, Value)>, ProviderError> {
        let url = format!("{}/search", self.config.base_url.trim_end_matches('/'));

        let mut params: Vec<(&str, String)> = vec![
            ("q", query.to_string()),
            ("format", "jsonv2".to_string()),
            ("limit", limit.clamp(1, MAX_LIMIT).to_string()),
            ("addressdetails", "0".to_string()),
        ];
        if let Some(layer) = layer_param(result_types) {
            params.push(("layer", layer.to_string()));
        }
        if let Some(email) = &self.config.email {
            params.push(("email", email.clone()));
        }

        debug!(query, limit, "Querying Nominatim");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(transport_error)?;

        let body = read_body(response).await?;
        parse_places(&body)
    }
}

#[async_trait]
impl GeoSearchProvider for NominatimProvider {
    async fn autocomplete(
        &self,
        request: &CompletionRequest,
    ) -> Result<Vec<RawCompletion>, ProviderError> {
        let places = self
            .lookup(&request.fragment, request.result_types, request.limit)
            .await?;
        Ok(completions_from(places.into_iter().map(|(place, _)| place)))
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<RawPlace>, ProviderError> {
        let places = self
            .lookup(&request.query, request.result_types, request.limit)
            .await?;

        if places.is_empty() {
            return Err(ProviderError::NotFound);
        }

        Ok(places
            .into_iter()
            .map(|(place, payload)| place.into_raw_place(payload))
            .collect())
    }

    fn name(&self) -> &str {
        PROVIDER_NAME
    }
}

// ============================================
// Response Types
// ============================================

/// One hit of a `format=jsonv2` response
#[derive(Debug, Clone, Deserialize)]
struct NominatimPlace {
    #[serde(default)]
    place_id: Option<u64>,
    #[serde(default)]
    lat: Option<String>,
    #[serde(default)]
    lon: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

impl NominatimPlace {
    fn coordinate(&self) -> Option<Coordinate> {
        let latitude = self.lat.as_deref()?.trim().parse::<f64>().ok()?;
        let longitude = self.lon.as_deref()?.trim().parse::<f64>().ok()?;
        Some(Coordinate::new(latitude, longitude))
    }

    /// `(title, subtitle)` for display
    fn title_and_subtitle(&self) -> (Option<String>, String) {
        let (head, rest) = split_display_name(self.display_name.as_deref().unwrap_or_default());
        let name = self
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .or(head)
            .map(str::to_string);
        (name, rest)
    }

    fn into_raw_place(self, payload: Value) -> RawPlace {
        let coordinate = self.coordinate();
        let (name, _) = self.title_and_subtitle();
        let key = match (self.place_id, &self.display_name) {
            (Some(id), _) => id.to_string(),
            (None, Some(display_name)) => display_name.clone(),
            (None, None) => String::new(),
        };

        if let (Some(category), Some(kind)) = (&self.category, &self.kind) {
            debug!(key = %key, category = %category, kind = %kind, "Mapped Nominatim place");
        }

        RawPlace {
            name,
            coordinate,
            handle: PlaceHandle::new(PROVIDER_NAME, key).with_payload(payload),
        }
    }
}

// ============================================
// Helper Functions
// ============================================

fn layer_param(result_types: ResultTypeFilter) -> Option<&'static str> {
    match (result_types.point_of_interest, result_types.address) {
        (true, false) => Some("poi"),
        (false, true) => Some("address"),
        _ => None,
    }
}

/// Parse a response body, keeping each raw hit alongside its typed view
fn parse_places(body: &str) -> Result<Vec<(NominatimPlace, Value)>, ProviderError> {
    let hits: Vec<Value> = serde_json::from_str(body).map_err(parse_error)?;

    hits.into_iter()
        .map(|hit| {
            let place = NominatimPlace::deserialize(&hit).map_err(parse_error)?;
            Ok((place, hit))
        })
        .collect()
}

/// Split `"Ferry Building, Embarcadero, San Francisco"` into the first
/// segment and the remaining ones
fn split_display_name(display_name: &str) -> (Option<&str>, String) {
    let mut segments = display_name
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty());

    let head = segments.next();
    let rest = segments.collect::<Vec<_>>().join(", ");
    (head, rest)
}

/// Suggestions in provider order, without duplicate (title, subtitle) pairs
fn completions_from(places: impl IntoIterator<Item = NominatimPlace>) -> Vec<RawCompletion> {
    let mut seen = HashSet::new();

    places
        .into_iter()
        .filter_map(|place| {
            let (title, subtitle) = place.title_and_subtitle();
            let title = title?;
            seen.insert((title.clone(), subtitle.clone()))
                .then(|| RawCompletion::new(title, subtitle))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FERRY_BUILDING: &str = r#"[
        {
            "place_id": 297510347,
            "licence": "Data © OpenStreetMap contributors, ODbL 1.0.",
            "osm_type": "way",
            "osm_id": 24040498,
            "lat": "37.7955327",
            "lon": "-122.3935235",
            "category": "tourism",
            "type": "attraction",
            "place_rank": 30,
            "importance": 0.41,
            "addresstype": "tourism",
            "name": "Ferry Building",
            "display_name": "Ferry Building, 1, The Embarcadero, Financial District, San Francisco, California, 94111, United States",
            "boundingbox": ["37.7948", "37.7962", "-122.3944", "-122.3926"]
        },
        {
            "place_id": 12,
            "lat": "37.79",
            "lon": "-122.39",
            "name": "",
            "display_name": "Ferry Plaza, San Francisco, California, United States"
        },
        {
            "place_id": 13,
            "lat": "not-a-number",
            "lon": "-122.39",
            "display_name": ""
        }
    ]"#;

    fn places() -> Vec<(NominatimPlace, Value)> {
        parse_places(FERRY_BUILDING).unwrap()
    }

    #[test]
    fn test_parse_search_fixture() {
        let raw: Vec<RawPlace> = places()
            .into_iter()
            .map(|(place, payload)| place.into_raw_place(payload))
            .collect();

        assert_eq!(raw.len(), 3);

        let ferry = &raw[0];
        assert_eq!(ferry.name.as_deref(), Some("Ferry Building"));
        assert_eq!(
            ferry.coordinate,
            Some(Coordinate::new(37.7955327, -122.3935235))
        );
        assert_eq!(ferry.handle.provider, "nominatim");
        assert_eq!(ferry.handle.key, "297510347");
        assert_eq!(ferry.handle.payload["osm_id"], 24040498);

        // Blank name falls back to the first display segment
        assert_eq!(raw[1].name.as_deref(), Some("Ferry Plaza"));

        // Unparseable coordinate is kept as None; the orchestrator drops it
        assert_eq!(raw[2].coordinate, None);
        assert_eq!(raw[2].name, None);
    }

    #[test]
    fn test_completions_from_fixture() {
        let completions = completions_from(places().into_iter().map(|(place, _)| place));

        assert_eq!(
            completions,
            vec![
                RawCompletion::new(
                    "Ferry Building",
                    "1, The Embarcadero, Financial District, San Francisco, California, 94111, United States"
                ),
                RawCompletion::new("Ferry Plaza", "San Francisco, California, United States"),
            ]
        );
    }

    #[test]
    fn test_duplicate_completions_are_collapsed() {
        let body = r#"[
            {"place_id": 1, "lat": "1", "lon": "1", "name": "Blue Bottle", "display_name": "Blue Bottle, Mint Plaza"},
            {"place_id": 2, "lat": "1", "lon": "1", "name": "Blue Bottle", "display_name": "Blue Bottle, Mint Plaza"},
            {"place_id": 3, "lat": "1", "lon": "1", "name": "Blue Bottle", "display_name": "Blue Bottle, Hayes Valley"}
        ]"#;
        let places = parse_places(body).unwrap().into_iter().map(|(place, _)| place);

        let titles: Vec<String> = completions_from(places)
            .into_iter()
            .map(|c| c.subtitle)
            .collect();
        assert_eq!(titles, vec!["Mint Plaza", "Hayes Valley"]);
    }

    #[test]
    fn test_empty_and_malformed_bodies() {
        assert!(parse_places("[]").unwrap().is_empty());
        assert!(matches!(
            parse_places(r#"{"error":"oops"}"#),
            Err(ProviderError::Parse(_))
        ));
    }

    #[test]
    fn test_layer_param() {
        assert_eq!(layer_param(ResultTypeFilter::points_of_interest()), Some("poi"));
        assert_eq!(layer_param(ResultTypeFilter::addresses()), Some("address"));
        assert_eq!(layer_param(ResultTypeFilter::all()), None);
    }

    #[test]
    fn test_split_display_name() {
        assert_eq!(
            split_display_name("Louvre, Paris, France"),
            (Some("Louvre"), "Paris, France".to_string())
        );
        assert_eq!(split_display_name("Paris"), (Some("Paris"), String::new()));
        assert_eq!(split_display_name(" , "), (None, String::new()));
    }

    #[test]
    fn test_new_provider() {
        let provider = NominatimProvider::new(
            NominatimConfig::new("placefinder-tests/0.1").with_email("dev@example.com"),
        )
        .unwrap();
        assert_eq!(provider.name(), "nominatim");
        assert_eq!(provider.config().email.as_deref(), Some("dev@example.com"));
    }
}
