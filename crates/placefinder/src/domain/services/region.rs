//! Region computation - derive a map viewport from a result set
//!
//! - One result: centered on it, spanning a fixed ground distance.
//! - Several results: padded bounding box.
//!
//! Every axis is clamped to the single-result span so coincident points
//! never produce a zero-area viewport.

use crate::domain::entities::PlaceResult;
use crate::domain::value_objects::{Coordinate, CoordinateSpan, Viewport};

/// Mean length of one degree of latitude
pub const METERS_PER_DEGREE_LATITUDE: f64 = 111_320.0;
pub const DEFAULT_SINGLE_RESULT_SPAN_METERS: f64 = 1000.0;
pub const DEFAULT_PADDING_FACTOR: f64 = 1.4;

const MAX_LATITUDE_DELTA: f64 = 180.0;
const MAX_LONGITUDE_DELTA: f64 = 360.0;
// cos(89.4°); keeps longitude spans finite near the poles
const MIN_LATITUDE_COSINE: f64 = 0.01;

/// Region framing parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionConfig {
    /// Ground distance covered by a single-result viewport, per axis
    pub single_result_span_meters: f64,
    /// Multiplier applied to the bounding box of several results
    pub padding_factor: f64,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            single_result_span_meters: DEFAULT_SINGLE_RESULT_SPAN_METERS,
            padding_factor: DEFAULT_PADDING_FACTOR,
        }
    }
}

/// Degrees covering `meters` north-south and east-west around `center`
pub fn metric_span(center: Coordinate, meters: f64) -> CoordinateSpan {
    let cosine = center.latitude.to_radians().cos().abs().max(MIN_LATITUDE_COSINE);
    let latitude_delta = meters / METERS_PER_DEGREE_LATITUDE;
    let longitude_delta = meters / (METERS_PER_DEGREE_LATITUDE * cosine);

    CoordinateSpan::new(
        latitude_delta.min(MAX_LATITUDE_DELTA),
        longitude_delta.min(MAX_LONGITUDE_DELTA),
    )
}

/// Viewport for `results`, or `None` when there are none
pub fn region_for(results: &[PlaceResult], config: &RegionConfig) -> Option<Viewport> {
    region_for_coordinates(results.iter().map(|r| r.coordinate), config)
}

pub fn region_for_coordinates<I>(coordinates: I, config: &RegionConfig) -> Option<Viewport>
where
    I: IntoIterator<Item = Coordinate>,
{
    let mut iter = coordinates.into_iter();
    let first = iter.next()?;

    let mut min_lat = first.latitude;
    let mut max_lat = first.latitude;
    let mut min_lon = first.longitude;
    let mut max_lon = first.longitude;
    let mut count = 1usize;

    for coordinate in iter {
        min_lat = min_lat.min(coordinate.latitude);
        max_lat = max_lat.max(coordinate.latitude);
        min_lon = min_lon.min(coordinate.longitude);
        max_lon = max_lon.max(coordinate.longitude);
        count += 1;
    }

    if count == 1 {
        return Some(Viewport::new(
            first,
            metric_span(first, config.single_result_span_meters),
        ));
    }

    let center = Coordinate::new((min_lat + max_lat) / 2.0, (min_lon + max_lon) / 2.0);
    let minimum = metric_span(center, config.single_result_span_meters);

    let latitude_delta = ((max_lat - min_lat) * config.padding_factor)
        .max(minimum.latitude_delta)
        .min(MAX_LATITUDE_DELTA);
    let longitude_delta = ((max_lon - min_lon) * config.padding_factor)
        .max(minimum.longitude_delta)
        .min(MAX_LONGITUDE_DELTA);

    Some(Viewport::new(
        center,
        CoordinateSpan::new(latitude_delta, longitude_delta),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::PlaceHandle;

    const EPSILON: f64 = 1e-9;

    fn place(lat: f64, lon: f64) -> PlaceResult {
        PlaceResult::new(
            Some("place".to_string()),
            Coordinate::new(lat, lon),
            PlaceHandle::new("test", format!("{lat},{lon}")),
        )
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPSILON,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_empty_has_no_region() {
        assert_eq!(region_for(&[], &RegionConfig::default()), None);
    }

    #[test]
    fn test_single_result_is_centered() {
        let viewport = region_for(&[place(37.7749, -122.4194)], &RegionConfig::default()).unwrap();

        assert_eq!(viewport.center, Coordinate::new(37.7749, -122.4194));
        assert!(!viewport.span.is_empty());
        assert_close(viewport.span.latitude_delta, 1000.0 / METERS_PER_DEGREE_LATITUDE);
        // A degree of longitude is shorter than a degree of latitude away from the equator
        assert!(viewport.span.longitude_delta > viewport.span.latitude_delta);
    }

    #[test]
    fn test_two_results_are_padded() {
        let viewport = region_for(&[place(0.0, 0.0), place(10.0, 10.0)], &RegionConfig::default())
            .unwrap();

        assert_close(viewport.center.latitude, 5.0);
        assert_close(viewport.center.longitude, 5.0);
        assert_close(viewport.span.latitude_delta, 14.0);
        assert_close(viewport.span.longitude_delta, 14.0);
    }

    #[test]
    fn test_coincident_results_are_clamped() {
        let results = [place(35.6586, 139.7454), place(35.6586, 139.7454)];
        let viewport = region_for(&results, &RegionConfig::default()).unwrap();
        let expected = metric_span(Coordinate::new(35.6586, 139.7454), 1000.0);

        assert_eq!(viewport.center, Coordinate::new(35.6586, 139.7454));
        assert_close(viewport.span.latitude_delta, expected.latitude_delta);
        assert_close(viewport.span.longitude_delta, expected.longitude_delta);
    }

    #[test]
    fn test_one_collapsed_axis_is_clamped() {
        // Same latitude, different longitudes
        let viewport = region_for(&[place(0.0, 0.0), place(0.0, 2.0)], &RegionConfig::default())
            .unwrap();

        assert_close(viewport.span.longitude_delta, 2.8);
        assert_close(viewport.span.latitude_delta, 1000.0 / METERS_PER_DEGREE_LATITUDE);
    }

    #[test]
    fn test_spans_are_capped() {
        let viewport = region_for(
            &[place(-80.0, -179.0), place(80.0, 179.0)],
            &RegionConfig::default(),
        )
        .unwrap();

        assert_close(viewport.span.latitude_delta, 180.0);
        assert_close(viewport.span.longitude_delta, 360.0);
    }

    #[test]
    fn test_polar_span_stays_finite() {
        let span = metric_span(Coordinate::new(90.0, 0.0), 1000.0);
        assert!(span.longitude_delta.is_finite());
        assert!(span.longitude_delta <= 360.0);
    }

    #[test]
    fn test_all_results_fit_inside_viewport() {
        let results = [place(51.5, -0.12), place(48.85, 2.35), place(52.52, 13.4)];
        let viewport = region_for(&results, &RegionConfig::default()).unwrap();

        for result in &results {
            assert!(viewport.contains(&result.coordinate));
        }
    }

    #[test]
    fn test_custom_config() {
        let config = RegionConfig {
            single_result_span_meters: 5000.0,
            padding_factor: 2.0,
        };
        let single = region_for(&[place(0.0, 0.0)], &config).unwrap();
        assert_close(single.span.latitude_delta, 5000.0 / METERS_PER_DEGREE_LATITUDE);

        let pair = region_for(&[place(0.0, 0.0), place(4.0, 6.0)], &config).unwrap();
        assert_close(pair.span.latitude_delta, 8.0);
        assert_close(pair.span.longitude_delta, 12.0);
    }
}
