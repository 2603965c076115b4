//! Viewport - map region framing a result set

use serde::{Deserialize, Serialize};

use super::{Coordinate, CoordinateSpan};

/// Center and span of the visible map region
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: Coordinate,
    pub span: CoordinateSpan,
}

impl Viewport {
    pub const fn new(center: Coordinate, span: CoordinateSpan) -> Self {
        Self { center, span }
    }

    /// Whether the coordinate lies inside the region (edges inclusive).
    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        let half_lat = self.span.latitude_delta / 2.0;
        let half_lon = self.span.longitude_delta / 2.0;
        (coordinate.latitude - self.center.latitude).abs() <= half_lat
            && (coordinate.longitude - self.center.longitude).abs() <= half_lon
    }
}
