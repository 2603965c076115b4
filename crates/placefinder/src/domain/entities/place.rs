//! PlaceResult - a resolved place shown as a map marker
//!
//! Identity is the generated `id` only. Two results at the same coordinate
//! with different ids are distinct markers.

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use uuid::Uuid;

use crate::domain::value_objects::Coordinate;

/// Placeholder used when the provider supplies no usable name
pub const UNKNOWN_PLACE_NAME: &str = "Unknown Place";

/// Opaque provider-specific reference to the original result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceHandle {
    /// Provider name (e.g., "nominatim")
    pub provider: String,
    /// Provider-local identifier
    pub key: String,
    /// Untouched provider payload
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl PlaceHandle {
    pub fn new(provider: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            key: key.into(),
            payload: serde_json::Value::Null,
        }
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

/// A full-search result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceResult {
    pub id: Uuid,
    pub name: String,
    pub coordinate: Coordinate,
    pub handle: PlaceHandle,
}

impl PlaceResult {
    /// Create a result with a fresh id, falling back to
    /// [`UNKNOWN_PLACE_NAME`] when `name` is missing or blank.
    pub fn new(name: Option<String>, coordinate: Coordinate, handle: PlaceHandle) -> Self {
        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNKNOWN_PLACE_NAME.to_string());

        Self {
            id: Uuid::new_v4(),
            name,
            coordinate,
            handle,
        }
    }
}

impl PartialEq for PlaceResult {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PlaceResult {}

impl Hash for PlaceResult {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn handle() -> PlaceHandle {
        PlaceHandle::new("test", "1")
    }

    #[test]
    fn test_name_fallback() {
        let coordinate = Coordinate::new(48.8584, 2.2945);
        assert_eq!(
            PlaceResult::new(None, coordinate, handle()).name,
            UNKNOWN_PLACE_NAME
        );
        assert_eq!(
            PlaceResult::new(Some("   ".to_string()), coordinate, handle()).name,
            UNKNOWN_PLACE_NAME
        );
        assert_eq!(
            PlaceResult::new(Some("Eiffel Tower".to_string()), coordinate, handle()).name,
            "Eiffel Tower"
        );
    }

    #[test]
    fn test_identity_is_id_only() {
        let coordinate = Coordinate::new(48.8584, 2.2945);
        let a = PlaceResult::new(Some("Eiffel Tower".to_string()), coordinate, handle());
        let b = PlaceResult::new(Some("Eiffel Tower".to_string()), coordinate, handle());
        assert_ne!(a, b);

        let mut renamed = a.clone();
        renamed.name = "Tour Eiffel".to_string();
        assert_eq!(a, renamed);

        let set: HashSet<_> = [a.clone(), b, renamed].into_iter().collect();
        assert_eq!(set.len(), 2);
    }
}
