//! OpenStreetMap providers for Placefinder
//!
//! reqwest-based implementations of the placefinder provider ports:
//! - `NominatimProvider`: autocomplete and full search against a
//!   Nominatim-compatible geocoder
//! - `MapillaryPreview`: street-level preview scenes from Mapillary
//!
//! # Usage
//!
//! ```rust,ignore
//! use placefinder_osm::{NominatimConfig, NominatimProvider};
//!
//! let config = NominatimConfig::new("my-app/1.0 (me@example.com)");
//! let provider = NominatimProvider::new(config)?;
//! ```

mod config;
mod http;
mod mapillary;
mod nominatim;

pub use config::{MapillaryConfig, NominatimConfig};
pub use mapillary::MapillaryPreview;
pub use nominatim::NominatimProvider;
