//! Domain Services
//!
//! Stateless domain logic operating on entities and value objects.

pub mod region;

pub use region::{metric_span, region_for, region_for_coordinates, RegionConfig};
