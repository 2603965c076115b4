//! Ports (Interfaces)
//!
//! Abstract interfaces that define how the orchestrator
//! interacts with external geocoding and imagery services.
//!
//! Implementations of these traits live in adapter crates
//! (e.g., placefinder-osm).

pub mod services;

// Re-exports
pub use services::*;
