//! Service Ports
//!
//! Abstract interfaces for external services.

mod geo_search;
mod preview_scene;

pub use geo_search::*;
pub use preview_scene::*;
