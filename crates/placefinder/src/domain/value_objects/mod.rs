//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod coordinate;
mod result_type;
mod viewport;

pub use coordinate::*;
pub use result_type::*;
pub use viewport::*;
