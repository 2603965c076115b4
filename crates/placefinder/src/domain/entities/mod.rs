//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - CompletionSuggestion: autocomplete entry
//! - PlaceResult: resolved place (map marker)
//! - PreviewScene: street-level preview handle

mod completion;
mod place;
mod preview;

pub use completion::*;
pub use place::*;
pub use preview::*;
