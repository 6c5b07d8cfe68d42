//! Content-tree domain logic: slide flattening and the deterministic fallback
//! course generator.

mod fallback;
mod flatten;

pub use fallback::*;
pub use flatten::*;
