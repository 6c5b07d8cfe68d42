//! Achievement evaluation.
//!
//! The catalog is an injected read-only table rather than a module-level
//! static, so tests can run against synthetic catalogs. Evaluation is pure:
//! aggregated stats in, newly unlocked entries out. Persistence of unlock
//! rows stays in the repository.

mod catalog;
mod evaluator;

pub use catalog::*;
pub use evaluator::*;
