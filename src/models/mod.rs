//! Data models for the E-Gurukul platform.
//!
//! These models match the frontend TypeScript interfaces exactly for seamless
//! interoperability (camelCase on the wire).

mod achievement;
mod content;
mod course;
mod progress;

pub use achievement::*;
pub use content::*;
pub use course::*;
pub use progress::*;
