//! Step definitions for issue dispatch scenarios.

mod given;
mod then;
mod when;
pub mod world;
