//! Adapter implementations for dispatch ports.

pub mod github;
pub mod memory;
