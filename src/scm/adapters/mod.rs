//! Adapter implementations for repository ports.

pub mod github;
pub mod memory;
