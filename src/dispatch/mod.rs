//! Routing of issue tracker events to branch lifecycle operations.
//!
//! The dispatcher receives decoded webhook events, selects every build
//! configuration the event applies to, and runs the perform state machine
//! for each one on a per-configuration sequential queue. Registered
//! listeners then receive the raw event. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Dispatch, perform, and provisioning services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
