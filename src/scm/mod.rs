//! Branch lifecycle orchestration over a repository and its submodules.
//!
//! Creating, deleting, and releasing a branch cascades depth-first through
//! every submodule before touching the parent repository. Each step consults
//! live repository state, so operations are idempotent. Callers can observe
//! mutations through [`ports::ScmHook`]. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
