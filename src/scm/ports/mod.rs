//! Port contracts for branch lifecycle orchestration.
//!
//! Ports define infrastructure-agnostic interfaces used by the orchestrator.

mod client;
mod hook;

pub use client::{ScmClient, ScmClientError, ScmClientResult};
pub use hook::{HookTarget, NoopHook, ScmHook, ScmHookError, ScmHookResult};
