//! Application services for branch lifecycle orchestration.

mod orchestrator;
mod report;

pub use orchestrator::{
    BranchLifecycleOrchestrator, CascadeFailure, CascadePolicy, DEFAULT_PULL_REQUEST_TITLE,
    OrchestratorError, OrchestratorResult, OrchestratorSettings,
};
pub use report::{CascadeReport, CascadeStep, StepAction};
