//! Outcomes of dispatching one event.

use super::{ConfigurationId, Principal};
use crate::scm::services::CascadeReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What the perform state machine did for one configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PerformOutcome {
    /// Pull requests were opened or reused into the current release.
    ReleaseRequested {
        /// Per-repository steps.
        report: CascadeReport,
    },
    /// The grouping record and branch were ensured.
    BranchCreated {
        /// Per-repository steps.
        report: CascadeReport,
    },
    /// The grouping record and branch were removed.
    BranchDeleted {
        /// Per-repository steps.
        report: CascadeReport,
    },
    /// The branch view already existed; nothing was done.
    AlreadyExists,
    /// The branch view was already gone; nothing was done.
    AlreadyDeleted,
}

/// Result of scheduling one configuration run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    /// The run finished.
    Completed {
        /// What it did.
        outcome: PerformOutcome,
    },
    /// An equal event was already waiting for this configuration.
    AlreadyQueued,
    /// The run failed.
    Failed {
        /// Human-readable failure.
        reason: String,
    },
}

/// Run of one configuration within a dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationRun {
    /// Configuration identifier.
    pub configuration: ConfigurationId,
    /// Configuration display name.
    pub name: String,
    /// Outcome of the run.
    pub outcome: RunOutcome,
}

/// Listener that returned an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListenerFailure {
    /// Listener name.
    pub listener: String,
    /// Human-readable failure.
    pub reason: String,
}

/// Whether the event went through the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchDisposition {
    /// Configurations and listeners were invoked.
    Dispatched,
    /// The event carried no status transition and was discarded.
    StatusUnchanged,
}

/// Record of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchReport {
    /// Unique identifier of this dispatch.
    pub run_id: Uuid,
    /// When the event was received.
    pub received_at: DateTime<Utc>,
    /// Caller on whose behalf the event was dispatched.
    pub triggered_by: Principal,
    /// Whether the event went through.
    pub disposition: DispatchDisposition,
    /// Runs in configuration order.
    pub runs: Vec<ConfigurationRun>,
    /// Listener failures in registration order.
    pub listener_failures: Vec<ListenerFailure>,
}

impl DispatchReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new(
        received_at: DateTime<Utc>,
        triggered_by: Principal,
        disposition: DispatchDisposition,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            received_at,
            triggered_by,
            disposition,
            runs: Vec::new(),
            listener_failures: Vec::new(),
        }
    }

    /// Returns the run recorded for `configuration`, if any.
    #[must_use]
    pub fn run_for(&self, configuration: ConfigurationId) -> Option<&ConfigurationRun> {
        self.runs
            .iter()
            .find(|run| run.configuration == configuration)
    }

    /// Returns `true` when every run completed and every listener succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.listener_failures.is_empty()
            && self
                .runs
                .iter()
                .all(|run| !matches!(run.outcome, RunOutcome::Failed { .. }))
    }
}
