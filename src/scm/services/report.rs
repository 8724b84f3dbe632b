//! Per-repository record of what a cascade did.

use crate::scm::domain::{BranchName, PullRequestHandle};
use serde::{Deserialize, Serialize};

/// What happened in one repository of a cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum StepAction {
    /// The branch was created and pushed.
    Created,
    /// The branch already existed; nothing was pushed.
    AlreadyExists,
    /// The branch was deleted and the deletion pushed.
    Deleted,
    /// The branch did not exist; nothing was pushed.
    AlreadyAbsent,
    /// Head and base were identical; no pull request was needed.
    Identical {
        /// Release branch the head was compared against.
        base: BranchName,
    },
    /// A new pull request was opened.
    PullRequestOpened {
        /// Release branch targeted by the pull request.
        base: BranchName,
        /// Handle of the new pull request.
        pull_request: PullRequestHandle,
    },
    /// An open pull request for the head branch already existed.
    PullRequestReused {
        /// Release branch selected for the comparison.
        base: BranchName,
        /// Handle of the existing pull request.
        pull_request: PullRequestHandle,
    },
}

impl StepAction {
    /// Returns `true` when the step changed remote state.
    #[must_use]
    pub const fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::Created | Self::Deleted | Self::PullRequestOpened { .. }
        )
    }
}

/// One repository's step within a cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeStep {
    /// Repository the step ran against.
    pub repository: String,
    /// What the step did.
    pub action: StepAction,
}

/// Ordered steps of one orchestrator call, submodules before their parent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeReport {
    steps: Vec<CascadeStep>,
}

impl CascadeReport {
    /// Creates an empty report.
    #[must_use]
    pub const fn new() -> Self {
        Self { steps: Vec::new() }
    }

    pub(crate) fn push(&mut self, repository: &str, action: StepAction) {
        self.steps.push(CascadeStep {
            repository: repository.to_owned(),
            action,
        });
    }

    /// Returns the steps in execution order.
    #[must_use]
    pub fn steps(&self) -> &[CascadeStep] {
        &self.steps
    }

    /// Returns the step recorded for `repository`, if any.
    #[must_use]
    pub fn step_for(&self, repository: &str) -> Option<&CascadeStep> {
        self.steps.iter().find(|step| step.repository == repository)
    }

    /// Returns the number of steps that changed remote state.
    #[must_use]
    pub fn mutation_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| step.action.is_mutation())
            .count()
    }
}
