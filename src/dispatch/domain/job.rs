//! Build jobs provisioned per repository and branch.

use crate::scm::domain::BranchName;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of a provisioned job: `<repository>_<view>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobName(String);

impl JobName {
    /// Derives the job name for `branch` of `repository`.
    #[must_use]
    pub fn for_branch(repository: &str, branch: &BranchName) -> Self {
        Self(format!("{repository}_{}", branch.view_name()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything needed to create a job from a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSpec {
    /// Name of the new job.
    pub name: JobName,
    /// Job the new one is copied from.
    pub template: String,
    /// Remote the job checks out.
    pub remote_url: String,
    /// Branch the job builds.
    pub branch: BranchName,
}
