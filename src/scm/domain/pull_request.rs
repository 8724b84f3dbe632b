//! Pull-request value objects used by the release operation.

use super::BranchName;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of comparing a head branch against a base branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchComparison {
    /// Both branches point at the same tree of commits.
    Identical,
    /// The head branch contains commits the base does not.
    Ahead,
    /// The base branch contains commits the head does not.
    Behind,
    /// Both branches contain commits the other does not.
    Diverged,
}

impl BranchComparison {
    /// Returns `true` when there is nothing to propose for merging.
    #[must_use]
    pub const fn is_identical(self) -> bool {
        matches!(self, Self::Identical)
    }

    /// Returns the forge status string for this comparison.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Identical => "identical",
            Self::Ahead => "ahead",
            Self::Behind => "behind",
            Self::Diverged => "diverged",
        }
    }
}

impl TryFrom<&str> for BranchComparison {
    type Error = super::ScmDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "identical" => Ok(Self::Identical),
            "ahead" => Ok(Self::Ahead),
            "behind" => Ok(Self::Behind),
            "diverged" => Ok(Self::Diverged),
            _ => Err(super::ScmDomainError::UnknownComparison(value.to_owned())),
        }
    }
}

/// Request to open a pull request from `head` into `base`.
///
/// Exists only for the duration of one release operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestRequest {
    /// Human-readable pull request title.
    pub title: String,
    /// Branch carrying the changes.
    pub head: BranchName,
    /// Current release branch receiving the changes.
    pub base: BranchName,
    /// Pull request body.
    pub description: String,
}

/// Open pull request as listed by the forge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenPullRequest {
    /// Handle identifying the pull request.
    pub handle: PullRequestHandle,
    /// Head branch name.
    pub head: String,
    /// Base branch name.
    pub base: String,
}

/// Forge-side handle for a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PullRequestHandle {
    /// Pull request number within its repository.
    pub number: u64,
    /// Browser URL, when the forge reports one.
    pub url: Option<String>,
}

impl PullRequestHandle {
    /// Creates a handle from a pull request number.
    #[must_use]
    pub const fn new(number: u64) -> Self {
        Self { number, url: None }
    }
}

impl fmt::Display for PullRequestHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.number)
    }
}
