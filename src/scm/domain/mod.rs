//! Domain model for branch lifecycle orchestration.
//!
//! Branches are identified solely by name. Nothing in this module is
//! persisted: every decision re-reads branch and pull request state from the
//! live repository.

mod branch;
mod error;
mod ordering;
mod pull_request;

pub use branch::{BranchName, is_release_branch};
pub use error::ScmDomainError;
pub use ordering::ReleaseOrdering;
pub use pull_request::{BranchComparison, OpenPullRequest, PullRequestHandle, PullRequestRequest};
