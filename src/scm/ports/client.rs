//! Repository port used by the branch lifecycle orchestrator.

use crate::scm::domain::{
    BranchComparison, BranchName, OpenPullRequest, PullRequestHandle, PullRequestRequest,
};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

/// Result type for source-control client operations.
pub type ScmClientResult<T> = Result<T, ScmClientError>;

/// Live view of, and mutation access to, one repository.
///
/// Every read goes to the repository; implementations must not cache
/// branch or pull request state across calls.
#[async_trait]
pub trait ScmClient: Send + Sync {
    /// Returns the short repository name (without owner or `.git`).
    fn repository_name(&self) -> &str;

    /// Returns the remote URL the repository is cloned from.
    fn remote_url(&self) -> &str;

    /// Lists every branch name currently present on the remote.
    async fn branches(&self) -> ScmClientResult<BTreeSet<BranchName>>;

    /// Creates the branch at the bound commit and pushes it to the remote.
    async fn create_branch(&self, name: &BranchName) -> ScmClientResult<()>;

    /// Deletes the branch and pushes the deletion to the remote.
    async fn delete_branch(&self, name: &BranchName) -> ScmClientResult<()>;

    /// Compares `head` against `base`.
    async fn compare(
        &self,
        head: &BranchName,
        base: &BranchName,
    ) -> ScmClientResult<BranchComparison>;

    /// Lists the open pull requests of the repository.
    async fn open_pull_requests(&self) -> ScmClientResult<Vec<OpenPullRequest>>;

    /// Opens a pull request.
    async fn create_pull_request(
        &self,
        request: &PullRequestRequest,
    ) -> ScmClientResult<PullRequestHandle>;

    /// Returns clients for the submodules recorded at the bound commit, in
    /// enumeration order.
    async fn submodules(&self) -> ScmClientResult<Vec<Arc<dyn ScmClient>>>;
}

/// Errors returned by source-control client adapters.
#[derive(Debug, Clone, Error)]
pub enum ScmClientError {
    /// The forge answered with a non-success status.
    #[error("{repository}: API request failed with status {status}: {message}")]
    Api {
        /// Repository the request targeted.
        repository: String,
        /// HTTP status code.
        status: u16,
        /// Response body or reason.
        message: String,
    },

    /// The forge answered with a payload that could not be interpreted.
    #[error("{repository}: unexpected response: {reason}")]
    UnexpectedResponse {
        /// Repository the request targeted.
        repository: String,
        /// Why the response was rejected.
        reason: String,
    },

    /// Network or I/O failure reaching the forge.
    #[error("transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl ScmClientError {
    /// Wraps a transport-level failure.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
