//! Before/after interception around mutating repository operations.

use super::ScmClient;
use crate::scm::domain::{BranchName, PullRequestRequest};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for hook callbacks.
pub type ScmHookResult<T> = Result<T, ScmHookError>;

/// Operation a hook is bracketing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookTarget {
    /// A branch is about to be, or has just been, created.
    CreateBranch(BranchName),
    /// A branch is about to be, or has just been, deleted.
    DeleteBranch(BranchName),
    /// A pull request is about to be, or has just been, opened.
    PullRequest(PullRequestRequest),
}

impl HookTarget {
    /// Returns the branch the operation is keyed on (the head branch for pull
    /// requests).
    #[must_use]
    pub const fn branch(&self) -> &BranchName {
        match self {
            Self::CreateBranch(branch) | Self::DeleteBranch(branch) => branch,
            Self::PullRequest(request) => &request.head,
        }
    }
}

/// Interception point invoked exactly once before and once after every
/// mutating branch or pull request decision. Never invoked on no-op paths.
#[async_trait]
pub trait ScmHook: Send + Sync {
    /// Runs before the mutation.
    async fn before(&self, _client: &dyn ScmClient, _target: &HookTarget) -> ScmHookResult<()> {
        Ok(())
    }

    /// Runs after the mutation succeeded.
    async fn after(&self, _client: &dyn ScmClient, _target: &HookTarget) -> ScmHookResult<()> {
        Ok(())
    }
}

/// Hook with no side effects.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHook;

impl ScmHook for NoopHook {}

/// Errors raised by hook implementations.
#[derive(Debug, Clone, Error)]
pub enum ScmHookError {
    /// The hook's side effect failed.
    #[error("hook failed for branch {branch}: {source}")]
    Failed {
        /// Branch the hook was invoked for.
        branch: BranchName,
        /// Underlying failure.
        source: Arc<dyn std::error::Error + Send + Sync>,
    },
}

impl ScmHookError {
    /// Wraps a hook side-effect failure for `branch`.
    pub fn failed(branch: &BranchName, err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Failed {
            branch: branch.clone(),
            source: Arc::new(err),
        }
    }
}
