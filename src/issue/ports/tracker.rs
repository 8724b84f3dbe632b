//! Issue tracker port.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for issue tracker operations.
pub type IssueTrackerResult<T> = Result<T, IssueTrackerError>;

/// Read and comment access to the issue tracker.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Returns the summary line of the issue.
    async fn issue_title(&self, issue_key: &str) -> IssueTrackerResult<String>;

    /// Adds a comment to the issue.
    async fn add_comment(&self, issue_key: &str, body: &str) -> IssueTrackerResult<()>;
}

/// Errors returned by issue tracker adapters.
#[derive(Debug, Clone, Error)]
pub enum IssueTrackerError {
    /// The issue does not exist or is not visible.
    #[error("issue {0} not found")]
    NotFound(String),

    /// The tracker answered with a non-success status.
    #[error("tracker request failed with status {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body or reason.
        message: String,
    },

    /// Network or I/O failure reaching the tracker.
    #[error("tracker transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl IssueTrackerError {
    /// Wraps a transport failure.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
