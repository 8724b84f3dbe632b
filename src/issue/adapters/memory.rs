//! In-memory issue tracker for tests and local runs.

use crate::issue::ports::{IssueTracker, IssueTrackerError, IssueTrackerResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Comment recorded by [`InMemoryIssueTracker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedComment {
    /// Issue the comment was added to.
    pub issue_key: String,
    /// Comment text.
    pub body: String,
}

/// Thread-safe in-memory issue tracker.
///
/// Cloning yields a handle onto the same issues and comments.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIssueTracker {
    state: Arc<RwLock<TrackerState>>,
}

#[derive(Debug, Default)]
struct TrackerState {
    titles: HashMap<String, String>,
    comments: Vec<RecordedComment>,
    rejects_comments: bool,
}

impl InMemoryIssueTracker {
    /// Creates a tracker with no issues.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an issue title.
    #[must_use]
    pub fn with_issue(self, issue_key: &str, title: &str) -> Self {
        self.write()
            .titles
            .insert(issue_key.to_owned(), title.to_owned());
        self
    }

    /// Makes every later comment fail.
    pub fn reject_comments(&self) {
        self.write().rejects_comments = true;
    }

    /// Returns every comment added so far.
    #[must_use]
    pub fn comments(&self) -> Vec<RecordedComment> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .comments
            .clone()
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, TrackerState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl IssueTracker for InMemoryIssueTracker {
    async fn issue_title(&self, issue_key: &str) -> IssueTrackerResult<String> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .titles
            .get(issue_key)
            .cloned()
            .ok_or_else(|| IssueTrackerError::NotFound(issue_key.to_owned()))
    }

    async fn add_comment(&self, issue_key: &str, body: &str) -> IssueTrackerResult<()> {
        let mut state = self.write();
        if state.rejects_comments {
            return Err(IssueTrackerError::Api {
                status: 403,
                message: "comments are disabled".to_owned(),
            });
        }
        state.comments.push(RecordedComment {
            issue_key: issue_key.to_owned(),
            body: body.to_owned(),
        });
        Ok(())
    }
}
