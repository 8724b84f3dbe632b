//! Port contracts for the issue tracker.

mod tracker;

pub use tracker::{IssueTracker, IssueTrackerError, IssueTrackerResult};

#[cfg(test)]
pub use tracker::MockIssueTracker;
