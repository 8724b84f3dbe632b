//! Issue events delivered by the tracker webhook.

use super::IssueDomainError;
use crate::scm::domain::{BranchName, ScmDomainError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

const EVENT_ID_PREFIX: &str = "jira:";

/// Kind of tracker event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueEventType {
    /// An issue was created.
    IssueCreated,
    /// An issue was edited or transitioned.
    IssueUpdated,
    /// An issue was deleted.
    IssueDeleted,
    /// Work was logged against an issue.
    WorklogUpdated,
}

impl IssueEventType {
    /// Returns the wire identifier, e.g. `jira:issue_created`.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::IssueCreated => "jira:issue_created",
            Self::IssueUpdated => "jira:issue_updated",
            Self::IssueDeleted => "jira:issue_deleted",
            Self::WorklogUpdated => "jira:worklog_updated",
        }
    }

    /// Parses a wire identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IssueDomainError::UnknownEventType`] for identifiers the
    /// tracker does not define.
    pub fn from_id(id: &str) -> Result<Self, IssueDomainError> {
        [
            Self::IssueCreated,
            Self::IssueUpdated,
            Self::IssueDeleted,
            Self::WorklogUpdated,
        ]
        .into_iter()
        .find(|candidate| candidate.id() == id)
        .ok_or_else(|| IssueDomainError::UnknownEventType(id.to_owned()))
    }
}

impl fmt::Display for IssueEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = self.id();
        let name = id.strip_prefix(EVENT_ID_PREFIX).unwrap_or(id);
        write!(f, "{}", name.replace('_', " "))
    }
}

/// Issue fields carried by an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSnapshot {
    /// Issue key, e.g. `PROJ-1`.
    pub key: String,
    /// Issue type name, e.g. `Story`.
    pub issue_type: String,
    /// Workflow status name after the event, e.g. `In Review`.
    pub status: String,
    /// Key of the project the issue belongs to.
    pub project_key: String,
}

impl IssueSnapshot {
    /// Creates a snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`IssueDomainError::EmptyField`] when the key or the issue
    /// type is blank.
    pub fn new(
        key: impl Into<String>,
        issue_type: impl Into<String>,
        status: impl Into<String>,
        project_key: impl Into<String>,
    ) -> Result<Self, IssueDomainError> {
        let snapshot = Self {
            key: key.into().trim().to_owned(),
            issue_type: issue_type.into().trim().to_owned(),
            status: status.into(),
            project_key: project_key.into(),
        };
        if snapshot.key.is_empty() {
            return Err(IssueDomainError::EmptyField("issue key"));
        }
        if snapshot.issue_type.is_empty() {
            return Err(IssueDomainError::EmptyField("issue type"));
        }
        Ok(snapshot)
    }
}

/// One tracker event.
///
/// Two events are equal when they share the event type and the issue key,
/// regardless of status or changelog. The per-configuration queue relies on
/// this to drop duplicate deliveries.
///
/// # Examples
///
///     use branchflow::issue::domain::{IssueEvent, IssueEventType, IssueSnapshot};
///
///     let todo = IssueSnapshot::new("PROJ-1", "Story", "To Do", "PROJ").expect("valid");
///     let doing = IssueSnapshot::new("PROJ-1", "Story", "Doing", "PROJ").expect("valid");
///     let first = IssueEvent::new(IssueEventType::IssueUpdated, todo, true);
///     let second = IssueEvent::new(IssueEventType::IssueUpdated, doing, false);
///     assert_eq!(first, second);
///     assert_eq!(first.branch_name().expect("valid").as_str(), "Story/PROJ-1");
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueEvent {
    event_type: IssueEventType,
    issue: IssueSnapshot,
    status_changed: bool,
}

impl IssueEvent {
    /// Creates an event.
    #[must_use]
    pub const fn new(event_type: IssueEventType, issue: IssueSnapshot, status_changed: bool) -> Self {
        Self {
            event_type,
            issue,
            status_changed,
        }
    }

    /// Returns the event type.
    #[must_use]
    pub const fn event_type(&self) -> IssueEventType {
        self.event_type
    }

    /// Returns the issue fields.
    #[must_use]
    pub const fn issue(&self) -> &IssueSnapshot {
        &self.issue
    }

    /// Returns `true` when the changelog records a status transition.
    #[must_use]
    pub const fn status_changed(&self) -> bool {
        self.status_changed
    }

    /// Returns the branch tracking this issue, `<issueType>/<issueKey>`.
    ///
    /// # Errors
    ///
    /// Returns [`ScmDomainError::InvalidBranchName`] when the issue type or
    /// key cannot form a branch name (for example, contains whitespace).
    pub fn branch_name(&self) -> Result<BranchName, ScmDomainError> {
        BranchName::for_issue(&self.issue.issue_type, &self.issue.key)
    }
}

impl PartialEq for IssueEvent {
    fn eq(&self, other: &Self) -> bool {
        self.event_type == other.event_type && self.issue.key == other.issue.key
    }
}

impl Eq for IssueEvent {}

impl Hash for IssueEvent {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.event_type.hash(state);
        self.issue.key.hash(state);
    }
}
