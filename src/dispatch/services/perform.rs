//! Mapping of one issue event onto branch lifecycle operations.
//!
//! | Condition | Action |
//! |---|---|
//! | updated and in the review status | release the branch with the issue title |
//! | created/updated, not done, view exists | nothing, already exists |
//! | done, view missing | nothing, already deleted |
//! | done, view exists | handled as a deletion whatever the event type |
//! | created/updated | ensure view, create branch, post progress comment |
//! | deleted | remove view, delete branch |
//! | anything else | unsupported event type |

use super::hooks::{JobDeprovisionHook, JobProvisionHook};
use crate::dispatch::{
    domain::{BuildConfiguration, GroupingKey, PerformOutcome},
    ports::{GroupingStore, GroupingStoreError, JobProvisioner},
};
use crate::issue::{
    domain::{IssueEvent, IssueEventType},
    ports::{IssueTracker, IssueTrackerError},
};
use crate::scm::{
    domain::{BranchName, ScmDomainError},
    ports::{NoopHook, ScmClient},
    services::{BranchLifecycleOrchestrator, OrchestratorError, OrchestratorSettings},
};
use minijinja::{Environment, context};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Workflow and presentation settings for [`EventPerformer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerformerSettings {
    /// Issue status that requests a pull request.
    pub review_status: String,
    /// Issue status that retires the branch.
    pub done_status: String,
    /// Root URL of the CI server, used to link views in comments.
    pub ci_root_url: String,
    /// `minijinja` template for the progress comment.
    pub progress_comment_template: String,
    /// Settings for the orchestrators created per run.
    pub orchestrator: OrchestratorSettings,
}

impl Default for PerformerSettings {
    fn default() -> Self {
        crate::config::FlowConfig::default().performer_settings()
    }
}

/// Errors that stop a perform run.
#[derive(Debug, Clone, Error)]
pub enum PerformError {
    /// The issue type and key do not form a branch name.
    #[error(transparent)]
    Branch(#[from] ScmDomainError),

    /// The issue title needed for the pull request could not be read.
    #[error("failed to read issue {issue_key}: {source}")]
    IssueLookup {
        /// Issue whose title was requested.
        issue_key: String,
        /// Tracker failure.
        source: IssueTrackerError,
    },

    /// The grouping store failed.
    #[error(transparent)]
    Grouping(#[from] GroupingStoreError),

    /// The progress comment template could not be rendered.
    #[error("failed to render progress comment: {0}")]
    Template(String),

    /// A branch lifecycle operation failed.
    #[error(transparent)]
    Orchestration(#[from] OrchestratorError),

    /// The event type has no mapped operation.
    #[error("event type '{0}' not supported")]
    UnsupportedEventType(IssueEventType),
}

/// Result type for perform runs.
pub type PerformResult<T> = Result<T, PerformError>;

/// Runs the event-to-operation state machine for one configuration.
#[derive(Clone)]
pub struct EventPerformer {
    tracker: Arc<dyn IssueTracker>,
    grouping: Arc<dyn GroupingStore>,
    provisioner: Arc<dyn JobProvisioner>,
    settings: Arc<PerformerSettings>,
}

impl EventPerformer {
    /// Creates a performer.
    #[must_use]
    pub fn new(
        tracker: Arc<dyn IssueTracker>,
        grouping: Arc<dyn GroupingStore>,
        provisioner: Arc<dyn JobProvisioner>,
        settings: PerformerSettings,
    ) -> Self {
        Self {
            tracker,
            grouping,
            provisioner,
            settings: Arc::new(settings),
        }
    }

    /// Returns the performer settings.
    #[must_use]
    pub fn settings(&self) -> &PerformerSettings {
        &self.settings
    }

    /// Applies `event` to the repository behind `client`.
    ///
    /// # Errors
    ///
    /// Returns [`PerformError`] when the event cannot be mapped, a
    /// collaborator fails, or the event type is not supported. Progress
    /// comments are best effort and never fail the run.
    pub async fn perform(
        &self,
        configuration: &BuildConfiguration,
        client: Arc<dyn ScmClient>,
        event: &IssueEvent,
    ) -> PerformResult<PerformOutcome> {
        let issue = event.issue();
        let branch = event.branch_name()?;
        let orchestrator =
            BranchLifecycleOrchestrator::new(client, self.settings.orchestrator.clone());

        if event.event_type() == IssueEventType::IssueUpdated
            && issue.status == self.settings.review_status
        {
            return self.release(&orchestrator, &branch, &issue.key).await;
        }

        let repository = orchestrator.client().repository_name();
        let key = GroupingKey::for_branch(repository, &branch);
        let view_exists = self.grouping.exists(&key).await?;
        let is_done = issue.status == self.settings.done_status;
        let is_upsert = matches!(
            event.event_type(),
            IssueEventType::IssueCreated | IssueEventType::IssueUpdated
        );

        if is_upsert && !is_done && view_exists {
            debug!(repository, branch = %branch, "job already exists, nothing to do");
            return Ok(PerformOutcome::AlreadyExists);
        }
        if is_done && !view_exists {
            debug!(repository, branch = %branch, "job already deleted, nothing to do");
            return Ok(PerformOutcome::AlreadyDeleted);
        }
        let effective = if is_done {
            IssueEventType::IssueDeleted
        } else {
            event.event_type()
        };

        match effective {
            IssueEventType::IssueCreated | IssueEventType::IssueUpdated => {
                let comment = self.render_comment(repository, &branch, &key, &issue.key)?;
                self.grouping.create(&key).await?;
                let hook = JobProvisionHook::new(
                    Arc::clone(&self.provisioner),
                    configuration.template_job(),
                );
                let report = orchestrator.create_branch(&branch, &hook).await?;
                self.post_comment(&issue.key, &comment).await;
                Ok(PerformOutcome::BranchCreated { report })
            }
            IssueEventType::IssueDeleted => {
                self.grouping.delete(&key).await?;
                let hook = JobDeprovisionHook::new(Arc::clone(&self.provisioner));
                let report = orchestrator.delete_branch(&branch, &hook).await?;
                Ok(PerformOutcome::BranchDeleted { report })
            }
            IssueEventType::WorklogUpdated => {
                warn!(repository, event = %effective, "event type not supported");
                Err(PerformError::UnsupportedEventType(effective))
            }
        }
    }

    async fn release(
        &self,
        orchestrator: &BranchLifecycleOrchestrator,
        branch: &BranchName,
        issue_key: &str,
    ) -> PerformResult<PerformOutcome> {
        let title = self.tracker.issue_title(issue_key).await.map_err(|source| {
            PerformError::IssueLookup {
                issue_key: issue_key.to_owned(),
                source,
            }
        })?;
        let report = orchestrator.release_branch(branch, &title, &NoopHook).await?;
        info!(
            repository = orchestrator.client().repository_name(),
            branch = %branch,
            mutations = report.mutation_count(),
            "release requested"
        );
        Ok(PerformOutcome::ReleaseRequested { report })
    }

    fn render_comment(
        &self,
        repository: &str,
        branch: &BranchName,
        key: &GroupingKey,
        issue_key: &str,
    ) -> PerformResult<String> {
        Environment::new()
            .render_str(
                &self.settings.progress_comment_template,
                context! {
                    branch => branch.as_str(),
                    view_url => key.view_url(&self.settings.ci_root_url),
                    repository => repository,
                    issue_key => issue_key,
                },
            )
            .map_err(|err| PerformError::Template(err.to_string()))
    }

    async fn post_comment(&self, issue_key: &str, comment: &str) {
        match self.tracker.add_comment(issue_key, comment).await {
            Ok(()) => debug!(issue_key, "progress comment posted"),
            Err(err) => warn!(issue_key, error = %err, "failed to post progress comment"),
        }
    }
}
