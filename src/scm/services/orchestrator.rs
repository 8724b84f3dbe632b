//! Branch lifecycle orchestration across a repository and its submodules.
//!
//! Every operation cascades depth-first: each submodule (in enumeration
//! order, recursively) is fully processed before its parent. Decisions are
//! taken against live branch and pull request state, so repeating an
//! operation is a no-op once it has been applied.

use crate::scm::{
    domain::{BranchName, PullRequestRequest, ReleaseOrdering},
    ports::{HookTarget, ScmClient, ScmClientError, ScmHook, ScmHookError},
    services::{CascadeReport, StepAction},
};
use minijinja::{Environment, context};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Default pull request title template.
pub const DEFAULT_PULL_REQUEST_TITLE: &str = "Please merge {{ head }} into '{{ base }}'";

/// What to do with the rest of a cascade once one repository fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CascadePolicy {
    /// Stop at the first failure. Steps already applied stay applied.
    #[default]
    Abort,
    /// Visit every repository, then report all failures together.
    Continue,
}

/// Tunables shared by an orchestrator and the orchestrators it derives for
/// submodules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorSettings {
    /// Failure handling across the submodule cascade.
    pub cascade_policy: CascadePolicy,
    /// Order used to select the current release branch.
    pub release_ordering: ReleaseOrdering,
    /// `minijinja` template for pull request titles; receives `head` and
    /// `base`.
    pub pull_request_title_template: String,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            cascade_policy: CascadePolicy::default(),
            release_ordering: ReleaseOrdering::default(),
            pull_request_title_template: DEFAULT_PULL_REQUEST_TITLE.to_owned(),
        }
    }
}

/// Failure recorded for one repository under [`CascadePolicy::Continue`].
#[derive(Debug, Clone)]
pub struct CascadeFailure {
    /// Repository whose step failed.
    pub repository: String,
    /// Why it failed.
    pub error: OrchestratorError,
}

/// Errors returned by orchestrator operations.
#[derive(Debug, Clone, Error)]
pub enum OrchestratorError {
    /// A repository call failed.
    #[error(transparent)]
    Scm(#[from] ScmClientError),

    /// No branch follows the release naming convention, so a pull request
    /// has no base to target.
    #[error("no release branch found in repository {repository}")]
    ReleaseBranchNotFound {
        /// Repository without a release branch.
        repository: String,
    },

    /// A before/after hook failed.
    #[error("hook failed in repository {repository}: {error}")]
    Hook {
        /// Repository the hook ran for.
        repository: String,
        /// Hook failure.
        error: ScmHookError,
    },

    /// The pull request title template could not be rendered.
    #[error("failed to render pull request title: {0}")]
    Template(String),

    /// One or more repositories failed under [`CascadePolicy::Continue`].
    #[error("cascade failed in {} repositories", .failures.len())]
    CascadeFailed {
        /// Steps that completed.
        completed: CascadeReport,
        /// Failures in execution order.
        failures: Vec<CascadeFailure>,
    },
}

/// Result type for orchestrator operations.
pub type OrchestratorResult<T> = Result<T, OrchestratorError>;

type CascadeFuture<'f> = Pin<Box<dyn Future<Output = OrchestratorResult<()>> + Send + 'f>>;

#[derive(Debug, Clone, Copy)]
enum Operation<'a> {
    Create(&'a BranchName),
    Delete(&'a BranchName),
    Release {
        head: &'a BranchName,
        description: &'a str,
    },
}

#[derive(Default)]
struct CascadeState {
    report: CascadeReport,
    failures: Vec<CascadeFailure>,
}

impl CascadeState {
    fn finish(self) -> OrchestratorResult<CascadeReport> {
        if self.failures.is_empty() {
            return Ok(self.report);
        }
        Err(OrchestratorError::CascadeFailed {
            completed: self.report,
            failures: self.failures,
        })
    }
}

/// Creates, deletes, and releases branches on one repository and,
/// recursively, on all of its submodules.
#[derive(Clone)]
pub struct BranchLifecycleOrchestrator {
    client: Arc<dyn ScmClient>,
    settings: Arc<OrchestratorSettings>,
}

impl BranchLifecycleOrchestrator {
    /// Binds an orchestrator to a repository client.
    #[must_use]
    pub fn new(client: Arc<dyn ScmClient>, settings: OrchestratorSettings) -> Self {
        Self {
            client,
            settings: Arc::new(settings),
        }
    }

    /// Returns the repository client this orchestrator is bound to.
    #[must_use]
    pub fn client(&self) -> &dyn ScmClient {
        &*self.client
    }

    /// Returns the orchestrator settings.
    #[must_use]
    pub fn settings(&self) -> &OrchestratorSettings {
        &self.settings
    }

    /// Ensures `name` exists in every submodule and then in this repository.
    ///
    /// Repositories that already have the branch are left untouched and the
    /// hook is not invoked for them.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestratorError`] when a repository call or hook fails.
    pub async fn create_branch(
        &self,
        name: &BranchName,
        hook: &dyn ScmHook,
    ) -> OrchestratorResult<CascadeReport> {
        self.run(Operation::Create(name), hook).await
    }

    /// Ensures `name` is absent from every submodule and then from this
    /// repository.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestratorError`] when a repository call or hook fails.
    pub async fn delete_branch(
        &self,
        name: &BranchName,
        hook: &dyn ScmHook,
    ) -> OrchestratorResult<CascadeReport> {
        self.run(Operation::Delete(name), hook).await
    }

    /// Proposes merging `name` into the current release branch of every
    /// submodule and then of this repository.
    ///
    /// Nothing is opened when the branch is identical to the release branch
    /// or when an open pull request with the same head already exists.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestratorError::ReleaseBranchNotFound`] when a repository
    /// has no release branch, or another [`OrchestratorError`] when a
    /// repository call or hook fails.
    pub async fn release_branch(
        &self,
        name: &BranchName,
        description: &str,
        hook: &dyn ScmHook,
    ) -> OrchestratorResult<CascadeReport> {
        self.run(
            Operation::Release {
                head: name,
                description,
            },
            hook,
        )
        .await
    }

    async fn run(
        &self,
        operation: Operation<'_>,
        hook: &dyn ScmHook,
    ) -> OrchestratorResult<CascadeReport> {
        let mut state = CascadeState::default();
        self.cascade(&operation, hook, &mut state).await?;
        state.finish()
    }

    fn for_submodule(&self, client: Arc<dyn ScmClient>) -> Self {
        Self {
            client,
            settings: Arc::clone(&self.settings),
        }
    }

    fn cascade<'f>(
        &'f self,
        operation: &'f Operation<'f>,
        hook: &'f dyn ScmHook,
        state: &'f mut CascadeState,
    ) -> CascadeFuture<'f> {
        Box::pin(async move {
            match self.client.submodules().await {
                Ok(submodules) => {
                    for submodule in submodules {
                        let child = self.for_submodule(submodule);
                        child.cascade(operation, hook, state).await?;
                    }
                }
                Err(err) => self.record_failure(err.into(), state)?,
            }

            match self.apply(*operation, hook).await {
                Ok(action) => state.report.push(self.client.repository_name(), action),
                Err(err) => self.record_failure(err, state)?,
            }
            Ok(())
        })
    }

    fn record_failure(
        &self,
        error: OrchestratorError,
        state: &mut CascadeState,
    ) -> OrchestratorResult<()> {
        let repository = self.client.repository_name();
        match self.settings.cascade_policy {
            CascadePolicy::Abort => Err(error),
            CascadePolicy::Continue => {
                warn!(repository, %error, "step failed, continuing cascade");
                state.failures.push(CascadeFailure {
                    repository: repository.to_owned(),
                    error,
                });
                Ok(())
            }
        }
    }

    async fn apply(
        &self,
        operation: Operation<'_>,
        hook: &dyn ScmHook,
    ) -> OrchestratorResult<StepAction> {
        match operation {
            Operation::Create(name) => self.apply_create(name, hook).await,
            Operation::Delete(name) => self.apply_delete(name, hook).await,
            Operation::Release { head, description } => {
                self.apply_release(head, description, hook).await
            }
        }
    }

    async fn apply_create(
        &self,
        name: &BranchName,
        hook: &dyn ScmHook,
    ) -> OrchestratorResult<StepAction> {
        let repository = self.client.repository_name();
        if self.client.branches().await?.contains(name) {
            debug!(repository, branch = %name, "branch already created, no need to create it");
            return Ok(StepAction::AlreadyExists);
        }

        let target = HookTarget::CreateBranch(name.clone());
        self.before(hook, &target).await?;
        self.client.create_branch(name).await?;
        info!(repository, branch = %name, "branch created");
        self.after(hook, &target).await?;
        Ok(StepAction::Created)
    }

    async fn apply_delete(
        &self,
        name: &BranchName,
        hook: &dyn ScmHook,
    ) -> OrchestratorResult<StepAction> {
        let repository = self.client.repository_name();
        if !self.client.branches().await?.contains(name) {
            debug!(repository, branch = %name, "branch does not exist, no need to delete it");
            return Ok(StepAction::AlreadyAbsent);
        }

        let target = HookTarget::DeleteBranch(name.clone());
        self.before(hook, &target).await?;
        self.client.delete_branch(name).await?;
        info!(repository, branch = %name, "branch deleted");
        self.after(hook, &target).await?;
        Ok(StepAction::Deleted)
    }

    async fn apply_release(
        &self,
        head: &BranchName,
        description: &str,
        hook: &dyn ScmHook,
    ) -> OrchestratorResult<StepAction> {
        let repository = self.client.repository_name();
        let branches = self.client.branches().await?;
        // Only the most recent release branch is in its development phase.
        let base = self
            .settings
            .release_ordering
            .current_release(&branches)
            .cloned()
            .ok_or_else(|| OrchestratorError::ReleaseBranchNotFound {
                repository: repository.to_owned(),
            })?;

        if self.client.compare(head, &base).await?.is_identical() {
            debug!(repository, head = %head, base = %base, "branches are identical, no need to create a pull request");
            return Ok(StepAction::Identical { base });
        }

        let existing = self
            .client
            .open_pull_requests()
            .await?
            .into_iter()
            .find(|pull_request| pull_request.head == head.as_str());
        if let Some(pull_request) = existing {
            debug!(repository, head = %head, pull_request = %pull_request.handle, "pull request already exists");
            return Ok(StepAction::PullRequestReused {
                base,
                pull_request: pull_request.handle,
            });
        }

        let request = PullRequestRequest {
            title: self.render_title(head, &base)?,
            head: head.clone(),
            base: base.clone(),
            description: description.to_owned(),
        };
        let target = HookTarget::PullRequest(request.clone());
        self.before(hook, &target).await?;
        let pull_request = self.client.create_pull_request(&request).await?;
        info!(repository, head = %head, base = %base, %pull_request, "pull request created");
        self.after(hook, &target).await?;
        Ok(StepAction::PullRequestOpened { base, pull_request })
    }

    fn render_title(&self, head: &BranchName, base: &BranchName) -> OrchestratorResult<String> {
        Environment::new()
            .render_str(
                &self.settings.pull_request_title_template,
                context! { head => head.as_str(), base => base.as_str() },
            )
            .map_err(|error| OrchestratorError::Template(error.to_string()))
    }

    async fn before(&self, hook: &dyn ScmHook, target: &HookTarget) -> OrchestratorResult<()> {
        hook.before(&*self.client, target)
            .await
            .map_err(|error| self.hook_error(error))
    }

    async fn after(&self, hook: &dyn ScmHook, target: &HookTarget) -> OrchestratorResult<()> {
        hook.after(&*self.client, target)
            .await
            .map_err(|error| self.hook_error(error))
    }

    fn hook_error(&self, error: ScmHookError) -> OrchestratorError {
        OrchestratorError::Hook {
            repository: self.client.repository_name().to_owned(),
            error,
        }
    }
}
