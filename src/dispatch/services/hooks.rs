//! Hooks that keep build jobs in step with branches.
//!
//! Both hooks act after the branch mutation succeeded and ignore every
//! other target, so they can be passed to any orchestrator operation.

use crate::dispatch::{
    domain::{JobName, JobSpec},
    ports::{JobProvisioner, JobProvisionerError},
};
use crate::scm::ports::{HookTarget, ScmClient, ScmHook, ScmHookError, ScmHookResult};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

/// Provisions `<repository>_<view>` from a template job once a branch has
/// been created, replacing a job of the same name.
#[derive(Clone)]
pub struct JobProvisionHook {
    provisioner: Arc<dyn JobProvisioner>,
    template_job: String,
}

impl JobProvisionHook {
    /// Creates a hook cloning `template_job`.
    #[must_use]
    pub fn new(provisioner: Arc<dyn JobProvisioner>, template_job: impl Into<String>) -> Self {
        Self {
            provisioner,
            template_job: template_job.into(),
        }
    }
}

#[async_trait]
impl ScmHook for JobProvisionHook {
    async fn after(&self, client: &dyn ScmClient, target: &HookTarget) -> ScmHookResult<()> {
        let HookTarget::CreateBranch(branch) = target else {
            return Ok(());
        };
        let repository = client.repository_name();
        let name = JobName::for_branch(repository, branch);
        let failed = |err: JobProvisionerError| ScmHookError::failed(branch, err);

        if self.provisioner.exists(&name).await.map_err(failed)? {
            debug!(repository, job = %name, "replacing existing job");
            self.provisioner.delete(&name).await.map_err(failed)?;
        }
        let spec = JobSpec {
            name,
            template: self.template_job.clone(),
            remote_url: client.remote_url().to_owned(),
            branch: branch.clone(),
        };
        self.provisioner.create(&spec).await.map_err(failed)?;
        info!(repository, job = %spec.name, template = %spec.template, "job provisioned");
        Ok(())
    }
}

/// Removes `<repository>_<view>` once a branch has been deleted.
#[derive(Clone)]
pub struct JobDeprovisionHook {
    provisioner: Arc<dyn JobProvisioner>,
}

impl JobDeprovisionHook {
    /// Creates a hook removing jobs from `provisioner`.
    #[must_use]
    pub fn new(provisioner: Arc<dyn JobProvisioner>) -> Self {
        Self { provisioner }
    }
}

#[async_trait]
impl ScmHook for JobDeprovisionHook {
    async fn after(&self, client: &dyn ScmClient, target: &HookTarget) -> ScmHookResult<()> {
        let HookTarget::DeleteBranch(branch) = target else {
            return Ok(());
        };
        let repository = client.repository_name();
        let name = JobName::for_branch(repository, branch);
        let failed = |err: JobProvisionerError| ScmHookError::failed(branch, err);

        if !self.provisioner.exists(&name).await.map_err(failed)? {
            debug!(repository, job = %name, "job already removed");
            return Ok(());
        }
        self.provisioner.delete(&name).await.map_err(failed)?;
        info!(repository, job = %name, "job removed");
        Ok(())
    }
}
