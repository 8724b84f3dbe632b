//! Build job storage port.

use crate::dispatch::domain::{JobName, JobSpec};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for job provisioner operations.
pub type JobProvisionerResult<T> = Result<T, JobProvisionerError>;

/// Creates and removes build jobs.
#[async_trait]
pub trait JobProvisioner: Send + Sync {
    /// Returns `true` when a job with this name exists.
    async fn exists(&self, name: &JobName) -> JobProvisionerResult<bool>;

    /// Creates a job by copying the template named in `spec`.
    async fn create(&self, spec: &JobSpec) -> JobProvisionerResult<()>;

    /// Deletes the job.
    async fn delete(&self, name: &JobName) -> JobProvisionerResult<()>;
}

/// Errors returned by job provisioner adapters.
#[derive(Debug, Clone, Error)]
pub enum JobProvisionerError {
    /// The template job does not exist.
    #[error("template job {0} not found")]
    TemplateNotFound(String),

    /// The job does not exist.
    #[error("job {0} not found")]
    JobNotFound(JobName),

    /// The backing store failed.
    #[error("job store error: {0}")]
    Backend(Arc<dyn std::error::Error + Send + Sync>),
}

impl JobProvisionerError {
    /// Wraps a backend failure.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Arc::new(err))
    }
}
