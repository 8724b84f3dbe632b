//! Grouping record port.

use crate::dispatch::domain::GroupingKey;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for grouping store operations.
pub type GroupingStoreResult<T> = Result<T, GroupingStoreError>;

/// Storage of the views grouping build jobs per project and branch.
#[async_trait]
pub trait GroupingStore: Send + Sync {
    /// Returns `true` when the branch view exists.
    async fn exists(&self, key: &GroupingKey) -> GroupingStoreResult<bool>;

    /// Creates the branch view, creating its project group when missing.
    /// Creating an existing view is not an error.
    async fn create(&self, key: &GroupingKey) -> GroupingStoreResult<()>;

    /// Deletes the branch view. Deleting a missing view is not an error.
    async fn delete(&self, key: &GroupingKey) -> GroupingStoreResult<()>;
}

/// Errors returned by grouping store adapters.
#[derive(Debug, Clone, Error)]
pub enum GroupingStoreError {
    /// The backing store failed.
    #[error("grouping store error: {0}")]
    Backend(Arc<dyn std::error::Error + Send + Sync>),
}

impl GroupingStoreError {
    /// Wraps a backend failure.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Arc::new(err))
    }
}
