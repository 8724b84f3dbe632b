//! Build configuration listing port.

use crate::dispatch::domain::{BuildConfiguration, Principal};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for configuration registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Source of the build configurations that react to issue events.
#[async_trait]
pub trait ConfigurationRegistry: Send + Sync {
    /// Lists the configurations `principal` may see, in a stable order.
    async fn visible_to(&self, principal: &Principal) -> RegistryResult<Vec<BuildConfiguration>>;
}

/// Errors returned by configuration registry adapters.
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    /// The backing store failed.
    #[error("configuration registry error: {0}")]
    Backend(Arc<dyn std::error::Error + Send + Sync>),
}

impl RegistryError {
    /// Wraps a backend failure.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Arc::new(err))
    }
}
