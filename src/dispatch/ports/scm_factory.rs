//! Resolution of repository clients for build configurations.

use crate::dispatch::domain::BuildConfiguration;
use crate::scm::ports::{ScmClient, ScmClientResult};
use async_trait::async_trait;
use std::sync::Arc;

/// Opens the repository a configuration builds.
#[async_trait]
pub trait ScmClientFactory: Send + Sync {
    /// Returns a client bound to the configuration's repository.
    async fn client_for(
        &self,
        configuration: &BuildConfiguration,
    ) -> ScmClientResult<Arc<dyn ScmClient>>;
}
