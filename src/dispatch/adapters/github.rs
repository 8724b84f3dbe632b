//! Repository client factory backed by GitHub.

use crate::config::ScmCredentials;
use crate::dispatch::{domain::BuildConfiguration, ports::ScmClientFactory};
use crate::scm::{
    adapters::github::GitHubScmClient,
    ports::{ScmClient, ScmClientResult},
};
use async_trait::async_trait;
use std::sync::Arc;

/// Connects a [`GitHubScmClient`] for each configuration's repository.
#[derive(Debug, Clone)]
pub struct GitHubClientFactory {
    credentials: ScmCredentials,
}

impl GitHubClientFactory {
    /// Creates a factory using `credentials` for every repository.
    #[must_use]
    pub const fn new(credentials: ScmCredentials) -> Self {
        Self { credentials }
    }
}

#[async_trait]
impl ScmClientFactory for GitHubClientFactory {
    async fn client_for(
        &self,
        configuration: &BuildConfiguration,
    ) -> ScmClientResult<Arc<dyn ScmClient>> {
        let client =
            GitHubScmClient::connect(self.credentials.clone(), configuration.repository()).await?;
        Ok(Arc::new(client))
    }
}
