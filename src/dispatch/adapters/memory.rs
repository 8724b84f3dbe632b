//! In-memory adapters for dispatch ports.

use crate::dispatch::{
    domain::{BuildConfiguration, GroupingKey, JobName, JobSpec, Principal},
    ports::{
        ConfigurationRegistry, GroupingStore, GroupingStoreResult, JobProvisioner,
        JobProvisionerError, JobProvisionerResult, RegistryResult, ScmClientFactory,
        SecurityContext,
    },
};
use crate::scm::ports::{ScmClient, ScmClientError, ScmClientResult};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, PoisonError, RwLock};

/// Registry holding configurations in registration order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryConfigurationRegistry {
    configurations: Arc<RwLock<Vec<BuildConfiguration>>>,
}

impl InMemoryConfigurationRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a configuration.
    pub fn register(&self, configuration: BuildConfiguration) {
        self.configurations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(configuration);
    }
}

#[async_trait]
impl ConfigurationRegistry for InMemoryConfigurationRegistry {
    async fn visible_to(&self, principal: &Principal) -> RegistryResult<Vec<BuildConfiguration>> {
        Ok(self
            .configurations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|configuration| configuration.is_visible_to(principal))
            .cloned()
            .collect())
    }
}

/// Grouping store keeping project groups and their branch views.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGroupingStore {
    projects: Arc<RwLock<BTreeMap<String, BTreeSet<String>>>>,
}

impl InMemoryGroupingStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the project groups.
    #[must_use]
    pub fn projects(&self) -> Vec<String> {
        self.projects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// Returns the branch views of `project`.
    #[must_use]
    pub fn views(&self, project: &str) -> Vec<String> {
        self.projects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(project)
            .map(|views| views.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl GroupingStore for InMemoryGroupingStore {
    async fn exists(&self, key: &GroupingKey) -> GroupingStoreResult<bool> {
        Ok(self
            .projects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key.project())
            .is_some_and(|views| views.contains(key.view())))
    }

    async fn create(&self, key: &GroupingKey) -> GroupingStoreResult<()> {
        self.projects
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key.project().to_owned())
            .or_default()
            .insert(key.view().to_owned());
        Ok(())
    }

    async fn delete(&self, key: &GroupingKey) -> GroupingStoreResult<()> {
        if let Some(views) = self
            .projects
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(key.project())
        {
            views.remove(key.view());
        }
        Ok(())
    }
}

/// Job store holding template and provisioned jobs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryJobProvisioner {
    state: Arc<RwLock<JobState>>,
}

#[derive(Debug, Default)]
struct JobState {
    templates: BTreeSet<String>,
    jobs: BTreeMap<JobName, JobSpec>,
    deleted: Vec<JobName>,
}

impl InMemoryJobProvisioner {
    /// Creates a store with no jobs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a template job.
    #[must_use]
    pub fn with_template(self, template: &str) -> Self {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .templates
            .insert(template.to_owned());
        self
    }

    /// Returns the provisioned job called `name`.
    #[must_use]
    pub fn job(&self, name: &str) -> Option<JobSpec> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .jobs
            .iter()
            .find(|(job, _)| job.as_str() == name)
            .map(|(_, spec)| spec.clone())
    }

    /// Returns the names of every provisioned job.
    #[must_use]
    pub fn job_names(&self) -> Vec<String> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .jobs
            .keys()
            .map(|name| name.as_str().to_owned())
            .collect()
    }

    /// Returns every deletion in order, including replacements.
    #[must_use]
    pub fn deleted(&self) -> Vec<String> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .deleted
            .iter()
            .map(|name| name.as_str().to_owned())
            .collect()
    }
}

#[async_trait]
impl JobProvisioner for InMemoryJobProvisioner {
    async fn exists(&self, name: &JobName) -> JobProvisionerResult<bool> {
        Ok(self
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .jobs
            .contains_key(name))
    }

    async fn create(&self, spec: &JobSpec) -> JobProvisionerResult<()> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if !state.templates.contains(&spec.template) {
            return Err(JobProvisionerError::TemplateNotFound(spec.template.clone()));
        }
        state.jobs.insert(spec.name.clone(), spec.clone());
        Ok(())
    }

    async fn delete(&self, name: &JobName) -> JobProvisionerResult<()> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.jobs.remove(name).is_none() {
            return Err(JobProvisionerError::JobNotFound(name.clone()));
        }
        state.deleted.push(name.clone());
        Ok(())
    }
}

/// Security context reporting a fixed principal.
#[derive(Debug, Default)]
pub struct InMemorySecurityContext {
    principal: Principal,
}

impl InMemorySecurityContext {
    /// Creates a context running as `principal`.
    #[must_use]
    pub const fn new(principal: Principal) -> Self {
        Self { principal }
    }
}

impl SecurityContext for InMemorySecurityContext {
    fn current(&self) -> Principal {
        self.principal.clone()
    }
}

/// Factory returning pre-registered clients by repository name.
#[derive(Clone, Default)]
pub struct StaticScmClientFactory {
    clients: Arc<RwLock<HashMap<String, Arc<dyn ScmClient>>>>,
}

impl StaticScmClientFactory {
    /// Creates an empty factory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the client for its repository name.
    pub fn register(&self, client: Arc<dyn ScmClient>) {
        self.clients
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(client.repository_name().to_owned(), client);
    }
}

#[async_trait]
impl ScmClientFactory for StaticScmClientFactory {
    async fn client_for(
        &self,
        configuration: &BuildConfiguration,
    ) -> ScmClientResult<Arc<dyn ScmClient>> {
        self.clients
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(configuration.repository())
            .cloned()
            .ok_or_else(|| ScmClientError::Api {
                repository: configuration.repository().to_owned(),
                status: 404,
                message: "repository not registered".to_owned(),
            })
    }
}
