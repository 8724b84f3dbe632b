//! Shared world state for issue dispatch BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use branchflow::{
    config::FlowConfig,
    dispatch::{
        adapters::memory::{
            InMemoryConfigurationRegistry, InMemoryGroupingStore, InMemoryJobProvisioner,
            InMemorySecurityContext, StaticScmClientFactory,
        },
        domain::{DispatchReport, Principal},
        services::{EventDispatcher, EventPerformer},
    },
    issue::{
        adapters::memory::InMemoryIssueTracker,
        domain::{IssueEvent, IssueEventType, IssueSnapshot},
    },
    scm::adapters::memory::{InMemoryScmClient, ScmJournal},
};
use eyre::WrapErr;
use mockable::DefaultClock;
use rstest::fixture;

/// Template job cloned for every provisioned job.
pub const TEMPLATE_JOB: &str = "branch-template";

/// Scenario world for issue dispatch behaviour tests.
pub struct DispatchWorld {
    pub journal: ScmJournal,
    pub repositories: HashMap<String, InMemoryScmClient>,
    pub factory: StaticScmClientFactory,
    pub registry: InMemoryConfigurationRegistry,
    pub grouping: InMemoryGroupingStore,
    pub jobs: InMemoryJobProvisioner,
    pub tracker: InMemoryIssueTracker,
    pub security: Arc<InMemorySecurityContext>,
    pub journal_mark: usize,
    pub last_report: Option<DispatchReport>,
}

impl DispatchWorld {
    /// Creates a world with no repositories or configurations.
    #[must_use]
    pub fn new() -> Self {
        Self {
            journal: ScmJournal::new(),
            repositories: HashMap::new(),
            factory: StaticScmClientFactory::new(),
            registry: InMemoryConfigurationRegistry::new(),
            grouping: InMemoryGroupingStore::new(),
            jobs: InMemoryJobProvisioner::new().with_template(TEMPLATE_JOB),
            tracker: InMemoryIssueTracker::new().with_issue("PROJ-1", "Login page"),
            security: Arc::new(InMemorySecurityContext::new(Principal::Anonymous)),
            journal_mark: 0,
            last_report: None,
        }
    }

    /// Looks up a repository created by a given step.
    ///
    /// # Errors
    ///
    /// Returns an error if no repository named `name` exists.
    pub fn repository(&self, name: &str) -> Result<&InMemoryScmClient, eyre::Report> {
        self.repositories
            .get(name)
            .ok_or_else(|| eyre::eyre!("repository {name} was not set up"))
    }

    /// Dispatches a status-changing event and stores its report.
    ///
    /// # Errors
    ///
    /// Returns an error if the event is invalid or dispatch fails.
    pub fn dispatch(
        &mut self,
        event_type: IssueEventType,
        key: &str,
        issue_type: &str,
        status: &str,
    ) -> Result<(), eyre::Report> {
        let issue =
            IssueSnapshot::new(key, issue_type, status, "PROJ").wrap_err("build issue snapshot")?;
        let event = IssueEvent::new(event_type, issue, true);
        self.journal_mark = self.journal.entries().len();
        let report = run_async(self.dispatcher().dispatch(&event)).wrap_err("dispatch event")?;
        self.last_report = Some(report);
        Ok(())
    }

    fn dispatcher(&self) -> EventDispatcher<DefaultClock> {
        let config = FlowConfig {
            ci_root_url: "https://ci.example.com".to_owned(),
            ..FlowConfig::default()
        };
        let performer = EventPerformer::new(
            Arc::new(self.tracker.clone()),
            Arc::new(self.grouping.clone()),
            Arc::new(self.jobs.clone()),
            config.performer_settings(),
        );
        EventDispatcher::new(
            Arc::new(self.registry.clone()),
            self.security.clone(),
            Arc::new(self.factory.clone()),
            performer,
            Arc::new(DefaultClock),
        )
    }
}

impl Default for DispatchWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> DispatchWorld {
    DispatchWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
