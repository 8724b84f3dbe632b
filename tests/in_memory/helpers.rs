//! Shared fixtures for in-memory integration tests.

use branchflow::{
    config::FlowConfig,
    dispatch::{
        adapters::memory::{
            InMemoryConfigurationRegistry, InMemoryGroupingStore, InMemoryJobProvisioner,
            InMemorySecurityContext, StaticScmClientFactory,
        },
        domain::{BuildConfiguration, Principal},
        services::{EventDispatcher, EventPerformer},
    },
    issue::{
        adapters::memory::InMemoryIssueTracker,
        domain::{IssueEvent, IssueEventType, IssueSnapshot},
    },
    scm::adapters::memory::{InMemoryScmClient, ScmJournal},
};
use mockable::DefaultClock;
use rstest::fixture;
use std::sync::Arc;

/// Template job every provisioned job is cloned from.
pub const TEMPLATE_JOB: &str = "storefront-template";

/// Three-level repository tree: `storefront` contains `payments`, which
/// contains `ledger`, plus a sibling `catalog`.
pub struct RepositoryTree {
    pub journal: ScmJournal,
    pub storefront: InMemoryScmClient,
    pub payments: InMemoryScmClient,
    pub ledger: InMemoryScmClient,
    pub catalog: InMemoryScmClient,
}

impl RepositoryTree {
    /// Builds the tree with `master` and two release branches everywhere.
    pub fn new() -> Self {
        let journal = ScmJournal::new();
        let branches = ["master", "release-8", "release-9"];
        let ledger = InMemoryScmClient::new("ledger", &journal).with_branches(branches);
        let catalog = InMemoryScmClient::new("catalog", &journal).with_branches(branches);
        let payments = InMemoryScmClient::new("payments", &journal)
            .with_branches(branches)
            .with_submodule(ledger.clone());
        let storefront = InMemoryScmClient::new("storefront", &journal)
            .with_branches(branches)
            .with_submodule(payments.clone())
            .with_submodule(catalog.clone());
        Self {
            journal,
            storefront,
            payments,
            ledger,
            catalog,
        }
    }
}

/// Every collaborator of an [`EventDispatcher`] wired to in-memory adapters.
pub struct DispatchStack {
    pub tree: RepositoryTree,
    pub grouping: InMemoryGroupingStore,
    pub jobs: InMemoryJobProvisioner,
    pub tracker: InMemoryIssueTracker,
    pub security: Arc<InMemorySecurityContext>,
    pub configuration: BuildConfiguration,
    pub dispatcher: EventDispatcher<DefaultClock>,
}

impl DispatchStack {
    /// Builds the stack from `config` with one configuration for the
    /// `storefront` repository, restricted to project `SHOP` and hidden from
    /// anonymous callers.
    pub fn with_config(config: &FlowConfig) -> Self {
        let tree = RepositoryTree::new();
        let registry = InMemoryConfigurationRegistry::new();
        let grouping = InMemoryGroupingStore::new();
        let jobs = InMemoryJobProvisioner::new().with_template(TEMPLATE_JOB);
        let tracker = InMemoryIssueTracker::new()
            .with_issue("SHOP-12", "Checkout redesign")
            .with_issue("SHOP-13", "Faster search");
        let security = Arc::new(InMemorySecurityContext::new(Principal::Anonymous));
        let configuration = BuildConfiguration::new("storefront-ci", "storefront", TEMPLATE_JOB)
            .with_project_key("SHOP")
            .with_readers(["release-managers".to_owned()]);
        registry.register(configuration.clone());

        let factory = StaticScmClientFactory::new();
        factory.register(Arc::new(tree.storefront.clone()));

        let performer = EventPerformer::new(
            Arc::new(tracker.clone()),
            Arc::new(grouping.clone()),
            Arc::new(jobs.clone()),
            config.performer_settings(),
        );
        let dispatcher = EventDispatcher::new(
            Arc::new(registry),
            security.clone(),
            Arc::new(factory),
            performer,
            Arc::new(DefaultClock),
        );

        Self {
            tree,
            grouping,
            jobs,
            tracker,
            security,
            configuration,
            dispatcher,
        }
    }
}

/// Settings shared by the dispatch fixtures.
pub fn flow_config() -> FlowConfig {
    FlowConfig {
        ci_root_url: "https://ci.example.com".to_owned(),
        ..FlowConfig::default()
    }
}

/// Provides a dispatch stack built from [`flow_config`].
#[fixture]
pub fn stack() -> DispatchStack {
    DispatchStack::with_config(&flow_config())
}

/// Provides a repository tree.
#[fixture]
pub fn tree() -> RepositoryTree {
    RepositoryTree::new()
}

/// Builds a status-changing event for a story in project `SHOP`.
pub fn story_event(key: &str, event_type: IssueEventType, status: &str) -> IssueEvent {
    let issue = IssueSnapshot::new(key, "Story", status, "SHOP").expect("valid issue snapshot");
    IssueEvent::new(event_type, issue, true)
}
