//! Shared fixtures for dispatch tests.

use crate::dispatch::{
    adapters::memory::{InMemoryGroupingStore, InMemoryJobProvisioner},
    domain::BuildConfiguration,
    services::{EventPerformer, PerformerSettings},
};
use crate::issue::{
    adapters::memory::InMemoryIssueTracker,
    domain::{IssueEvent, IssueEventType, IssueSnapshot},
    ports::IssueTracker,
};
use crate::scm::adapters::memory::{InMemoryScmClient, ScmJournal};
use std::sync::Arc;

pub(super) const TEMPLATE_JOB: &str = "webapp-template";

/// Repository `webapp` with submodule `core`, plus dispatch collaborators.
pub(super) struct Workspace {
    pub journal: ScmJournal,
    pub webapp: InMemoryScmClient,
    pub core: InMemoryScmClient,
    pub grouping: InMemoryGroupingStore,
    pub jobs: InMemoryJobProvisioner,
    pub tracker: InMemoryIssueTracker,
    pub configuration: BuildConfiguration,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let journal = ScmJournal::new();
        let core =
            InMemoryScmClient::new("core", &journal).with_branches(["master", "release-1"]);
        let webapp = InMemoryScmClient::new("webapp", &journal)
            .with_branches(["master", "release-1"])
            .with_submodule(core.clone());
        Self {
            journal,
            webapp,
            core,
            grouping: InMemoryGroupingStore::new(),
            jobs: InMemoryJobProvisioner::new().with_template(TEMPLATE_JOB),
            tracker: InMemoryIssueTracker::new().with_issue("PROJ-1", "Login page"),
            configuration: BuildConfiguration::new("webapp-ci", "webapp", TEMPLATE_JOB)
                .with_project_key("PROJ"),
        }
    }

    pub(super) fn performer(&self) -> EventPerformer {
        self.performer_with(Arc::new(self.tracker.clone()))
    }

    pub(super) fn performer_with(&self, tracker: Arc<dyn IssueTracker>) -> EventPerformer {
        EventPerformer::new(
            tracker,
            Arc::new(self.grouping.clone()),
            Arc::new(self.jobs.clone()),
            PerformerSettings {
                ci_root_url: "https://ci.example.com/".to_owned(),
                ..PerformerSettings::default()
            },
        )
    }
}

pub(super) fn event(event_type: IssueEventType, status: &str) -> IssueEvent {
    event_for("PROJ-1", event_type, status)
}

pub(super) fn event_for(key: &str, event_type: IssueEventType, status: &str) -> IssueEvent {
    let issue = IssueSnapshot::new(key, "Story", status, "PROJ").expect("valid snapshot");
    IssueEvent::new(event_type, issue, true)
}
