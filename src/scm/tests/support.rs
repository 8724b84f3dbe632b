//! Shared fixtures for orchestration tests.

use crate::scm::{
    adapters::memory::{InMemoryScmClient, ScmJournal},
    domain::BranchName,
    ports::{HookTarget, ScmClient, ScmHook, ScmHookError, ScmHookResult},
    services::{BranchLifecycleOrchestrator, OrchestratorSettings},
};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Hook phase observed by [`RecordingHook`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Phase {
    Before,
    After,
}

/// One hook invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct HookCall {
    pub phase: Phase,
    pub repository: String,
    pub target: HookTarget,
}

/// Hook recording every invocation, optionally failing in one phase.
#[derive(Debug, Default)]
pub(super) struct RecordingHook {
    calls: Mutex<Vec<HookCall>>,
    fail_in: Option<Phase>,
}

impl RecordingHook {
    pub(super) fn failing_in(phase: Phase) -> Self {
        Self {
            calls: Mutex::default(),
            fail_in: Some(phase),
        }
    }

    pub(super) fn calls(&self) -> Vec<HookCall> {
        self.calls.lock().expect("hook lock").clone()
    }

    pub(super) fn count(&self, phase: Phase) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.phase == phase)
            .count()
    }

    fn record(
        &self,
        phase: Phase,
        client: &dyn ScmClient,
        target: &HookTarget,
    ) -> ScmHookResult<()> {
        self.calls.lock().expect("hook lock").push(HookCall {
            phase,
            repository: client.repository_name().to_owned(),
            target: target.clone(),
        });
        if self.fail_in == Some(phase) {
            return Err(ScmHookError::failed(
                target.branch(),
                std::io::Error::other("hook refused"),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ScmHook for RecordingHook {
    async fn before(&self, client: &dyn ScmClient, target: &HookTarget) -> ScmHookResult<()> {
        self.record(Phase::Before, client, target)
    }

    async fn after(&self, client: &dyn ScmClient, target: &HookTarget) -> ScmHookResult<()> {
        self.record(Phase::After, client, target)
    }
}

/// Repository tree `app` -> [`lib-a` -> [`lib-c`], `lib-b`].
pub(super) struct RepositoryTree {
    pub journal: ScmJournal,
    pub app: InMemoryScmClient,
    pub lib_a: InMemoryScmClient,
    pub lib_b: InMemoryScmClient,
    pub lib_c: InMemoryScmClient,
}

impl RepositoryTree {
    pub(super) fn new(branches: &[&str]) -> Self {
        let journal = ScmJournal::new();
        let lib_c = InMemoryScmClient::new("lib-c", &journal).with_branches(branches.to_vec());
        let lib_a = InMemoryScmClient::new("lib-a", &journal)
            .with_branches(branches.to_vec())
            .with_submodule(lib_c.clone());
        let lib_b = InMemoryScmClient::new("lib-b", &journal).with_branches(branches.to_vec());
        let app = InMemoryScmClient::new("app", &journal)
            .with_branches(branches.to_vec())
            .with_submodule(lib_a.clone())
            .with_submodule(lib_b.clone());
        Self {
            journal,
            app,
            lib_a,
            lib_b,
            lib_c,
        }
    }

    pub(super) fn orchestrator(&self, settings: OrchestratorSettings) -> BranchLifecycleOrchestrator {
        BranchLifecycleOrchestrator::new(Arc::new(self.app.clone()), settings)
    }

    pub(super) fn all(&self) -> [&InMemoryScmClient; 4] {
        [&self.app, &self.lib_a, &self.lib_b, &self.lib_c]
    }
}

pub(super) fn branch(name: &str) -> BranchName {
    BranchName::new(name).expect("valid branch name")
}
