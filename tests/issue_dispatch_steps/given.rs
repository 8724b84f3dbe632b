//! Given steps for issue dispatch BDD scenarios.

use super::world::{DispatchWorld, TEMPLATE_JOB};
use branchflow::{
    dispatch::domain::{BuildConfiguration, PerformOutcome, RunOutcome},
    issue::domain::IssueEventType,
    scm::adapters::memory::InMemoryScmClient,
};
use rstest_bdd_macros::given;
use std::sync::Arc;

const BRANCHES: [&str; 4] = ["master", "release-1", "release-2", "hotfix-3"];

#[given(r#"a repository "{parent}" with submodule "{child}" and release branches"#)]
fn repository_with_submodule(world: &mut DispatchWorld, parent: String, child: String) {
    let submodule = InMemoryScmClient::new(child.as_str(), &world.journal).with_branches(BRANCHES);
    let repository = InMemoryScmClient::new(parent.as_str(), &world.journal)
        .with_branches(BRANCHES)
        .with_submodule(submodule.clone());
    world.factory.register(Arc::new(repository.clone()));
    world.repositories.insert(child, submodule);
    world.repositories.insert(parent, repository);
}

#[given(r#"a build configuration for "{repository}" listening to project "{project}""#)]
fn build_configuration(world: &mut DispatchWorld, repository: String, project: String) {
    let configuration =
        BuildConfiguration::new(format!("{repository}-ci"), repository, TEMPLATE_JOB)
            .with_project_key(project);
    world.registry.register(configuration);
}

#[given(r#"issue "{key}" of type "{issue_type}" already has a branch"#)]
fn issue_has_branch(
    world: &mut DispatchWorld,
    key: String,
    issue_type: String,
) -> Result<(), eyre::Report> {
    world.dispatch(IssueEventType::IssueCreated, &key, &issue_type, "To Do")?;
    let created = world
        .last_report
        .as_ref()
        .and_then(|report| report.runs.first())
        .is_some_and(|run| {
            matches!(
                run.outcome,
                RunOutcome::Completed {
                    outcome: PerformOutcome::BranchCreated { .. }
                }
            )
        });
    if !created {
        return Err(eyre::eyre!("expected the branch for {key} to be created"));
    }
    Ok(())
}
