//! Then steps for issue dispatch BDD scenarios.

use super::world::DispatchWorld;
use branchflow::{
    dispatch::domain::{ConfigurationRun, RunOutcome},
    scm::adapters::memory::RecordedMutation,
};
use rstest_bdd_macros::then;

fn last_run(world: &DispatchWorld) -> Result<&ConfigurationRun, eyre::Report> {
    world
        .last_report
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no event was dispatched"))?
        .runs
        .first()
        .ok_or_else(|| eyre::eyre!("no configuration ran"))
}

fn has_branch(world: &DispatchWorld, repository: &str, branch: &str) -> Result<bool, eyre::Report> {
    Ok(world
        .repository(repository)?
        .branch_names()
        .iter()
        .any(|name| name == branch))
}

#[then(r#"branch "{branch}" exists in "{child}" and "{parent}""#)]
fn branch_exists(
    world: &DispatchWorld,
    branch: String,
    child: String,
    parent: String,
) -> Result<(), eyre::Report> {
    for repository in [&child, &parent] {
        if !has_branch(world, repository, &branch)? {
            return Err(eyre::eyre!("expected {branch} in {repository}"));
        }
    }
    Ok(())
}

#[then(r#"branch "{branch}" is absent from "{child}" and "{parent}""#)]
fn branch_absent(
    world: &DispatchWorld,
    branch: String,
    child: String,
    parent: String,
) -> Result<(), eyre::Report> {
    for repository in [&child, &parent] {
        if has_branch(world, repository, &branch)? {
            return Err(eyre::eyre!("expected {branch} to be gone from {repository}"));
        }
    }
    Ok(())
}

#[then(r#"job "{job}" is provisioned"#)]
fn job_provisioned(world: &DispatchWorld, job: String) -> Result<(), eyre::Report> {
    let spec = world
        .jobs
        .job(&job)
        .ok_or_else(|| eyre::eyre!("job {job} was not provisioned"))?;
    if spec.template != super::world::TEMPLATE_JOB {
        return Err(eyre::eyre!("job {job} cloned from {}", spec.template));
    }
    Ok(())
}

#[then(r#"job "{job}" is deprovisioned"#)]
fn job_deprovisioned(world: &DispatchWorld, job: String) -> Result<(), eyre::Report> {
    if world.jobs.job(&job).is_some() {
        return Err(eyre::eyre!("job {job} still exists"));
    }
    if !world.jobs.deleted().contains(&job) {
        return Err(eyre::eyre!("job {job} was never deleted"));
    }
    Ok(())
}

#[then(r#"a progress comment is posted to "{key}""#)]
fn progress_comment_posted(world: &DispatchWorld, key: String) -> Result<(), eyre::Report> {
    let comment = world
        .tracker
        .comments()
        .into_iter()
        .find(|comment| comment.issue_key == key)
        .ok_or_else(|| eyre::eyre!("no comment posted to {key}"))?;
    if !comment.body.contains("/view/WEBAPP/view/Story-PROJ-1/") {
        return Err(eyre::eyre!("comment does not link the view: {}", comment.body));
    }
    Ok(())
}

#[then(r#"a pull request from "{head}" into "{base}" is opened in "{repository}""#)]
fn pull_request_opened(
    world: &DispatchWorld,
    head: String,
    base: String,
    repository: String,
) -> Result<(), eyre::Report> {
    let opened = world.repository(&repository)?.created_pull_requests();
    let request = opened
        .iter()
        .find(|request| request.head.as_str() == head)
        .ok_or_else(|| eyre::eyre!("no pull request from {head} in {repository}"))?;
    if request.base.as_str() != base {
        return Err(eyre::eyre!(
            "expected base {base}, found {}",
            request.base.as_str()
        ));
    }
    if request.description != "Login page" {
        return Err(eyre::eyre!(
            "expected the issue title as description, found {}",
            request.description
        ));
    }
    Ok(())
}

#[then("the last event created or deleted no branch")]
fn no_branch_mutation(world: &DispatchWorld) -> Result<(), eyre::Report> {
    let branch_mutations = world
        .journal
        .entries()
        .into_iter()
        .skip(world.journal_mark)
        .filter(|entry| !matches!(entry.mutation, RecordedMutation::PullRequestOpened { .. }))
        .count();
    if branch_mutations > 0 {
        return Err(eyre::eyre!("{branch_mutations} branch mutations recorded"));
    }
    Ok(())
}

#[then("the run fails because the event type is not supported")]
fn run_not_supported(world: &DispatchWorld) -> Result<(), eyre::Report> {
    match &last_run(world)?.outcome {
        RunOutcome::Failed { reason } if reason.contains("not supported") => Ok(()),
        other => Err(eyre::eyre!("expected an unsupported event failure, got {other:?}")),
    }
}

#[then("no repository was mutated")]
fn nothing_mutated(world: &DispatchWorld) -> Result<(), eyre::Report> {
    let entries = world.journal.entries();
    if !entries.is_empty() {
        return Err(eyre::eyre!("unexpected mutations: {entries:?}"));
    }
    Ok(())
}
