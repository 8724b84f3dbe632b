//! When steps for issue dispatch BDD scenarios.

use super::world::DispatchWorld;
use branchflow::issue::domain::IssueEventType;
use rstest_bdd_macros::when;

#[when(r#"issue "{key}" of type "{issue_type}" is created with status "{status}""#)]
fn issue_created(
    world: &mut DispatchWorld,
    key: String,
    issue_type: String,
    status: String,
) -> Result<(), eyre::Report> {
    world.dispatch(IssueEventType::IssueCreated, &key, &issue_type, &status)
}

#[when(r#"issue "{key}" of type "{issue_type}" is updated with status "{status}""#)]
fn issue_updated(
    world: &mut DispatchWorld,
    key: String,
    issue_type: String,
    status: String,
) -> Result<(), eyre::Report> {
    world.dispatch(IssueEventType::IssueUpdated, &key, &issue_type, &status)
}

#[when(r#"a worklog is updated on issue "{key}" of type "{issue_type}" with status "{status}""#)]
fn worklog_updated(
    world: &mut DispatchWorld,
    key: String,
    issue_type: String,
    status: String,
) -> Result<(), eyre::Report> {
    world.dispatch(IssueEventType::WorklogUpdated, &key, &issue_type, &status)
}
