//! In-memory integration tests for cascading branch operations.

use super::helpers::{RepositoryTree, tree};
use branchflow::scm::{
    adapters::memory::{RecordedMutation, ScmOperationKind},
    domain::{BranchComparison, BranchName, ReleaseOrdering},
    ports::NoopHook,
    services::{
        BranchLifecycleOrchestrator, CascadePolicy, OrchestratorError, OrchestratorSettings,
        StepAction,
    },
};
use rstest::rstest;
use std::sync::Arc;

fn orchestrator(
    tree: &RepositoryTree,
    settings: OrchestratorSettings,
) -> BranchLifecycleOrchestrator {
    BranchLifecycleOrchestrator::new(Arc::new(tree.storefront.clone()), settings)
}

fn feature() -> BranchName {
    BranchName::new("Story/SHOP-12").expect("valid branch name")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_then_delete_visits_nested_submodules_depth_first(tree: RepositoryTree) {
    let orchestrator = orchestrator(&tree, OrchestratorSettings::default());

    let created = orchestrator
        .create_branch(&feature(), &NoopHook)
        .await
        .expect("create succeeds");
    let deleted = orchestrator
        .delete_branch(&feature(), &NoopHook)
        .await
        .expect("delete succeeds");

    let order = ["ledger", "payments", "catalog", "storefront"];
    let repositories: Vec<&str> = created
        .steps()
        .iter()
        .map(|step| step.repository.as_str())
        .collect();
    assert_eq!(repositories, order);
    assert!(deleted.steps().iter().all(|step| step.action == StepAction::Deleted));

    let mut expected: Vec<String> = order.iter().map(|name| (*name).to_owned()).collect();
    expected.extend(order.iter().map(|name| (*name).to_owned()));
    assert_eq!(tree.journal.mutated_repositories(), expected);
    assert!(!tree.ledger.branch_names().contains(&"Story/SHOP-12".to_owned()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn partially_created_tree_only_fills_the_gaps(tree: RepositoryTree) {
    tree.payments.add_branch("Story/SHOP-12");
    let orchestrator = orchestrator(&tree, OrchestratorSettings::default());

    let report = orchestrator
        .create_branch(&feature(), &NoopHook)
        .await
        .expect("create succeeds");

    assert_eq!(
        report.step_for("payments").map(|step| &step.action),
        Some(&StepAction::AlreadyExists)
    );
    assert_eq!(report.mutation_count(), 3);
    assert_eq!(
        tree.journal.mutated_repositories(),
        vec!["ledger", "catalog", "storefront"]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn release_targets_latest_release_branch_in_every_repository(tree: RepositoryTree) {
    let orchestrator = orchestrator(&tree, OrchestratorSettings::default());
    orchestrator
        .create_branch(&feature(), &NoopHook)
        .await
        .expect("create succeeds");
    tree.catalog
        .set_comparison("Story/SHOP-12", "release-9", BranchComparison::Identical);

    let report = orchestrator
        .release_branch(&feature(), "Checkout redesign", &NoopHook)
        .await
        .expect("release succeeds");

    assert!(matches!(
        report.step_for("catalog").map(|step| &step.action),
        Some(StepAction::Identical { .. })
    ));
    let opened = tree.storefront.created_pull_requests();
    assert_eq!(opened.len(), 1);
    let request = opened.first().expect("pull request opened");
    assert_eq!(request.base.as_str(), "release-9");
    assert_eq!(request.description, "Checkout redesign");
    assert_eq!(request.title, "Please merge Story/SHOP-12 into 'release-9'");
    assert_eq!(tree.ledger.created_pull_requests().len(), 1);
    assert!(tree.catalog.created_pull_requests().is_empty());
}

#[rstest]
#[case::lexicographic(ReleaseOrdering::Lexicographic, "release-9")]
#[case::numeric(ReleaseOrdering::Numeric, "release-10")]
#[tokio::test(flavor = "multi_thread")]
async fn release_ordering_selects_the_base(
    tree: RepositoryTree,
    #[case] release_ordering: ReleaseOrdering,
    #[case] expected_base: &str,
) {
    for repository in [&tree.storefront, &tree.payments, &tree.ledger, &tree.catalog] {
        repository.add_branch("release-10");
    }
    let settings = OrchestratorSettings {
        release_ordering,
        ..OrchestratorSettings::default()
    };
    let orchestrator = orchestrator(&tree, settings);
    orchestrator
        .create_branch(&feature(), &NoopHook)
        .await
        .expect("create succeeds");

    orchestrator
        .release_branch(&feature(), "Checkout redesign", &NoopHook)
        .await
        .expect("release succeeds");

    let bases: Vec<String> = tree
        .storefront
        .created_pull_requests()
        .into_iter()
        .map(|request| request.base.as_str().to_owned())
        .collect();
    assert_eq!(bases, vec![expected_base.to_owned()]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn continue_policy_finishes_the_tree_around_a_broken_submodule(tree: RepositoryTree) {
    tree.payments.fail_on(ScmOperationKind::CreateBranch);
    let settings = OrchestratorSettings {
        cascade_policy: CascadePolicy::Continue,
        ..OrchestratorSettings::default()
    };

    let result = orchestrator(&tree, settings)
        .create_branch(&feature(), &NoopHook)
        .await;

    let Err(OrchestratorError::CascadeFailed { completed, failures }) = result else {
        panic!("expected a cascade failure");
    };
    assert_eq!(failures.len(), 1);
    assert_eq!(
        failures.first().map(|failure| failure.repository.as_str()),
        Some("payments")
    );
    assert_eq!(completed.mutation_count(), 3);
    assert!(
        tree.journal
            .entries()
            .iter()
            .all(|entry| entry.repository != "payments")
    );
    assert!(tree.journal.entries().iter().any(|entry| {
        entry.repository == "storefront"
            && entry.mutation == RecordedMutation::BranchCreated("Story/SHOP-12".to_owned())
    }));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn abort_policy_stops_before_the_parent(tree: RepositoryTree) {
    tree.catalog.fail_on(ScmOperationKind::CreateBranch);

    let result = orchestrator(&tree, OrchestratorSettings::default())
        .create_branch(&feature(), &NoopHook)
        .await;

    assert!(matches!(result, Err(OrchestratorError::Scm(_))));
    assert_eq!(
        tree.journal.mutated_repositories(),
        vec!["ledger", "payments"]
    );
}
