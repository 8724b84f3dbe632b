//! Wire payloads exchanged with the GitHub REST API.

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub(super) struct RepositoryPayload {
    pub default_branch: String,
    pub clone_url: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct RefPayload {
    pub object: RefObject,
}

#[derive(Debug, Deserialize)]
pub(super) struct RefObject {
    pub sha: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct BranchPayload {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct ComparePayload {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct PullRequestPayload {
    pub number: u64,
    pub html_url: Option<String>,
    pub head: PullRequestBranch,
    pub base: PullRequestBranch,
}

#[derive(Debug, Deserialize)]
pub(super) struct PullRequestBranch {
    /// `<owner>:<ref>`, naming the repository the branch lives in.
    pub label: String,
    #[serde(rename = "ref")]
    pub ref_name: String,
}

impl PullRequestBranch {
    /// Returns `true` when the branch lives in a repository owned by
    /// `organization` rather than in a fork.
    pub fn is_owned_by(&self, organization: &str) -> bool {
        self.label
            .split_once(':')
            .is_some_and(|(owner, name)| {
                owner.eq_ignore_ascii_case(organization) && name == self.ref_name
            })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct CreatedPullRequestPayload {
    pub number: u64,
    pub html_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TreePayload {
    pub tree: Vec<TreeEntry>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TreeEntry {
    pub path: String,
    pub mode: String,
    pub sha: String,
}

/// Git file mode of a submodule pointer (gitlink).
pub(super) const GITLINK_MODE: &str = "160000";

#[derive(Debug, Serialize)]
pub(super) struct CreateRefBody<'a> {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub sha: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct CreatePullRequestBody<'a> {
    pub title: &'a str,
    pub head: &'a str,
    pub base: &'a str,
    pub body: &'a str,
}
