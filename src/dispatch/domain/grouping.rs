//! Keys of the grouping records that organise build jobs per branch.

use crate::scm::domain::BranchName;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Location of a branch view inside its project group.
///
/// The project group is the repository name uppercased; the view is the
/// branch name with `/` replaced by `-`.
///
/// # Examples
///
///     use branchflow::dispatch::domain::GroupingKey;
///     use branchflow::scm::domain::BranchName;
///
///     let branch = BranchName::new("Story/PROJ-1").expect("valid");
///     let key = GroupingKey::for_branch("webapp", &branch);
///     assert_eq!(key.project(), "WEBAPP");
///     assert_eq!(key.view(), "Story-PROJ-1");
///     assert_eq!(
///         key.view_url("https://ci.example.com/"),
///         "https://ci.example.com/view/WEBAPP/view/Story-PROJ-1/"
///     );
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupingKey {
    project: String,
    view: String,
}

impl GroupingKey {
    /// Derives the key for `branch` of `repository`.
    #[must_use]
    pub fn for_branch(repository: &str, branch: &BranchName) -> Self {
        Self {
            project: repository.to_uppercase(),
            view: branch.view_name(),
        }
    }

    /// Returns the project group name.
    #[must_use]
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Returns the branch view name.
    #[must_use]
    pub fn view(&self) -> &str {
        &self.view
    }

    /// Returns the browser URL of the view under `root_url`.
    #[must_use]
    pub fn view_url(&self, root_url: &str) -> String {
        format!(
            "{}/view/{}/view/{}/",
            root_url.trim_end_matches('/'),
            self.project,
            self.view
        )
    }
}

impl fmt::Display for GroupingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.project, self.view)
    }
}
