//! Branch-name value objects and the branch naming convention.

use super::ScmDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for a validated branch name.
const MAX_BRANCH_NAME_LENGTH: usize = 200;

/// Case-insensitive prefix marking a release branch.
const RELEASE_PREFIX: &str = "release";

/// Validated Git branch name.
///
/// Branch names must be non-empty after trimming, must not contain
/// whitespace, and must not exceed `MAX_BRANCH_NAME_LENGTH` characters.
///
/// # Examples
///
///     use branchflow::scm::domain::BranchName;
///
///     let name = BranchName::for_issue("Story", "PROJ-1").expect("valid");
///     assert_eq!(name.as_str(), "Story/PROJ-1");
///     assert_eq!(name.view_name(), "Story-PROJ-1");
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BranchName(String);

impl BranchName {
    /// Creates a validated branch name.
    ///
    /// # Errors
    ///
    /// Returns [`ScmDomainError::InvalidBranchName`] when the value is empty,
    /// contains whitespace, or exceeds the length limit.
    pub fn new(value: impl Into<String>) -> Result<Self, ScmDomainError> {
        let raw = value.into();
        let normalized = raw.trim();

        let is_invalid = normalized.is_empty()
            || normalized.chars().any(char::is_whitespace)
            || normalized.len() > MAX_BRANCH_NAME_LENGTH;
        if is_invalid {
            return Err(ScmDomainError::InvalidBranchName(raw));
        }

        Ok(Self(normalized.to_owned()))
    }

    /// Builds the branch name tracking an issue: `"<issueType>/<issueKey>"`.
    ///
    /// # Errors
    ///
    /// Returns [`ScmDomainError::InvalidBranchName`] when the combined name
    /// is not a valid branch name.
    pub fn for_issue(issue_type: &str, issue_key: &str) -> Result<Self, ScmDomainError> {
        Self::new(format!("{}/{}", issue_type.trim(), issue_key.trim()))
    }

    /// Returns the branch name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the branch name with every `/` replaced by `-`.
    ///
    /// Used for grouping views and provisioned job names.
    #[must_use]
    pub fn view_name(&self) -> String {
        self.0.replace('/', "-")
    }

    /// Returns `true` when the name denotes a release branch.
    #[must_use]
    pub fn is_release(&self) -> bool {
        is_release_branch(&self.0)
    }
}

/// Returns `true` when `name` case-insensitively starts with `"release"`.
#[must_use]
pub fn is_release_branch(name: &str) -> bool {
    name.get(..RELEASE_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(RELEASE_PREFIX))
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for BranchName {
    type Error = ScmDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
