//! Total order over branch names used to pick the current release branch.
//!
//! Names matching `<prefix>-<digits>` are ordered by prefix first and then
//! by numeric suffix; any other pair of names falls back to plain
//! lexicographic order of the whole name.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::{BranchName, is_release_branch};

/// How numeric suffixes of `<prefix>-<number>` names are compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseOrdering {
    /// Suffixes compare as strings, so `"release-9"` sorts after
    /// `"release-10"`. Kept as the default for compatibility with existing
    /// release naming.
    #[default]
    Lexicographic,
    /// Suffixes compare as unbounded non-negative integers.
    Numeric,
}

impl ReleaseOrdering {
    /// Compares two branch names under this ordering.
    ///
    /// # Examples
    ///
    ///     use branchflow::scm::domain::ReleaseOrdering;
    ///     use std::cmp::Ordering;
    ///
    ///     let numeric = ReleaseOrdering::Numeric;
    ///     assert_eq!(numeric.compare("release-9", "release-10"), Ordering::Less);
    ///
    ///     let lexicographic = ReleaseOrdering::Lexicographic;
    ///     assert_eq!(lexicographic.compare("release-9", "release-10"), Ordering::Greater);
    #[must_use]
    pub fn compare(self, left: &str, right: &str) -> Ordering {
        match (split_numbered(left), split_numbered(right)) {
            (Some((left_prefix, left_number)), Some((right_prefix, right_number))) => left_prefix
                .cmp(right_prefix)
                .then_with(|| self.compare_suffixes(left_number, right_number)),
            _ => left.cmp(right),
        }
    }

    fn compare_suffixes(self, left: &str, right: &str) -> Ordering {
        match self {
            Self::Lexicographic => left.cmp(right),
            Self::Numeric => {
                let left_digits = left.trim_start_matches('0');
                let right_digits = right.trim_start_matches('0');
                left_digits
                    .len()
                    .cmp(&right_digits.len())
                    .then_with(|| left_digits.cmp(right_digits))
            }
        }
    }

    /// Selects the current release branch: the maximum, under this ordering,
    /// among names that denote a release branch.
    ///
    /// Returns `None` when no release branch is present.
    #[must_use]
    pub fn current_release<'a, I>(self, branches: I) -> Option<&'a BranchName>
    where
        I: IntoIterator<Item = &'a BranchName>,
    {
        branches
            .into_iter()
            .filter(|branch| is_release_branch(branch.as_str()))
            .max_by(|left, right| self.compare(left.as_str(), right.as_str()))
    }
}

/// Splits `<prefix>-<digits>` into its prefix and digit suffix.
///
/// The prefix is everything before the last `-`, matching a greedy
/// `^(.*)-(\d+)$` pattern.
fn split_numbered(name: &str) -> Option<(&str, &str)> {
    let (prefix, suffix) = name.rsplit_once('-')?;
    let is_number = !suffix.is_empty() && suffix.bytes().all(|byte| byte.is_ascii_digit());
    is_number.then_some((prefix, suffix))
}
