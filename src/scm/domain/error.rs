//! Error types for source-control domain validation.

use thiserror::Error;

/// Errors returned while constructing source-control domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScmDomainError {
    /// The branch name is empty, contains whitespace, or is too long.
    #[error("invalid branch name: '{0}'")]
    InvalidBranchName(String),

    /// The compare status reported by the forge is not recognised.
    #[error("unknown branch comparison status: {0}")]
    UnknownComparison(String),
}
