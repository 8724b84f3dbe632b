//! Build configurations that react to issue events.

use super::Principal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

/// Identifier of a build configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigurationId(Uuid);

impl ConfigurationId {
    /// Generates a random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConfigurationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConfigurationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A build configuration wired to receive issue events.
///
/// Each configuration builds one repository. Events are accepted when the
/// configuration has no project key or its key matches the event's project
/// (case-insensitively).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfiguration {
    id: ConfigurationId,
    name: String,
    repository: String,
    template_job: String,
    project_key: Option<String>,
    readers: Option<BTreeSet<String>>,
}

impl BuildConfiguration {
    /// Creates a configuration readable by everyone that accepts events from
    /// every project.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        repository: impl Into<String>,
        template_job: impl Into<String>,
    ) -> Self {
        Self {
            id: ConfigurationId::new(),
            name: name.into(),
            repository: repository.into(),
            template_job: template_job.into(),
            project_key: None,
            readers: None,
        }
    }

    /// Sets the identifier.
    #[must_use]
    pub const fn with_id(mut self, id: ConfigurationId) -> Self {
        self.id = id;
        self
    }

    /// Restricts the configuration to events of one project.
    #[must_use]
    pub fn with_project_key(mut self, project_key: impl Into<String>) -> Self {
        self.project_key = Some(project_key.into());
        self
    }

    /// Restricts visibility to the named users (and the system identity).
    #[must_use]
    pub fn with_readers(mut self, readers: impl IntoIterator<Item = String>) -> Self {
        self.readers = Some(readers.into_iter().collect());
        self
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> ConfigurationId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the repository the configuration builds.
    #[must_use]
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Returns the job cloned for every new branch.
    #[must_use]
    pub fn template_job(&self) -> &str {
        &self.template_job
    }

    /// Returns the project filter, if any.
    #[must_use]
    pub fn project_key(&self) -> Option<&str> {
        self.project_key.as_deref()
    }

    /// Returns `true` when `principal` may see this configuration.
    #[must_use]
    pub fn is_visible_to(&self, principal: &Principal) -> bool {
        match (&self.readers, principal) {
            (None, _) | (Some(_), Principal::System) => true,
            (Some(readers), Principal::User(name)) => readers.contains(name),
            (Some(_), Principal::Anonymous) => false,
        }
    }

    /// Returns `true` when events from `project_key` apply to this
    /// configuration.
    #[must_use]
    pub fn accepts_project(&self, project_key: &str) -> bool {
        self.project_key
            .as_deref()
            .is_none_or(|expected| expected.eq_ignore_ascii_case(project_key))
    }
}
