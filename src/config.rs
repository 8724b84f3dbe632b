//! Runtime settings for branch lifecycle orchestration.
//!
//! Settings load from a JSON document or from `BRANCHFLOW_*` environment
//! variables. Every field has a default, so a partial document is valid.
//!
//! ```
//! use branchflow::config::FlowConfig;
//! use branchflow::scm::domain::ReleaseOrdering;
//!
//! let config = FlowConfig::from_json(r#"{"release_ordering": "numeric"}"#)
//!     .expect("valid configuration");
//! assert_eq!(config.release_ordering, ReleaseOrdering::Numeric);
//! assert_eq!(config.done_status, "Done");
//! ```

use crate::dispatch::services::PerformerSettings;
use crate::scm::{
    domain::ReleaseOrdering,
    services::{CascadePolicy, DEFAULT_PULL_REQUEST_TITLE, OrchestratorSettings},
};
use minijinja::Environment;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Prefix shared by every environment variable read by [`FlowConfig::from_env`].
pub const ENV_PREFIX: &str = "BRANCHFLOW_";

/// Default progress comment posted when build jobs are provisioned.
pub const DEFAULT_PROGRESS_COMMENT: &str =
    "Build jobs created/updated for branch {{ branch }} ({{ view_url }})";

/// Errors returned while loading settings.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    #[error("invalid configuration document: {0}")]
    Parse(Arc<serde_json::Error>),

    /// An environment variable holds a value the setting does not accept.
    #[error("invalid value '{value}' for {key}")]
    InvalidValue {
        /// Variable name.
        key: String,
        /// Rejected value.
        value: String,
    },

    /// A template setting does not compile.
    #[error("invalid template in {setting}: {reason}")]
    InvalidTemplate {
        /// Setting holding the template.
        setting: &'static str,
        /// Compiler message.
        reason: String,
    },
}

/// Credentials for the source-control forge API.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScmCredentials {
    /// API endpoint, e.g. `https://api.github.com`.
    pub api_url: String,
    /// Organisation or account owning the repositories.
    pub organization: String,
    /// Access token sent as a bearer token.
    pub access_token: Option<String>,
}

impl Default for ScmCredentials {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_owned(),
            organization: String::new(),
            access_token: None,
        }
    }
}

impl fmt::Debug for ScmCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScmCredentials")
            .field("api_url", &self.api_url)
            .field("organization", &self.organization)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Credentials for the issue tracker API.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TrackerCredentials {
    /// Base URL of the tracker, e.g. `https://jira.example.com`.
    pub api_url: String,
    /// Access token sent as a bearer token.
    pub access_token: Option<String>,
}

impl fmt::Debug for TrackerCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackerCredentials")
            .field("api_url", &self.api_url)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Complete runtime settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Forge credentials handed to repository adapters.
    pub scm: ScmCredentials,
    /// Issue tracker credentials.
    pub tracker: TrackerCredentials,
    /// Root URL of the CI server, used to link grouping views in comments.
    pub ci_root_url: String,
    /// Issue status that requests a pull request.
    pub review_status: String,
    /// Issue status that retires the branch.
    pub done_status: String,
    /// Order used to select the current release branch.
    pub release_ordering: ReleaseOrdering,
    /// Failure handling across a submodule cascade.
    pub cascade_policy: CascadePolicy,
    /// `minijinja` template for pull request titles (`head`, `base`).
    pub pull_request_title_template: String,
    /// `minijinja` template for progress comments (`branch`, `view_url`,
    /// `repository`, `issue_key`).
    pub progress_comment_template: String,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            scm: ScmCredentials::default(),
            tracker: TrackerCredentials::default(),
            ci_root_url: "http://localhost:8080/".to_owned(),
            review_status: "In Review".to_owned(),
            done_status: "Done".to_owned(),
            release_ordering: ReleaseOrdering::default(),
            cascade_policy: CascadePolicy::default(),
            pull_request_title_template: DEFAULT_PULL_REQUEST_TITLE.to_owned(),
            progress_comment_template: DEFAULT_PROGRESS_COMMENT.to_owned(),
        }
    }
}

impl FlowConfig {
    /// Parses settings from a JSON document and validates them.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::InvalidTemplate`] for templates that do not compile.
    pub fn from_json(document: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(document).map_err(|err| ConfigError::Parse(Arc::new(err)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads settings from `BRANCHFLOW_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable holds an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, which receives full variable names
    /// such as `BRANCHFLOW_SCM_TOKEN`. Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable holds an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));
        let mut config = Self::default();

        if let Some(value) = read("SCM_API_URL") {
            config.scm.api_url = value;
        }
        if let Some(value) = read("SCM_ORGANIZATION") {
            config.scm.organization = value;
        }
        config.scm.access_token = read("SCM_TOKEN").or(config.scm.access_token);
        if let Some(value) = read("TRACKER_API_URL") {
            config.tracker.api_url = value;
        }
        config.tracker.access_token = read("TRACKER_TOKEN").or(config.tracker.access_token);
        if let Some(value) = read("CI_ROOT_URL") {
            config.ci_root_url = value;
        }
        if let Some(value) = read("REVIEW_STATUS") {
            config.review_status = value;
        }
        if let Some(value) = read("DONE_STATUS") {
            config.done_status = value;
        }
        if let Some(value) = read("RELEASE_ORDERING") {
            config.release_ordering = parse_keyword("RELEASE_ORDERING", &value)?;
        }
        if let Some(value) = read("CASCADE_POLICY") {
            config.cascade_policy = parse_keyword("CASCADE_POLICY", &value)?;
        }
        if let Some(value) = read("PR_TITLE_TEMPLATE") {
            config.pull_request_title_template = value;
        }
        if let Some(value) = read("COMMENT_TEMPLATE") {
            config.progress_comment_template = value;
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks that both templates compile.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTemplate`] naming the offending setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let environment = Environment::new();
        for (setting, source) in [
            (
                "pull_request_title_template",
                &self.pull_request_title_template,
            ),
            ("progress_comment_template", &self.progress_comment_template),
        ] {
            environment
                .template_from_str(source)
                .map_err(|err| ConfigError::InvalidTemplate {
                    setting,
                    reason: err.to_string(),
                })?;
        }
        Ok(())
    }

    /// Returns the orchestrator settings derived from this configuration.
    #[must_use]
    pub fn orchestrator_settings(&self) -> OrchestratorSettings {
        OrchestratorSettings {
            cascade_policy: self.cascade_policy,
            release_ordering: self.release_ordering,
            pull_request_title_template: self.pull_request_title_template.clone(),
        }
    }

    /// Returns the event performer settings derived from this configuration.
    #[must_use]
    pub fn performer_settings(&self) -> PerformerSettings {
        PerformerSettings {
            review_status: self.review_status.clone(),
            done_status: self.done_status.clone(),
            ci_root_url: self.ci_root_url.clone(),
            progress_comment_template: self.progress_comment_template.clone(),
            orchestrator: self.orchestrator_settings(),
        }
    }
}

fn parse_keyword<T: DeserializeOwned>(name: &str, value: &str) -> Result<T, ConfigError> {
    let keyword = serde_json::Value::String(value.trim().to_ascii_lowercase());
    serde_json::from_value(keyword).map_err(|_| ConfigError::InvalidValue {
        key: format!("{ENV_PREFIX}{name}"),
        value: value.to_owned(),
    })
}
