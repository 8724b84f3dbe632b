//! Domain model for event dispatch.

mod configuration;
mod grouping;
mod job;
mod principal;
mod report;

pub use configuration::{BuildConfiguration, ConfigurationId};
pub use grouping::GroupingKey;
pub use job::{JobName, JobSpec};
pub use principal::Principal;
pub use report::{
    ConfigurationRun, DispatchDisposition, DispatchReport, ListenerFailure, PerformOutcome,
    RunOutcome,
};
