//! Port contracts for event dispatch.
//!
//! Each port abstracts a collaborator owned by the CI host: the list of
//! build configurations, the grouping records, job storage, the security
//! context, downstream listeners, and repository access.

mod grouping;
mod jobs;
mod listener;
mod registry;
mod scm_factory;
mod security;

pub use grouping::{GroupingStore, GroupingStoreError, GroupingStoreResult};
pub use jobs::{JobProvisioner, JobProvisionerError, JobProvisionerResult};
pub use listener::{EventListener, ListenerError};
pub use registry::{ConfigurationRegistry, RegistryError, RegistryResult};
pub use scm_factory::ScmClientFactory;
pub use security::SecurityContext;
