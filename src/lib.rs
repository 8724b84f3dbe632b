//! Branchflow: issue-driven branch lifecycle automation.
//!
//! Issue tracker events drive the life of a feature branch across a
//! repository and all of its submodules. Creating an issue creates the
//! branch and provisions build jobs for it. Moving it to review opens pull
//! requests into the current release branch. Finishing it retires the
//! branch and its jobs.
//!
//! # Architecture
//!
//! Branchflow follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, GitHub, Jira)
//!
//! # Modules
//!
//! - [`scm`]: Branch naming, release selection, and cascading branch operations
//! - [`issue`]: Tracker events, webhook decoding, and the tracker port
//! - [`dispatch`]: Event routing, job provisioning, and per-configuration queues
//! - [`config`]: Runtime settings

pub mod config;
pub mod dispatch;
pub mod issue;
pub mod scm;
