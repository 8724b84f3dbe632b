//! Domain model for issue tracker events.

mod error;
mod event;
mod payload;

pub use error::IssueDomainError;
pub use event::{IssueEvent, IssueEventType, IssueSnapshot};
