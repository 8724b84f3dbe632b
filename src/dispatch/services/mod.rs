//! Application services for event dispatch.

mod dispatcher;
mod hooks;
mod perform;
mod queue;
mod security;

pub use dispatcher::{DispatchError, DispatchResult, EventDispatcher};
pub use hooks::{JobDeprovisionHook, JobProvisionHook};
pub use perform::{EventPerformer, PerformError, PerformResult, PerformerSettings};
pub use queue::{ScheduleOutcome, SequentialQueue};
pub use security::ExecutionContext;
