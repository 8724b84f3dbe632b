//! Downstream subscribers to received events.

use crate::issue::domain::IssueEvent;
use async_trait::async_trait;
use thiserror::Error;

/// Receives every dispatched event after the configurations were triggered.
#[async_trait]
pub trait EventListener: Send + Sync {
    /// Name used in logs and reports.
    fn name(&self) -> &str;

    /// Handles an event.
    async fn on_event(&self, event: &IssueEvent) -> Result<(), ListenerError>;
}

/// Failure reported by a listener.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ListenerError(pub String);
