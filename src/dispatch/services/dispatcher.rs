//! Entry point turning received issue events into configuration runs.

use super::{EventPerformer, ExecutionContext, ScheduleOutcome, SequentialQueue};
use crate::dispatch::{
    domain::{
        BuildConfiguration, ConfigurationRun, DispatchDisposition, DispatchReport,
        ListenerFailure, RunOutcome,
    },
    ports::{ConfigurationRegistry, EventListener, RegistryError, ScmClientFactory, SecurityContext},
};
use crate::issue::domain::{IssueDomainError, IssueEvent};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

/// Errors that prevent a dispatch from starting.
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    /// The webhook payload could not be decoded.
    #[error(transparent)]
    Payload(#[from] IssueDomainError),

    /// The configurations could not be listed.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Result type for dispatches.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Routes issue events to build configurations and listeners.
#[derive(Clone)]
pub struct EventDispatcher<C>
where
    C: Clock + Send + Sync,
{
    registry: Arc<dyn ConfigurationRegistry>,
    security: Arc<dyn SecurityContext>,
    scm: Arc<dyn ScmClientFactory>,
    performer: EventPerformer,
    queue: Arc<SequentialQueue>,
    listeners: Vec<Arc<dyn EventListener>>,
    clock: Arc<C>,
}

impl<C> EventDispatcher<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a dispatcher with no listeners.
    #[must_use]
    pub fn new(
        registry: Arc<dyn ConfigurationRegistry>,
        security: Arc<dyn SecurityContext>,
        scm: Arc<dyn ScmClientFactory>,
        performer: EventPerformer,
        clock: Arc<C>,
    ) -> Self {
        Self {
            registry,
            security,
            scm,
            performer,
            queue: Arc::new(SequentialQueue::new()),
            listeners: Vec::new(),
            clock,
        }
    }

    /// Registers a listener. Listeners run in registration order.
    #[must_use]
    pub fn with_listener(mut self, listener: Arc<dyn EventListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    /// Returns the per-configuration queue.
    #[must_use]
    pub fn queue(&self) -> &SequentialQueue {
        &self.queue
    }

    /// Decodes a webhook payload and dispatches it.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Payload`] for undecodable payloads and
    /// [`DispatchError::Registry`] when configurations cannot be listed.
    pub async fn handle_payload(&self, payload: &str) -> DispatchResult<DispatchReport> {
        let event = IssueEvent::from_payload(payload)?;
        self.dispatch(&event).await
    }

    /// Dispatches `event` to every matching configuration, then to every
    /// listener.
    ///
    /// Events without a status transition are discarded. Configurations are
    /// listed as the system principal on behalf of the current caller, who
    /// is recorded in the report. The shared security context is never
    /// modified. A failing configuration or listener is recorded in the
    /// report and does not affect the others.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Registry`] when configurations cannot be
    /// listed.
    pub async fn dispatch(&self, event: &IssueEvent) -> DispatchResult<DispatchReport> {
        let received_at = self.clock.utc();
        let context = ExecutionContext::for_caller(self.security.current());
        let issue_key = event.issue().key.as_str();
        if !event.status_changed() {
            warn!(issue_key, event = %event.event_type(), "ignoring event, status has not changed");
            return Ok(DispatchReport::new(
                received_at,
                context.caller().clone(),
                DispatchDisposition::StatusUnchanged,
            ));
        }

        let mut report = DispatchReport::new(
            received_at,
            context.caller().clone(),
            DispatchDisposition::Dispatched,
        );
        info!(
            run_id = %report.run_id,
            issue_key,
            event = %event.event_type(),
            caller = %context.caller(),
            "received event"
        );
        report.runs = self.run_configurations(&context.elevated(), event).await?;

        for listener in &self.listeners {
            if let Err(err) = listener.on_event(event).await {
                warn!(listener = listener.name(), error = %err, "listener failed");
                report.listener_failures.push(ListenerFailure {
                    listener: listener.name().to_owned(),
                    reason: err.to_string(),
                });
            }
        }
        Ok(report)
    }

    async fn run_configurations(
        &self,
        context: &ExecutionContext,
        event: &IssueEvent,
    ) -> DispatchResult<Vec<ConfigurationRun>> {
        let configurations = self.registry.visible_to(context.effective()).await?;

        let mut runs = Vec::new();
        for configuration in configurations
            .iter()
            .filter(|configuration| configuration.accepts_project(&event.issue().project_key))
        {
            let scheduled = self
                .queue
                .schedule(configuration.id(), event, || {
                    self.run_configuration(configuration, event)
                })
                .await;
            let outcome = match scheduled {
                ScheduleOutcome::Ran(outcome) => outcome,
                ScheduleOutcome::AlreadyQueued => RunOutcome::AlreadyQueued,
            };
            runs.push(ConfigurationRun {
                configuration: configuration.id(),
                name: configuration.name().to_owned(),
                outcome,
            });
        }
        Ok(runs)
    }

    async fn run_configuration(
        &self,
        configuration: &BuildConfiguration,
        event: &IssueEvent,
    ) -> RunOutcome {
        let client = match self.scm.client_for(configuration).await {
            Ok(client) => client,
            Err(err) => return failed_run(configuration, event, &err),
        };
        match self.performer.perform(configuration, client, event).await {
            Ok(outcome) => {
                info!(
                    configuration = configuration.name(),
                    issue_key = %event.issue().key,
                    ?outcome,
                    "configuration run completed"
                );
                RunOutcome::Completed { outcome }
            }
            Err(err) => failed_run(configuration, event, &err),
        }
    }
}

fn failed_run(
    configuration: &BuildConfiguration,
    event: &IssueEvent,
    err: &dyn std::error::Error,
) -> RunOutcome {
    error!(
        configuration = configuration.name(),
        issue_key = %event.issue().key,
        error = %err,
        "configuration run failed"
    );
    RunOutcome::Failed {
        reason: err.to_string(),
    }
}
