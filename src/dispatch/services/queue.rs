//! Per-configuration sequential execution of dispatched events.

use crate::dispatch::domain::ConfigurationId;
use crate::issue::domain::IssueEvent;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;

/// Result of asking the queue to run an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleOutcome<T> {
    /// The run executed and produced a value.
    Ran(T),
    /// An equal event was already waiting for this configuration, so this
    /// one was dropped.
    AlreadyQueued,
}

/// Serialises runs per configuration.
///
/// At most one run per configuration is in flight; later events wait behind
/// it in arrival order. Runs for different configurations proceed
/// independently. An event equal to one already waiting for the same
/// configuration (same type and issue key) is not queued twice.
#[derive(Debug, Default)]
pub struct SequentialQueue {
    lanes: Mutex<HashMap<ConfigurationId, Arc<Lane>>>,
}

#[derive(Debug, Default)]
struct Lane {
    waiting: Mutex<HashSet<IssueEvent>>,
    running: tokio::sync::Mutex<()>,
}

struct WaitingEntry<'a> {
    lane: &'a Lane,
    event: &'a IssueEvent,
}

impl Drop for WaitingEntry<'_> {
    fn drop(&mut self) {
        self.lane
            .waiting
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(self.event);
    }
}

impl SequentialQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `run` for `event` once every earlier run of `configuration` has
    /// finished.
    pub async fn schedule<F, Fut, T>(
        &self,
        configuration: ConfigurationId,
        event: &IssueEvent,
        run: F,
    ) -> ScheduleOutcome<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let lane = self.lane(configuration);
        let is_new = lane
            .waiting
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(event.clone());
        if !is_new {
            info!(
                %configuration,
                issue_key = %event.issue().key,
                "event is already in the queue"
            );
            return ScheduleOutcome::AlreadyQueued;
        }

        let entry = WaitingEntry {
            lane: &lane,
            event,
        };
        let _running = lane.running.lock().await;
        drop(entry);
        ScheduleOutcome::Ran(run().await)
    }

    /// Returns how many events are waiting (not running) for
    /// `configuration`.
    #[must_use]
    pub fn waiting(&self, configuration: ConfigurationId) -> usize {
        self.lanes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&configuration)
            .map_or(0, |lane| {
                lane.waiting
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .len()
            })
    }

    fn lane(&self, configuration: ConfigurationId) -> Arc<Lane> {
        Arc::clone(
            self.lanes
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .entry(configuration)
                .or_default(),
        )
    }
}
