//! Issue tracker events and the tracker capability.
//!
//! Webhook deliveries decode into [`domain::IssueEvent`] values. The
//! [`ports::IssueTracker`] port looks up issue titles and posts progress
//! comments. Adapters cover an in-memory tracker for tests and the Jira REST
//! API.

pub mod adapters;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod tests;
