//! GitHub-backed repository adapter.

mod client;
mod gitmodules;
mod models;

pub use client::GitHubScmClient;
