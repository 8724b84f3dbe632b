//! Jira REST adapter for the issue tracker port.

use crate::config::TrackerCredentials;
use crate::issue::ports::{IssueTracker, IssueTrackerError, IssueTrackerResult};
use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
struct IssuePayload {
    fields: SummaryFields,
}

#[derive(Debug, Deserialize)]
struct SummaryFields {
    summary: String,
}

#[derive(Debug, Serialize)]
struct CommentBody<'a> {
    body: &'a str,
}

/// Issue tracker backed by the Jira REST API (version 2).
#[derive(Debug, Clone)]
pub struct JiraIssueTracker {
    http: reqwest::Client,
    credentials: TrackerCredentials,
}

impl JiraIssueTracker {
    /// Creates a tracker client.
    ///
    /// # Errors
    ///
    /// Returns [`IssueTrackerError::Transport`] when the HTTP client cannot
    /// be built.
    pub fn new(credentials: TrackerCredentials) -> IssueTrackerResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("branchflow/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(IssueTrackerError::transport)?;
        Ok(Self { http, credentials })
    }

    fn issue_url(&self, issue_key: &str, suffix: &str) -> String {
        format!(
            "{}/rest/api/2/issue/{issue_key}{suffix}",
            self.credentials.api_url.trim_end_matches('/')
        )
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.credentials.access_token.as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, issue_key: &str, builder: RequestBuilder) -> IssueTrackerResult<Response> {
        let response = self
            .authorize(builder)
            .send()
            .await
            .map_err(IssueTrackerError::transport)?;
        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::NOT_FOUND => Err(IssueTrackerError::NotFound(issue_key.to_owned())),
            status => Err(IssueTrackerError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            }),
        }
    }
}

#[async_trait]
impl IssueTracker for JiraIssueTracker {
    async fn issue_title(&self, issue_key: &str) -> IssueTrackerResult<String> {
        let url = self.issue_url(issue_key, "?fields=summary");
        let payload: IssuePayload = self
            .send(issue_key, self.http.get(url))
            .await?
            .json()
            .await
            .map_err(IssueTrackerError::transport)?;
        Ok(payload.fields.summary)
    }

    async fn add_comment(&self, issue_key: &str, body: &str) -> IssueTrackerResult<()> {
        let url = self.issue_url(issue_key, "/comment");
        let builder = self.http.post(url).json(&CommentBody { body });
        self.send(issue_key, builder).await?;
        Ok(())
    }
}
