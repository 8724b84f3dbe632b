//! GitHub REST adapter for the repository port.

use super::gitmodules::{parse_gitmodules, repository_name_from_url};
use super::models::{
    BranchPayload, ComparePayload, CreatePullRequestBody, CreateRefBody,
    CreatedPullRequestPayload, GITLINK_MODE, PullRequestPayload, RefPayload, RepositoryPayload,
    TreePayload,
};
use crate::config::ScmCredentials;
use crate::scm::{
    domain::{
        BranchComparison, BranchName, OpenPullRequest, PullRequestHandle, PullRequestRequest,
    },
    ports::{ScmClient, ScmClientError, ScmClientResult},
};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode, header};
use serde::de::DeserializeOwned;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, warn};

const PAGE_SIZE: usize = 100;
const USER_AGENT: &str = concat!("branchflow/", env!("CARGO_PKG_VERSION"));
const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw";

/// Repository client backed by the GitHub REST API.
///
/// The client is bound to one commit: new branches start there and
/// submodules are resolved from its tree.
#[derive(Debug, Clone)]
pub struct GitHubScmClient {
    http: reqwest::Client,
    credentials: Arc<ScmCredentials>,
    repository: String,
    remote_url: String,
    commit: String,
}

impl GitHubScmClient {
    /// Connects to `repository` in the configured organisation and binds the
    /// client to the head of its default branch.
    ///
    /// # Errors
    ///
    /// Returns [`ScmClientError`] when the HTTP client cannot be built or the
    /// repository metadata cannot be fetched.
    pub async fn connect(credentials: ScmCredentials, repository: &str) -> ScmClientResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(ScmClientError::transport)?;
        let mut client = Self {
            http,
            credentials: Arc::new(credentials),
            repository: repository.to_owned(),
            remote_url: String::new(),
            commit: String::new(),
        };

        let metadata: RepositoryPayload = client.get_json(&client.repo_url("")).await?;
        let head: RefPayload = client
            .get_json(&client.repo_url(&format!("git/ref/heads/{}", metadata.default_branch)))
            .await?;
        client.remote_url = metadata.clone_url;
        client.commit = head.object.sha;
        debug!(repository, commit = %client.commit, "bound GitHub client to default branch head");
        Ok(client)
    }

    /// Returns the commit this client is bound to.
    #[must_use]
    pub fn commit(&self) -> &str {
        &self.commit
    }

    fn derive(&self, repository: &str, remote_url: &str, commit: &str) -> Self {
        Self {
            http: self.http.clone(),
            credentials: Arc::clone(&self.credentials),
            repository: repository.to_owned(),
            remote_url: remote_url.to_owned(),
            commit: commit.to_owned(),
        }
    }

    fn repo_url(&self, path: &str) -> String {
        let base = format!(
            "{}/repos/{}/{}",
            self.credentials.api_url.trim_end_matches('/'),
            self.credentials.organization,
            self.repository
        );
        if path.is_empty() {
            base
        } else {
            format!("{base}/{path}")
        }
    }

    fn request(&self, method: Method, url: &str, accept: &str) -> RequestBuilder {
        let builder = self
            .http
            .request(method, url)
            .header(header::ACCEPT, accept)
            .header("X-GitHub-Api-Version", "2022-11-28");
        match self.credentials.access_token.as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> ScmClientResult<Response> {
        let response = builder.send().await.map_err(ScmClientError::transport)?;
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        Err(ScmClientError::Api {
            repository: self.repository.clone(),
            status,
            message,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> ScmClientResult<T> {
        let response = self
            .send(self.request(Method::GET, url, JSON_MEDIA_TYPE))
            .await?;
        response.json().await.map_err(ScmClientError::transport)
    }

    async fn get_paginated<T: DeserializeOwned>(&self, url: &str) -> ScmClientResult<Vec<T>> {
        let separator = if url.contains('?') { '&' } else { '?' };
        let mut items = Vec::new();
        for page in 1.. {
            let page_url = format!("{url}{separator}per_page={PAGE_SIZE}&page={page}");
            let batch: Vec<T> = self.get_json(&page_url).await?;
            let is_last = batch.len() < PAGE_SIZE;
            items.extend(batch);
            if is_last {
                break;
            }
        }
        Ok(items)
    }

    async fn gitmodules(&self) -> ScmClientResult<Option<String>> {
        let url = self.repo_url(&format!("contents/.gitmodules?ref={}", self.commit));
        let response = self
            .request(Method::GET, &url, RAW_MEDIA_TYPE)
            .send()
            .await
            .map_err(ScmClientError::transport)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(ScmClientError::Api {
                repository: self.repository.clone(),
                status: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        response
            .text()
            .await
            .map(Some)
            .map_err(ScmClientError::transport)
    }

    fn unexpected(&self, reason: impl Into<String>) -> ScmClientError {
        ScmClientError::UnexpectedResponse {
            repository: self.repository.clone(),
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl ScmClient for GitHubScmClient {
    fn repository_name(&self) -> &str {
        &self.repository
    }

    fn remote_url(&self) -> &str {
        &self.remote_url
    }

    async fn branches(&self) -> ScmClientResult<BTreeSet<BranchName>> {
        let payload: Vec<BranchPayload> = self.get_paginated(&self.repo_url("branches")).await?;
        Ok(branch_names(&self.repository, payload))
    }

    async fn create_branch(&self, name: &BranchName) -> ScmClientResult<()> {
        let body = CreateRefBody {
            ref_name: format!("refs/heads/{name}"),
            sha: &self.commit,
        };
        let builder = self
            .request(Method::POST, &self.repo_url("git/refs"), JSON_MEDIA_TYPE)
            .json(&body);
        self.send(builder).await?;
        Ok(())
    }

    async fn delete_branch(&self, name: &BranchName) -> ScmClientResult<()> {
        let url = self.repo_url(&format!("git/refs/heads/{name}"));
        self.send(self.request(Method::DELETE, &url, JSON_MEDIA_TYPE))
            .await?;
        Ok(())
    }

    async fn compare(
        &self,
        head: &BranchName,
        base: &BranchName,
    ) -> ScmClientResult<BranchComparison> {
        let payload: ComparePayload = self
            .get_json(&self.repo_url(&format!("compare/{base}...{head}")))
            .await?;
        BranchComparison::try_from(payload.status.as_str())
            .map_err(|err| self.unexpected(err.to_string()))
    }

    async fn open_pull_requests(&self) -> ScmClientResult<Vec<OpenPullRequest>> {
        let payload: Vec<PullRequestPayload> =
            self.get_paginated(&self.repo_url("pulls?state=open")).await?;
        Ok(own_pull_requests(&self.credentials.organization, payload))
    }

    async fn create_pull_request(
        &self,
        request: &PullRequestRequest,
    ) -> ScmClientResult<PullRequestHandle> {
        let body = CreatePullRequestBody {
            title: &request.title,
            head: request.head.as_str(),
            base: request.base.as_str(),
            body: &request.description,
        };
        let builder = self
            .request(Method::POST, &self.repo_url("pulls"), JSON_MEDIA_TYPE)
            .json(&body);
        let created: CreatedPullRequestPayload = self
            .send(builder)
            .await?
            .json()
            .await
            .map_err(ScmClientError::transport)?;
        Ok(PullRequestHandle {
            number: created.number,
            url: created.html_url,
        })
    }

    async fn submodules(&self) -> ScmClientResult<Vec<Arc<dyn ScmClient>>> {
        let Some(contents) = self.gitmodules().await? else {
            return Ok(Vec::new());
        };
        let tree: TreePayload = self
            .get_json(&self.repo_url(&format!("git/trees/{}?recursive=1", self.commit)))
            .await?;

        let mut submodules: Vec<Arc<dyn ScmClient>> = Vec::new();
        for entry in parse_gitmodules(&contents) {
            let gitlink = tree
                .tree
                .iter()
                .find(|node| node.mode == GITLINK_MODE && node.path == entry.path)
                .ok_or_else(|| {
                    self.unexpected(format!("submodule {} has no gitlink", entry.path))
                })?;
            let name = repository_name_from_url(&entry.url).ok_or_else(|| {
                self.unexpected(format!("cannot derive repository from {}", entry.url))
            })?;
            submodules.push(Arc::new(self.derive(name, &entry.url, &gitlink.sha)));
        }
        Ok(submodules)
    }
}

/// Keeps the branch names the domain accepts and logs the rest.
fn branch_names(repository: &str, payload: Vec<BranchPayload>) -> BTreeSet<BranchName> {
    payload
        .into_iter()
        .filter_map(|branch| {
            BranchName::new(branch.name)
                .inspect_err(|err| {
                    warn!(repository, error = %err, "skipping branch with unsupported name");
                })
                .ok()
        })
        .collect()
}

/// Keeps pull requests whose head branch lives in `organization`'s
/// repository. Fork heads may share a branch name with ours.
fn own_pull_requests(
    organization: &str,
    payload: Vec<PullRequestPayload>,
) -> Vec<OpenPullRequest> {
    payload
        .into_iter()
        .filter(|pull_request| pull_request.head.is_owned_by(organization))
        .map(|pull_request| OpenPullRequest {
            handle: PullRequestHandle {
                number: pull_request.number,
                url: pull_request.html_url,
            },
            head: pull_request.head.ref_name,
            base: pull_request.base.ref_name,
        })
        .collect()
}
