//! In-memory repository adapter for orchestration tests.

use crate::scm::{
    domain::{
        BranchComparison, BranchName, OpenPullRequest, PullRequestHandle, PullRequestRequest,
    },
    ports::{ScmClient, ScmClientError, ScmClientResult},
};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

/// Kinds of repository calls, used to inject failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScmOperationKind {
    /// [`ScmClient::branches`].
    Branches,
    /// [`ScmClient::create_branch`].
    CreateBranch,
    /// [`ScmClient::delete_branch`].
    DeleteBranch,
    /// [`ScmClient::compare`].
    Compare,
    /// [`ScmClient::open_pull_requests`].
    OpenPullRequests,
    /// [`ScmClient::create_pull_request`].
    CreatePullRequest,
    /// [`ScmClient::submodules`].
    Submodules,
}

/// A mutation applied to an in-memory repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedMutation {
    /// A branch was created and pushed.
    BranchCreated(String),
    /// A branch was deleted and the deletion pushed.
    BranchDeleted(String),
    /// A pull request was opened.
    PullRequestOpened {
        /// Head branch.
        head: String,
        /// Base branch.
        base: String,
    },
}

/// Journal entry naming the repository a mutation was applied to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalEntry {
    /// Repository name.
    pub repository: String,
    /// Mutation applied.
    pub mutation: RecordedMutation,
}

/// Mutation journal shared by a tree of in-memory repositories.
///
/// Lets tests assert cross-repository ordering of a cascade.
#[derive(Debug, Clone, Default)]
pub struct ScmJournal {
    entries: Arc<RwLock<Vec<JournalEntry>>>,
}

impl ScmJournal {
    /// Creates an empty journal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all recorded mutations in application order.
    #[must_use]
    pub fn entries(&self) -> Vec<JournalEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the repositories that were mutated, in application order.
    #[must_use]
    pub fn mutated_repositories(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .map(|entry| entry.repository)
            .collect()
    }

    fn record(&self, repository: &str, mutation: RecordedMutation) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(JournalEntry {
                repository: repository.to_owned(),
                mutation,
            });
    }
}

/// In-memory repository adapter.
///
/// Cloning yields a handle onto the same repository state.
#[derive(Debug, Clone)]
pub struct InMemoryScmClient {
    name: String,
    remote_url: String,
    journal: ScmJournal,
    state: Arc<RwLock<InMemoryRepositoryState>>,
}

#[derive(Debug, Default)]
struct InMemoryRepositoryState {
    branches: BTreeSet<BranchName>,
    comparisons: HashMap<(String, String), BranchComparison>,
    open_pull_requests: Vec<OpenPullRequest>,
    created_pull_requests: Vec<PullRequestRequest>,
    next_pull_request_number: u64,
    submodules: Vec<InMemoryScmClient>,
    failing: HashSet<ScmOperationKind>,
}

impl InMemoryScmClient {
    /// Creates an empty repository recording into `journal`.
    #[must_use]
    pub fn new(name: impl Into<String>, journal: &ScmJournal) -> Self {
        let repository_name = name.into();
        Self {
            remote_url: format!("https://git.example.com/acme/{repository_name}.git"),
            name: repository_name,
            journal: journal.clone(),
            state: Arc::new(RwLock::new(InMemoryRepositoryState {
                next_pull_request_number: 1,
                ..InMemoryRepositoryState::default()
            })),
        }
    }

    /// Adds branches. Invalid names are ignored.
    #[must_use]
    pub fn with_branches<'a>(self, branches: impl IntoIterator<Item = &'a str>) -> Self {
        self.update(|state| {
            state
                .branches
                .extend(branches.into_iter().filter_map(|name| BranchName::new(name).ok()));
        });
        self
    }

    /// Appends a submodule. Submodules are enumerated in insertion order.
    #[must_use]
    pub fn with_submodule(self, submodule: Self) -> Self {
        self.update(|state| state.submodules.push(submodule));
        self
    }

    /// Adds a branch to an already shared repository. Invalid names are
    /// ignored.
    pub fn add_branch(&self, name: &str) {
        if let Ok(branch) = BranchName::new(name) {
            self.update(|state| {
                state.branches.insert(branch);
            });
        }
    }

    /// Sets the comparison result for `head` against `base`.
    ///
    /// Unset pairs compare as [`BranchComparison::Ahead`].
    pub fn set_comparison(&self, head: &str, base: &str, comparison: BranchComparison) {
        self.update(|state| {
            state
                .comparisons
                .insert((head.to_owned(), base.to_owned()), comparison);
        });
    }

    /// Registers an already-open pull request and returns its handle.
    pub fn add_open_pull_request(&self, head: &str, base: &str) -> PullRequestHandle {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let handle = state.allocate_handle();
        state.open_pull_requests.push(OpenPullRequest {
            handle: handle.clone(),
            head: head.to_owned(),
            base: base.to_owned(),
        });
        handle
    }

    /// Makes every subsequent call of `kind` fail.
    pub fn fail_on(&self, kind: ScmOperationKind) {
        self.update(|state| {
            state.failing.insert(kind);
        });
    }

    /// Returns the branch names currently present.
    #[must_use]
    pub fn branch_names(&self) -> Vec<String> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .branches
            .iter()
            .map(|branch| branch.as_str().to_owned())
            .collect()
    }

    /// Returns every pull request opened through this adapter.
    #[must_use]
    pub fn created_pull_requests(&self) -> Vec<PullRequestRequest> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .created_pull_requests
            .clone()
    }

    fn update(&self, apply: impl FnOnce(&mut InMemoryRepositoryState)) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        apply(&mut state);
    }

    fn check(&self, state: &InMemoryRepositoryState, kind: ScmOperationKind) -> ScmClientResult<()> {
        if state.failing.contains(&kind) {
            return Err(ScmClientError::Api {
                repository: self.name.clone(),
                status: 503,
                message: format!("injected failure for {kind:?}"),
            });
        }
        Ok(())
    }

    fn not_found(&self, branch: &BranchName) -> ScmClientError {
        ScmClientError::Api {
            repository: self.name.clone(),
            status: 404,
            message: format!("branch {branch} not found"),
        }
    }

    fn read_state(
        &self,
    ) -> ScmClientResult<std::sync::RwLockReadGuard<'_, InMemoryRepositoryState>> {
        self.state
            .read()
            .map_err(|err| ScmClientError::transport(std::io::Error::other(err.to_string())))
    }

    fn write_state(
        &self,
    ) -> ScmClientResult<std::sync::RwLockWriteGuard<'_, InMemoryRepositoryState>> {
        self.state
            .write()
            .map_err(|err| ScmClientError::transport(std::io::Error::other(err.to_string())))
    }
}

impl InMemoryRepositoryState {
    fn allocate_handle(&mut self) -> PullRequestHandle {
        let number = self.next_pull_request_number;
        self.next_pull_request_number += 1;
        PullRequestHandle::new(number)
    }
}

#[async_trait]
impl ScmClient for InMemoryScmClient {
    fn repository_name(&self) -> &str {
        &self.name
    }

    fn remote_url(&self) -> &str {
        &self.remote_url
    }

    async fn branches(&self) -> ScmClientResult<BTreeSet<BranchName>> {
        let state = self.read_state()?;
        self.check(&state, ScmOperationKind::Branches)?;
        Ok(state.branches.clone())
    }

    async fn create_branch(&self, name: &BranchName) -> ScmClientResult<()> {
        {
            let mut state = self.write_state()?;
            self.check(&state, ScmOperationKind::CreateBranch)?;
            state.branches.insert(name.clone());
        }
        self.journal.record(
            &self.name,
            RecordedMutation::BranchCreated(name.as_str().to_owned()),
        );
        Ok(())
    }

    async fn delete_branch(&self, name: &BranchName) -> ScmClientResult<()> {
        {
            let mut state = self.write_state()?;
            self.check(&state, ScmOperationKind::DeleteBranch)?;
            if !state.branches.remove(name) {
                return Err(self.not_found(name));
            }
        }
        self.journal.record(
            &self.name,
            RecordedMutation::BranchDeleted(name.as_str().to_owned()),
        );
        Ok(())
    }

    async fn compare(
        &self,
        head: &BranchName,
        base: &BranchName,
    ) -> ScmClientResult<BranchComparison> {
        let state = self.read_state()?;
        self.check(&state, ScmOperationKind::Compare)?;
        for branch in [head, base] {
            if !state.branches.contains(branch) {
                return Err(self.not_found(branch));
            }
        }
        Ok(state
            .comparisons
            .get(&(head.as_str().to_owned(), base.as_str().to_owned()))
            .copied()
            .unwrap_or(BranchComparison::Ahead))
    }

    async fn open_pull_requests(&self) -> ScmClientResult<Vec<OpenPullRequest>> {
        let state = self.read_state()?;
        self.check(&state, ScmOperationKind::OpenPullRequests)?;
        Ok(state.open_pull_requests.clone())
    }

    async fn create_pull_request(
        &self,
        request: &PullRequestRequest,
    ) -> ScmClientResult<PullRequestHandle> {
        let handle = {
            let mut state = self.write_state()?;
            self.check(&state, ScmOperationKind::CreatePullRequest)?;
            let handle = state.allocate_handle();
            state.open_pull_requests.push(OpenPullRequest {
                handle: handle.clone(),
                head: request.head.as_str().to_owned(),
                base: request.base.as_str().to_owned(),
            });
            state.created_pull_requests.push(request.clone());
            handle
        };
        self.journal.record(
            &self.name,
            RecordedMutation::PullRequestOpened {
                head: request.head.as_str().to_owned(),
                base: request.base.as_str().to_owned(),
            },
        );
        Ok(handle)
    }

    async fn submodules(&self) -> ScmClientResult<Vec<Arc<dyn ScmClient>>> {
        let state = self.read_state()?;
        self.check(&state, ScmOperationKind::Submodules)?;
        Ok(state
            .submodules
            .iter()
            .map(|submodule| Arc::new(submodule.clone()) as Arc<dyn ScmClient>)
            .collect())
    }
}
