//! Scoped environment overrides for configuration tests.

use std::env;
use std::ffi::OsString;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

static ENV_MUTEX: OnceLock<Mutex<()>> = OnceLock::new();

/// Every variable read by `FlowConfig::from_env`.
pub const FLOW_VARIABLES: [&str; 12] = [
    "BRANCHFLOW_SCM_API_URL",
    "BRANCHFLOW_SCM_ORGANIZATION",
    "BRANCHFLOW_SCM_TOKEN",
    "BRANCHFLOW_TRACKER_API_URL",
    "BRANCHFLOW_TRACKER_TOKEN",
    "BRANCHFLOW_CI_ROOT_URL",
    "BRANCHFLOW_REVIEW_STATUS",
    "BRANCHFLOW_DONE_STATUS",
    "BRANCHFLOW_RELEASE_ORDERING",
    "BRANCHFLOW_CASCADE_POLICY",
    "BRANCHFLOW_PR_TITLE_TEMPLATE",
    "BRANCHFLOW_COMMENT_TEMPLATE",
];

/// Holds the environment lock and restores overridden variables on drop.
pub struct EnvVarGuard {
    previous: Vec<(OsString, Option<OsString>)>,
    _lock: MutexGuard<'static, ()>,
}

impl EnvVarGuard {
    /// Clears every Branchflow variable, then applies `values`.
    pub fn flow(values: &[(&str, &str)]) -> Self {
        let lock = ENV_MUTEX
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut guard = Self {
            previous: Vec::new(),
            _lock: lock,
        };
        for key in FLOW_VARIABLES {
            guard.apply(key, None);
        }
        for (key, value) in values {
            guard.apply(key, Some(value));
        }
        guard
    }

    fn apply(&mut self, key: &str, value: Option<&str>) {
        self.previous.push((OsString::from(key), env::var_os(key)));
        unsafe {
            // SAFETY: ENV_MUTEX serializes environment mutations in tests.
            match value {
                Some(new_value) => env::set_var(key, new_value),
                None => env::remove_var(key),
            }
        }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        while let Some((key, value)) = self.previous.pop() {
            unsafe {
                // SAFETY: ENV_MUTEX serializes environment mutations in tests.
                match value {
                    Some(previous) => env::set_var(&key, previous),
                    None => env::remove_var(&key),
                }
            }
        }
    }
}
