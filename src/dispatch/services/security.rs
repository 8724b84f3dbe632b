//! Principals a single dispatch runs under.

use crate::dispatch::domain::Principal;

/// Caller and effective principal for one dispatch.
///
/// The context is a value owned by the dispatch that created it, so
/// elevation never touches state shared with other dispatches.
///
/// # Example
///
/// ```
/// use branchflow::dispatch::domain::Principal;
/// use branchflow::dispatch::services::ExecutionContext;
///
/// let context = ExecutionContext::for_caller(Principal::Anonymous).elevated();
///
/// assert_eq!(context.caller(), &Principal::Anonymous);
/// assert_eq!(context.effective(), &Principal::System);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionContext {
    caller: Principal,
    effective: Principal,
}

impl ExecutionContext {
    /// Creates a context running as `caller`.
    #[must_use]
    pub fn for_caller(caller: Principal) -> Self {
        Self {
            effective: caller.clone(),
            caller,
        }
    }

    /// Returns a copy running as [`Principal::System`] on behalf of the same
    /// caller.
    #[must_use]
    pub fn elevated(&self) -> Self {
        Self {
            caller: self.caller.clone(),
            effective: Principal::System,
        }
    }

    /// Principal that triggered the dispatch.
    #[must_use]
    pub const fn caller(&self) -> &Principal {
        &self.caller
    }

    /// Principal that work runs as.
    #[must_use]
    pub const fn effective(&self) -> &Principal {
        &self.effective
    }
}
