//! Security context port.

use crate::dispatch::domain::Principal;

/// Source of the principal on whose behalf inbound events arrive.
///
/// Implementations are read-only; elevation is carried by the dispatch
/// itself rather than installed here.
pub trait SecurityContext: Send + Sync {
    /// Returns the current principal.
    fn current(&self) -> Principal;
}
