//! Unit tests for issue events and the in-memory tracker.
