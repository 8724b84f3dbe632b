//! Unit tests for branch lifecycle orchestration.

mod support;
