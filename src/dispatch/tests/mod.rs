//! Unit tests for event dispatch.

mod support;
