//! Unit tests for extension/
