//! Unit tests for post/

pub mod selector;
