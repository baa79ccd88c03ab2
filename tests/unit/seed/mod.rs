//! Unit tests for seed/

pub mod index;
