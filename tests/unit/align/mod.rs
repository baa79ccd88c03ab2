//! Unit tests for align/

pub mod banded;
