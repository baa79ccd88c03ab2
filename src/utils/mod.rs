//! Shared utilities

pub mod matrix;

pub use matrix::ScoringMatrix;
