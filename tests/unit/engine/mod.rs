//! Search pipeline, error propagation and the command-line entry point

pub mod cli;
pub mod failures;
