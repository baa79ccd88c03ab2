pub mod diagnostics;
pub mod error;
pub mod sequence;
pub mod utils;

pub mod align;
pub mod config;
pub mod engine;
pub mod extension;
pub mod post;
pub mod report;
pub mod seed;
pub mod stats;
pub mod store;
