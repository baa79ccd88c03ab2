pub mod args;
pub mod options;

pub use args::SearchArgs;
pub use options::{SearchMode, SearchOptions};
