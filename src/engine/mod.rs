//! Search engine: shared run state, job scheduling and the pipeline itself

pub mod context;
pub mod locks;
pub mod run;
pub mod scheduler;
pub mod search;

pub use context::{QueryCutoff, SearchContext};
pub use locks::{BucketLocks, StripedLocks};
pub use run::run;
pub use scheduler::{CancellationToken, JobScheduler};
pub use search::{search, QueryResult, SearchEngine, SearchOutcome};
