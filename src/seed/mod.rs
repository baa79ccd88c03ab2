//! Seed shapes, the seed index and seed matching

pub mod index;
pub mod location;
pub mod mask;
pub mod matcher;
pub mod partition;
pub mod shape;

pub use index::{radix_sort, SeedEntry, SeedIndexStore};
pub use location::SeedLocation;
pub use mask::ReferenceMasks;
pub use matcher::{JoinStats, SeedMatcher};
pub use partition::Partitioner;
pub use shape::SeedShape;
