//! Cheap filters applied to seed hits before banded alignment

pub mod filter;
pub mod leftmost;
pub mod ungapped;

pub use filter::{ExtensionFilter, FilterOutcome, FilterParams, Rejection};
pub use leftmost::LeftmostCheck;
pub use ungapped::{extend_ungapped, UngappedHit};
