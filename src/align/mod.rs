pub mod banded;
pub mod matches;
pub mod result;
pub mod traceback;

pub use banded::{AlignerParams, AlignmentMode, BandedAligner, SeedAnchor};
pub use matches::{AlignmentText, Match};
pub use result::{Alignment, EditOp, EditStats};
