//! Unit test infrastructure for SALT
//!
//! Tests are organized by module:
//! - `sequence/` - Codec and location round trips, frame translation
//! - `seed/` - Radix sort, partition routing, seed matching
//! - `extension/` - Leftmost dedup, ungapped X-drop
//! - `align/` - Banded alignment properties and scenarios
//! - `post/` - Match selection caps and replacement
//! - `engine/` - Scheduler, lock tables and end-to-end searches
//! - `report/` - Output writers

pub mod align;
pub mod engine;
pub mod extension;
pub mod helpers;
pub mod post;
pub mod report;
pub mod seed;
pub mod sequence;
