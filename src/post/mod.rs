pub mod selector;

pub use selector::{Insertion, MatchStore, QueryMatches, SelectRejection, SelectorLimits};
