//! Per-query match selection
//!
//! Each query keeps a bounded working set. A new match is admitted by these
//! rules, in order:
//!
//! 1. below the identity floor: rejected;
//! 2. overlaps (on the reference) a kept match to the same reference with an
//!    equal or higher score: rejected;
//! 3. overlapped matches to the same reference with a lower score are dropped;
//! 4. the reference already holds `max_per_reference` matches: the new one
//!    replaces that reference's worst if it ranks better, else it is rejected;
//! 5. the query already holds `max_per_query` matches: the new one replaces
//!    the overall worst (lowest score, then highest reference id) if it ranks
//!    better, else it is rejected.
//!
//! Ranking is total (see [`Match::rank_cmp`]), so output order never depends
//! on which worker found which match first. Among overlapping matches of equal
//! score the first arrival stays.

use log::trace;
use rustc_hash::FxHashMap;

use crate::align::Match;
use crate::engine::locks::{StripedLocks, DEFAULT_STRIPES};

#[derive(Debug, Clone, Copy)]
pub struct SelectorLimits {
    pub max_per_query: usize,
    pub max_per_reference: usize,
    pub min_percent_identity: f64,
}

impl Default for SelectorLimits {
    fn default() -> Self {
        Self {
            max_per_query: 25,
            max_per_reference: 1,
            min_percent_identity: 0.0,
        }
    }
}

/// Outcome of offering a match to the selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// Kept; the number of previously kept matches it displaced
    Kept { displaced: usize },
    Rejected(SelectRejection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectRejection {
    Identity,
    Overlap,
    ReferenceCap,
    QueryCap,
}

/// Working set of one query
#[derive(Debug, Clone, Default)]
pub struct QueryMatches {
    matches: Vec<Match>,
}

impl QueryMatches {
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    /// Index of the worst kept match, optionally restricted to one reference
    fn worst(&self, reference_id: Option<u32>) -> Option<usize> {
        self.matches
            .iter()
            .enumerate()
            .filter(|(_, m)| reference_id.is_none_or(|id| m.reference_id == id))
            .max_by(|(_, a), (_, b)| a.rank_cmp(b))
            .map(|(i, _)| i)
    }

    /// Could a match with this raw score still enter the set? Used to skip
    /// traceback for candidates that would be rejected by the query cap.
    pub fn has_room_for(&self, raw_score: i32, limits: &SelectorLimits) -> bool {
        if self.matches.len() < limits.max_per_query {
            return true;
        }
        self.worst(None)
            .is_some_and(|i| self.matches[i].raw_score() <= raw_score)
    }

    pub fn insert(&mut self, candidate: Match, limits: &SelectorLimits) -> Insertion {
        if limits.min_percent_identity > 0.0
            && candidate.percent_identity() < limits.min_percent_identity
        {
            return Insertion::Rejected(SelectRejection::Identity);
        }

        if self
            .matches
            .iter()
            .any(|kept| kept.overlaps(&candidate) && kept.raw_score() >= candidate.raw_score())
        {
            return Insertion::Rejected(SelectRejection::Overlap);
        }

        let before = self.matches.len();
        self.matches.retain(|kept| !kept.overlaps(&candidate));
        let mut displaced = before - self.matches.len();

        let same_reference = self
            .matches
            .iter()
            .filter(|m| m.reference_id == candidate.reference_id)
            .count();
        if same_reference >= limits.max_per_reference {
            match self.worst(Some(candidate.reference_id)) {
                Some(i) if candidate.is_better_than(&self.matches[i]) => {
                    self.matches.swap_remove(i);
                    displaced += 1;
                }
                _ => return Insertion::Rejected(SelectRejection::ReferenceCap),
            }
        }

        if self.matches.len() >= limits.max_per_query {
            match self.worst(None) {
                Some(i) if candidate.is_better_than(&self.matches[i]) => {
                    self.matches.swap_remove(i);
                    displaced += 1;
                }
                _ => return Insertion::Rejected(SelectRejection::QueryCap),
            }
        }

        self.matches.push(candidate);
        Insertion::Kept { displaced }
    }

    /// Kept matches in output order
    pub fn into_ranked(mut self) -> Vec<Match> {
        self.matches.sort_by(|a, b| a.rank_cmp(b));
        self.matches
    }
}

/// Match sets of all queries, sharded by query id
pub struct MatchStore {
    limits: SelectorLimits,
    shards: StripedLocks<FxHashMap<u32, QueryMatches>>,
}

impl MatchStore {
    pub fn new(limits: SelectorLimits) -> Self {
        Self::with_stripes(limits, DEFAULT_STRIPES)
    }

    pub fn with_stripes(limits: SelectorLimits, stripes: usize) -> Self {
        Self {
            limits,
            shards: StripedLocks::new(stripes),
        }
    }

    pub fn limits(&self) -> &SelectorLimits {
        &self.limits
    }

    pub fn has_room_for(&self, query_id: u32, raw_score: i32) -> bool {
        self.shards
            .read(query_id as usize)
            .get(&query_id)
            .is_none_or(|set| set.has_room_for(raw_score, &self.limits))
    }

    pub fn insert(&self, candidate: Match) -> Insertion {
        let query_id = candidate.query_id;
        let mut shard = self.shards.write(query_id as usize);
        let outcome = shard
            .entry(query_id)
            .or_default()
            .insert(candidate, &self.limits);
        trace!("query {}: {:?}", query_id, outcome);
        outcome
    }

    /// Ranked matches per query, ordered by query id; queries without
    /// matches are absent
    pub fn into_results(self) -> Vec<(u32, Vec<Match>)> {
        let mut results: Vec<(u32, Vec<Match>)> = self
            .shards
            .into_inner()
            .into_iter()
            .flat_map(|shard| shard.into_iter())
            .filter(|(_, set)| !set.is_empty())
            .map(|(id, set)| (id, set.into_ranked()))
            .collect();
        results.sort_unstable_by_key(|(id, _)| *id);
        results
    }
}
