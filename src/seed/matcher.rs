//! Merge-join of sorted query and reference seed buckets

use super::index::SeedEntry;
use crate::error::Result;

/// Counts reported by one merge-join
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinStats {
    /// Pairs handed to the callback
    pub pairs: usize,
    /// Shared seed codes whose reference run was truncated by the cap
    pub capped_codes: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct SeedMatcher {
    max_occurrences: usize,
}

impl SeedMatcher {
    /// `max_occurrences` bounds how many reference entries are paired with
    /// each query entry of a shared code
    pub fn new(max_occurrences: usize) -> Self {
        Self {
            max_occurrences: max_occurrences.max(1),
        }
    }

    pub fn max_occurrences(&self) -> usize {
        self.max_occurrences
    }

    /// Enumerate every `(query, reference)` pair sharing a seed code.
    ///
    /// Both slices must be sorted by code. For each shared code only the
    /// first `max_occurrences` reference entries of the run are used, in
    /// sorted order. The first error returned by `on_pair` stops the join.
    pub fn for_each_pair<F>(
        &self,
        query: &[SeedEntry],
        reference: &[SeedEntry],
        mut on_pair: F,
    ) -> Result<JoinStats>
    where
        F: FnMut(&SeedEntry, &SeedEntry) -> Result<()>,
    {
        let mut stats = JoinStats::default();
        let (mut qi, mut ri) = (0, 0);

        while qi < query.len() && ri < reference.len() {
            let q_code = query[qi].code;
            let r_code = reference[ri].code;
            if q_code < r_code {
                qi += 1;
            } else if q_code > r_code {
                ri += 1;
            } else {
                let q_end = run_end(query, qi);
                let r_end = run_end(reference, ri);
                let r_take = (r_end - ri).min(self.max_occurrences);
                if r_end - ri > r_take {
                    stats.capped_codes += 1;
                }
                for q in &query[qi..q_end] {
                    for r in &reference[ri..ri + r_take] {
                        on_pair(q, r)?;
                        stats.pairs += 1;
                    }
                }
                qi = q_end;
                ri = r_end;
            }
        }
        Ok(stats)
    }
}

/// End (exclusive) of the run of equal codes starting at `start`
#[inline]
fn run_end(entries: &[SeedEntry], start: usize) -> usize {
    let code = entries[start].code;
    start + entries[start..].iter().take_while(|e| e.code == code).count()
}
