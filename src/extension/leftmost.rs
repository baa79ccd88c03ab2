//! Leftmost-seed deduplication
//!
//! Overlapping seed hits on one diagonal, from any shape, would otherwise each
//! trigger an alignment of the same region. A hit is only extended when no
//! other indexed seed hit lies to its left within its own window span. Hits
//! starting at the same position are resolved by shape order.

use crate::seed::{ReferenceMasks, SeedShape};
use crate::sequence::Reduction;

/// Everything needed to decide whether another shape also hits a position
pub struct LeftmostCheck<'a> {
    pub shapes: &'a [SeedShape],
    pub reduction: &'a Reduction,
    pub masks: Option<&'a ReferenceMasks>,
    pub min_seed_identities: usize,
}

impl LeftmostCheck<'_> {
    /// Would `shape` produce an indexed, gate-passing seed hit at `(q, r)`?
    fn hits(
        &self,
        shape: &SeedShape,
        query: &[u8],
        q: usize,
        reference: &[u8],
        reference_id: u32,
        r: usize,
    ) -> bool {
        let Some(q_code) = shape.good_seed_at(self.reduction, query, q) else {
            return false;
        };
        if shape.seed_code(self.reduction, reference, r) != Some(q_code) {
            return false;
        }
        if self
            .masks
            .is_some_and(|m| m.is_masked(reference_id, shape.id(), r))
        {
            return false;
        }
        self.min_seed_identities == 0
            || shape.identities(query, q, reference, r) >= self.min_seed_identities
    }

    /// True when the hit of `shape` at `(q_pos, r_pos)` is the leftmost one
    pub fn is_leftmost(
        &self,
        shape: &SeedShape,
        query: &[u8],
        q_pos: usize,
        reference: &[u8],
        reference_id: u32,
        r_pos: usize,
    ) -> bool {
        let max_shift = shape.length().saturating_sub(1).min(q_pos).min(r_pos);
        for other in self.shapes {
            // same start: earlier shapes win
            if other.id() < shape.id()
                && self.hits(other, query, q_pos, reference, reference_id, r_pos)
            {
                return false;
            }
            for k in 1..=max_shift {
                if self.hits(other, query, q_pos - k, reference, reference_id, r_pos - k) {
                    return false;
                }
            }
        }
        true
    }
}
