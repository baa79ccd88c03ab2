use super::leftmost::LeftmostCheck;
use super::ungapped::{extend_ungapped, UngappedHit};
use crate::seed::{ReferenceMasks, SeedShape};
use crate::sequence::Reduction;
use crate::utils::matrix::ScoringMatrix;

/// Thresholds applied to each seed hit before dynamic programming
#[derive(Debug, Clone, Copy)]
pub struct FilterParams {
    pub min_seed_identities: usize,
    pub x_drop: i32,
    pub min_ungapped_score: i32,
}

/// Why a seed hit was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    SeedIdentity,
    NotLeftmost,
    UngappedScore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOutcome {
    Passed(UngappedHit),
    Rejected(Rejection),
}

/// Identity gate, leftmost-seed check and ungapped X-drop, in that order
pub struct ExtensionFilter<'a> {
    leftmost: LeftmostCheck<'a>,
    matrix: &'a ScoringMatrix,
    params: FilterParams,
}

impl<'a> ExtensionFilter<'a> {
    pub fn new(
        shapes: &'a [SeedShape],
        reduction: &'a Reduction,
        masks: Option<&'a ReferenceMasks>,
        matrix: &'a ScoringMatrix,
        params: FilterParams,
    ) -> Self {
        Self {
            leftmost: LeftmostCheck {
                shapes,
                reduction,
                masks,
                min_seed_identities: params.min_seed_identities,
            },
            matrix,
            params,
        }
    }

    pub fn params(&self) -> &FilterParams {
        &self.params
    }

    pub fn evaluate(
        &self,
        shape: &SeedShape,
        query: &[u8],
        q_pos: usize,
        reference: &[u8],
        reference_id: u32,
        r_pos: usize,
    ) -> FilterOutcome {
        if self.params.min_seed_identities > 0
            && shape.identities(query, q_pos, reference, r_pos) < self.params.min_seed_identities
        {
            return FilterOutcome::Rejected(Rejection::SeedIdentity);
        }
        if !self
            .leftmost
            .is_leftmost(shape, query, q_pos, reference, reference_id, r_pos)
        {
            return FilterOutcome::Rejected(Rejection::NotLeftmost);
        }
        let hit = extend_ungapped(
            query,
            reference,
            q_pos,
            r_pos,
            shape.length(),
            self.matrix,
            self.params.x_drop,
        );
        if hit.score < self.params.min_ungapped_score {
            return FilterOutcome::Rejected(Rejection::UngappedScore);
        }
        FilterOutcome::Passed(hit)
    }
}
