use log::warn;

use super::tables::{lookup_params, KarlinParams};
use crate::utils::matrix::ScoringMatrix;

/// Calculate bit score from raw score using Karlin-Altschul statistics
///
/// Formula: S' = (lambda * S - ln(K)) / ln(2)
pub fn bit_score(raw_score: i32, params: &KarlinParams) -> f64 {
    (params.lambda * (raw_score as f64) - params.k.ln()) / std::f64::consts::LN_2
}

/// Calculate E-value from bit score and search space
///
/// Formula: E = m * n * 2^(-S')
pub fn evalue(bit_score: f64, search_space: f64) -> f64 {
    search_space * 2.0_f64.powf(-bit_score)
}

/// Calculate raw score from bit score (inverse calculation, rounded down)
///
/// Formula: S = (S' * ln(2) + ln(K)) / lambda
pub fn raw_score_for_bit_score(bit_score: f64, params: &KarlinParams) -> i32 {
    let score = (bit_score * std::f64::consts::LN_2 + params.k.ln()) / params.lambda;
    if score >= i32::MAX as f64 {
        i32::MAX
    } else {
        score.floor() as i32
    }
}

/// Per-run significance model: Karlin-Altschul parameters plus the total
/// reference length used as the database size
#[derive(Debug, Clone, Copy)]
pub struct SearchStatistics {
    params: KarlinParams,
    database_length: u64,
    min_bit_score: f64,
    max_expected: f64,
}

impl SearchStatistics {
    pub fn new(
        params: KarlinParams,
        database_length: u64,
        min_bit_score: f64,
        max_expected: f64,
    ) -> Self {
        Self {
            params,
            database_length: database_length.max(1),
            min_bit_score,
            max_expected,
        }
    }

    /// Parameters for a scoring scheme, falling back to defaults when the
    /// combination is not tabulated
    pub fn params_for(matrix: &ScoringMatrix, gap_open: i32, gap_extend: i32) -> KarlinParams {
        lookup_params(matrix, gap_open, gap_extend).unwrap_or_else(|| {
            warn!(
                "No Karlin-Altschul parameters for {} with gap costs {}/{}; using defaults",
                matrix.name(),
                gap_open,
                gap_extend
            );
            KarlinParams::default()
        })
    }

    pub fn params(&self) -> &KarlinParams {
        &self.params
    }

    pub fn database_length(&self) -> u64 {
        self.database_length
    }

    pub fn bit_score(&self, raw_score: i32) -> f64 {
        bit_score(raw_score, &self.params)
    }

    pub fn expected(&self, bit_score: f64, query_length: usize) -> f64 {
        evalue(bit_score, self.database_length as f64 * query_length.max(1) as f64)
    }

    pub fn raw_score_for_bit_score(&self, bit_score: f64) -> i32 {
        raw_score_for_bit_score(bit_score, &self.params)
    }

    /// Smallest bit score that satisfies both the bit-score floor and the
    /// E-value ceiling for a query of this length
    pub fn min_bit_score_for(&self, query_length: usize) -> f64 {
        if self.max_expected <= 0.0 {
            return f64::INFINITY;
        }
        let space = self.database_length as f64 * query_length.max(1) as f64;
        let from_expected = (space / self.max_expected).log2();
        self.min_bit_score.max(from_expected)
    }

    /// Integer raw-score cutoff for the hot path. Scores below it can never
    /// pass `accepts`; scores at or above it still need the exact check.
    pub fn raw_cutoff(&self, query_length: usize) -> i32 {
        let bits = self.min_bit_score_for(query_length);
        if bits.is_infinite() {
            i32::MAX
        } else {
            self.raw_score_for_bit_score(bits).max(1)
        }
    }

    /// Exact significance test; returns (bit score, expected) when it passes
    pub fn accepts(&self, raw_score: i32, query_length: usize) -> Option<(f64, f64)> {
        let bits = self.bit_score(raw_score);
        let expected = self.expected(bits, query_length);
        (bits >= self.min_bit_score && expected <= self.max_expected).then_some((bits, expected))
    }
}
