//! Karlin-Altschul parameter tables
//!
//! Values come from NCBI BLAST's blast_stat.c. The tables are keyed by gap
//! existence and extension cost in NCBI's convention, where a gap of length L
//! costs `existence + L * extend`. The engine charges `open + (L - 1) * extend`,
//! so lookups translate with `existence = open - extend`.

use crate::utils::matrix::{MatrixKind, ScoringMatrix};

/// Karlin-Altschul statistical parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KarlinParams {
    /// Lambda parameter for bit score calculation
    pub lambda: f64,
    /// K parameter for E-value calculation
    pub k: f64,
    /// H parameter (relative entropy)
    pub h: f64,
}

impl Default for KarlinParams {
    fn default() -> Self {
        Self {
            lambda: 1.28,
            k: 0.46,
            h: 0.85,
        }
    }
}

/// Entry in the statistical parameter table
/// Format: (gap_existence, gap_extend, lambda, k, h)
#[derive(Debug, Clone, Copy)]
struct ParamEntry {
    gap_existence: i32,
    gap_extend: i32,
    lambda: f64,
    k: f64,
    h: f64,
}

impl ParamEntry {
    const fn new(gap_existence: i32, gap_extend: i32, lambda: f64, k: f64, h: f64) -> Self {
        Self {
            gap_existence,
            gap_extend,
            lambda,
            k,
            h,
        }
    }

    fn to_karlin_params(self) -> KarlinParams {
        KarlinParams {
            lambda: self.lambda,
            k: self.k,
            h: self.h,
        }
    }
}

// ============================================================================
// NUCLEOTIDE PARAMETERS (first entry of each table is ungapped)
// ============================================================================

const BLASTN_1_4: &[ParamEntry] = &[
    ParamEntry::new(0, 0, 1.383, 0.738, 1.36),
    ParamEntry::new(1, 2, 1.36, 0.67, 1.2),
    ParamEntry::new(0, 2, 1.26, 0.43, 0.90),
    ParamEntry::new(2, 1, 1.35, 0.61, 1.1),
    ParamEntry::new(1, 1, 1.22, 0.35, 0.72),
];

const BLASTN_1_3: &[ParamEntry] = &[
    ParamEntry::new(0, 0, 1.374, 0.711, 1.31),
    ParamEntry::new(2, 2, 1.37, 0.70, 1.2),
    ParamEntry::new(1, 2, 1.35, 0.64, 1.1),
    ParamEntry::new(0, 2, 1.25, 0.42, 0.83),
    ParamEntry::new(2, 1, 1.34, 0.60, 1.1),
    ParamEntry::new(1, 1, 1.21, 0.34, 0.71),
];

const BLASTN_2_5: &[ParamEntry] = &[
    ParamEntry::new(0, 0, 0.675, 0.65, 1.1),
    ParamEntry::new(2, 4, 0.67, 0.59, 1.1),
    ParamEntry::new(0, 4, 0.62, 0.39, 0.78),
    ParamEntry::new(4, 2, 0.67, 0.61, 1.0),
    ParamEntry::new(2, 2, 0.56, 0.32, 0.59),
];

const BLASTN_1_2: &[ParamEntry] = &[
    ParamEntry::new(0, 0, 1.28, 0.46, 0.85),
    ParamEntry::new(2, 2, 1.33, 0.62, 1.1),
    ParamEntry::new(1, 2, 1.30, 0.52, 0.93),
    ParamEntry::new(0, 2, 1.19, 0.34, 0.66),
    ParamEntry::new(3, 1, 1.32, 0.57, 1.0),
    ParamEntry::new(2, 1, 1.29, 0.49, 0.92),
    ParamEntry::new(1, 1, 1.14, 0.26, 0.52),
];

const BLASTN_2_3: &[ParamEntry] = &[
    ParamEntry::new(0, 0, 0.55, 0.21, 0.46),
    ParamEntry::new(4, 4, 0.63, 0.42, 0.84),
    ParamEntry::new(2, 4, 0.615, 0.37, 0.72),
    ParamEntry::new(0, 4, 0.55, 0.21, 0.46),
    ParamEntry::new(3, 3, 0.615, 0.37, 0.68),
    ParamEntry::new(6, 2, 0.63, 0.42, 0.84),
    ParamEntry::new(5, 2, 0.625, 0.41, 0.78),
    ParamEntry::new(4, 2, 0.61, 0.35, 0.68),
    ParamEntry::new(2, 2, 0.515, 0.14, 0.33),
];

// No ungapped entry; the first gapped entry doubles as the fallback
const BLASTN_1_1: &[ParamEntry] = &[
    ParamEntry::new(3, 2, 1.09, 0.31, 0.55),
    ParamEntry::new(2, 2, 1.07, 0.27, 0.49),
    ParamEntry::new(1, 2, 1.02, 0.21, 0.36),
    ParamEntry::new(0, 2, 0.80, 0.064, 0.17),
    ParamEntry::new(4, 1, 1.08, 0.28, 0.54),
    ParamEntry::new(3, 1, 1.06, 0.25, 0.46),
    ParamEntry::new(2, 1, 0.99, 0.17, 0.30),
];

// ============================================================================
// PROTEIN PARAMETERS
// ============================================================================

const BLOSUM62: &[ParamEntry] = &[
    ParamEntry::new(i32::MAX, i32::MAX, 0.3176, 0.134, 0.4012),
    ParamEntry::new(11, 2, 0.297, 0.082, 0.27),
    ParamEntry::new(10, 2, 0.291, 0.075, 0.23),
    ParamEntry::new(9, 2, 0.279, 0.058, 0.19),
    ParamEntry::new(8, 2, 0.264, 0.045, 0.15),
    ParamEntry::new(7, 2, 0.239, 0.027, 0.10),
    ParamEntry::new(6, 2, 0.201, 0.012, 0.061),
    ParamEntry::new(13, 1, 0.292, 0.071, 0.23),
    ParamEntry::new(12, 1, 0.283, 0.059, 0.19),
    ParamEntry::new(11, 1, 0.267, 0.041, 0.14),
    ParamEntry::new(10, 1, 0.243, 0.024, 0.10),
    ParamEntry::new(9, 1, 0.206, 0.010, 0.052),
];

fn table_for(matrix: &ScoringMatrix) -> Option<&'static [ParamEntry]> {
    match matrix.kind() {
        MatrixKind::Blosum62 => Some(BLOSUM62),
        MatrixKind::Nucleotide {
            match_score,
            mismatch,
        } => match (match_score, mismatch.abs()) {
            (1, 4) => Some(BLASTN_1_4),
            (1, 3) => Some(BLASTN_1_3),
            (2, 5) => Some(BLASTN_2_5),
            (1, 2) => Some(BLASTN_1_2),
            (2, 3) => Some(BLASTN_2_3),
            (1, 1) => Some(BLASTN_1_1),
            _ => None,
        },
    }
}

/// Look up parameters for a matrix and gap costs (engine convention).
///
/// Returns `None` when neither the gapped entry nor the ungapped fallback
/// exists for this matrix.
pub fn lookup_params(matrix: &ScoringMatrix, gap_open: i32, gap_extend: i32) -> Option<KarlinParams> {
    let table = table_for(matrix)?;
    let existence = gap_open - gap_extend;
    table
        .iter()
        .find(|e| e.gap_existence == existence && e.gap_extend == gap_extend)
        .or_else(|| table.first())
        .map(|e| e.to_karlin_params())
}

/// Ungapped parameters for a matrix (first table entry)
pub fn lookup_ungapped_params(matrix: &ScoringMatrix) -> Option<KarlinParams> {
    table_for(matrix)?.first().map(|e| e.to_karlin_params())
}
