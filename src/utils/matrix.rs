//! Substitution matrices over the residue codes of `sequence::alphabet`
//!
//! Scores are held in a dense 32x32 table indexed by residue code so that the
//! aligner's inner loops are a single lookup. Code 0 (padding) scores like
//! the most negative substitution.

use crate::error::{Result, SaltError};

/// Size of BLOSUM62 matrix (25x25)
const BLOSUM62_SIZE: usize = 25;

/// Default score for padding / sentinel residues
pub const DEFSCORE: i32 = -4;

/// BLOSUM62 in NCBI packed order: ARNDCQEGHILKMFPSTWYVBJZX*
static BLOSUM62: [i8; BLOSUM62_SIZE * BLOSUM62_SIZE] = [
    //       A,  R,  N,  D,  C,  Q,  E,  G,  H,  I,  L,  K,  M,  F,  P,  S,  T,  W,  Y,  V,  B,  J,  Z,  X,  *
    /*A*/    4, -1, -2, -2,  0, -1, -1,  0, -2, -1, -1, -1, -1, -2, -1,  1,  0, -3, -2,  0, -2, -1, -1, -1, -4,
    /*R*/   -1,  5,  0, -2, -3,  1,  0, -2,  0, -3, -2,  2, -1, -3, -2, -1, -1, -3, -2, -3, -1, -2,  0, -1, -4,
    /*N*/   -2,  0,  6,  1, -3,  0,  0,  0,  1, -3, -3,  0, -2, -3, -2,  1,  0, -4, -2, -3,  4, -3,  0, -1, -4,
    /*D*/   -2, -2,  1,  6, -3,  0,  2, -1, -1, -3, -4, -1, -3, -3, -1,  0, -1, -4, -3, -3,  4, -3,  1, -1, -4,
    /*C*/    0, -3, -3, -3,  9, -3, -4, -3, -3, -1, -1, -3, -1, -2, -3, -1, -1, -2, -2, -1, -3, -1, -3, -1, -4,
    /*Q*/   -1,  1,  0,  0, -3,  5,  2, -2,  0, -3, -2,  1,  0, -3, -1,  0, -1, -2, -1, -2,  0, -2,  4, -1, -4,
    /*E*/   -1,  0,  0,  2, -4,  2,  5, -2,  0, -3, -3,  1, -2, -3, -1,  0, -1, -3, -2, -2,  1, -3,  4, -1, -4,
    /*G*/    0, -2,  0, -1, -3, -2, -2,  6, -2, -4, -4, -2, -3, -3, -2,  0, -2, -2, -3, -3, -1, -4, -2, -1, -4,
    /*H*/   -2,  0,  1, -1, -3,  0,  0, -2,  8, -3, -3, -1, -2, -1, -2, -1, -2, -2,  2, -3,  0, -3,  0, -1, -4,
    /*I*/   -1, -3, -3, -3, -1, -3, -3, -4, -3,  4,  2, -3,  1,  0, -3, -2, -1, -3, -1,  3, -3,  3, -3, -1, -4,
    /*L*/   -1, -2, -3, -4, -1, -2, -3, -4, -3,  2,  4, -2,  2,  0, -3, -2, -1, -2, -1,  1, -4,  3, -3, -1, -4,
    /*K*/   -1,  2,  0, -1, -3,  1,  1, -2, -1, -3, -2,  5, -1, -3, -1,  0, -1, -3, -2, -2,  0, -3,  1, -1, -4,
    /*M*/   -1, -1, -2, -3, -1,  0, -2, -3, -2,  1,  2, -1,  5,  0, -2, -1, -1, -1, -1,  1, -3,  2, -1, -1, -4,
    /*F*/   -2, -3, -3, -3, -2, -3, -3, -3, -1,  0,  0, -3,  0,  6, -4, -2, -2,  1,  3, -1, -3,  0, -3, -1, -4,
    /*P*/   -1, -2, -2, -1, -3, -1, -1, -2, -2, -3, -3, -1, -2, -4,  7, -1, -1, -4, -3, -2, -2, -3, -1, -1, -4,
    /*S*/    1, -1,  1,  0, -1,  0,  0,  0, -1, -2, -2,  0, -1, -2, -1,  4,  1, -3, -2, -2,  0, -2,  0, -1, -4,
    /*T*/    0, -1,  0, -1, -1, -1, -1, -2, -2, -1, -1, -1, -1, -2, -1,  1,  5, -2, -2,  0, -1, -1, -1, -1, -4,
    /*W*/   -3, -3, -4, -4, -2, -2, -3, -2, -2, -3, -2, -3, -1,  1, -4, -3, -2, 11,  2, -3, -4, -2, -2, -1, -4,
    /*Y*/   -2, -2, -2, -3, -2, -1, -2, -3,  2, -1, -1, -2, -1,  3, -3, -2, -2,  2,  7, -1, -3, -1, -2, -1, -4,
    /*V*/    0, -3, -3, -3, -1, -2, -2, -3, -3,  3,  1, -2,  1, -1, -2, -2,  0, -3, -1,  4, -3,  2, -2, -1, -4,
    /*B*/   -2, -1,  4,  4, -3,  0,  1, -1,  0, -3, -4,  0, -3, -3, -2,  0, -1, -4, -3, -3,  4, -3,  0, -1, -4,
    /*J*/   -1, -2, -3, -3, -1, -2, -3, -4, -3,  3,  3, -3,  2,  0, -3, -2, -1, -2, -1,  2, -3,  3, -3, -1, -4,
    /*Z*/   -1,  0,  0,  1, -3,  4,  4, -2,  0, -3, -3,  1, -1, -3, -1,  0, -1, -2, -2, -2,  0, -3,  4, -1, -4,
    /*X*/   -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -4,
    /***/   -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4,  1,
];

/// BLOSUM62 row/column for a protein residue code (A=1 .. V=20, X=21, *=22)
#[inline]
fn blosum62_index(code: u8) -> Option<usize> {
    match code {
        1..=20 => Some(code as usize - 1),
        21 => Some(23),
        22 => Some(24),
        _ => None,
    }
}

/// Which scoring scheme a matrix was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixKind {
    Nucleotide { match_score: i32, mismatch: i32 },
    Blosum62,
}

/// Dense substitution matrix
#[derive(Debug, Clone)]
pub struct ScoringMatrix {
    kind: MatrixKind,
    scores: Box<[[i32; 32]; 32]>,
}

impl ScoringMatrix {
    /// Match/mismatch scoring over A, C, G, T; N always scores as a mismatch
    pub fn nucleotide(match_score: i32, mismatch: i32) -> Self {
        let mut scores = Box::new([[mismatch; 32]; 32]);
        for code in 1..=4 {
            scores[code][code] = match_score;
        }
        Self {
            kind: MatrixKind::Nucleotide {
                match_score,
                mismatch,
            },
            scores,
        }
    }

    pub fn blosum62() -> Self {
        let mut scores = Box::new([[DEFSCORE; 32]; 32]);
        for a in 0..32u8 {
            for b in 0..32u8 {
                if let (Some(i), Some(j)) = (blosum62_index(a), blosum62_index(b)) {
                    scores[a as usize][b as usize] = BLOSUM62[i * BLOSUM62_SIZE + j] as i32;
                }
            }
        }
        Self {
            kind: MatrixKind::Blosum62,
            scores,
        }
    }

    pub fn by_name(name: &str) -> Result<Self> {
        match name.to_ascii_uppercase().as_str() {
            "BLOSUM62" => Ok(Self::blosum62()),
            _ => Err(SaltError::invalid_parameter(
                "matrix",
                format!("unsupported substitution matrix '{}'", name),
            )),
        }
    }

    pub fn kind(&self) -> MatrixKind {
        self.kind
    }

    pub fn name(&self) -> String {
        match self.kind {
            MatrixKind::Nucleotide {
                match_score,
                mismatch,
            } => format!("nucleotide {}/{}", match_score, mismatch),
            MatrixKind::Blosum62 => "BLOSUM62".to_string(),
        }
    }

    #[inline(always)]
    pub fn score(&self, a: u8, b: u8) -> i32 {
        self.scores[(a & 31) as usize][(b & 31) as usize]
    }

    /// Sum of substitution scores along an ungapped diagonal
    pub fn diagonal_score(&self, query: &[u8], reference: &[u8]) -> i32 {
        query
            .iter()
            .zip(reference)
            .map(|(&a, &b)| self.score(a, b))
            .sum()
    }
}
