/// Edit operation for traceback
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EditOp {
    /// Match (identical residues)
    Match,
    /// Mismatch (different residues)
    Mismatch,
    /// Insertion in query (query residue against a gap in the reference)
    Ins,
    /// Deletion from query (reference residue against a gap in the query)
    Del,
}

impl EditOp {
    #[inline]
    pub fn consumes_query(self) -> bool {
        !matches!(self, EditOp::Del)
    }

    #[inline]
    pub fn consumes_reference(self) -> bool {
        !matches!(self, EditOp::Ins)
    }

    pub fn is_gap(self) -> bool {
        matches!(self, EditOp::Ins | EditOp::Del)
    }
}

/// Statistics computed from edit script
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditStats {
    pub identities: usize,
    pub mismatches: usize,
    pub gaps: usize,
    pub gap_opens: usize,
    pub length: usize,
}

impl EditStats {
    /// Compute alignment statistics from an edit script; a run of `Ins` or
    /// `Del` counts as one gap opening
    pub fn from_edit_script(edit_script: &[EditOp]) -> Self {
        let mut stats = EditStats {
            length: edit_script.len(),
            ..Default::default()
        };
        let mut prev_op: Option<EditOp> = None;

        for &op in edit_script {
            match op {
                EditOp::Match => stats.identities += 1,
                EditOp::Mismatch => stats.mismatches += 1,
                EditOp::Ins | EditOp::Del => {
                    stats.gaps += 1;
                    if prev_op != Some(op) {
                        stats.gap_opens += 1;
                    }
                }
            }
            prev_op = Some(op);
        }
        stats
    }
}

/// A gapped alignment in frame coordinates (0-based, half-open)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    pub raw_score: i32,
    pub q_start: usize,
    pub q_end: usize,
    pub r_start: usize,
    pub r_end: usize,
    pub stats: EditStats,
    pub edit_script: Vec<EditOp>,
}

impl Alignment {
    pub fn new(raw_score: i32, q_start: usize, r_start: usize, edit_script: Vec<EditOp>) -> Self {
        let q_len = edit_script.iter().filter(|op| op.consumes_query()).count();
        let r_len = edit_script.iter().filter(|op| op.consumes_reference()).count();
        Self {
            raw_score,
            q_start,
            q_end: q_start + q_len,
            r_start,
            r_end: r_start + r_len,
            stats: EditStats::from_edit_script(&edit_script),
            edit_script,
        }
    }

    /// Calculate percent identity
    pub fn identity(&self) -> f64 {
        if self.stats.length == 0 {
            return 0.0;
        }
        100.0 * (self.stats.identities as f64) / (self.stats.length as f64)
    }

    /// Recompute the score of the edit script against the sequences
    pub fn rescore(
        &self,
        query: &[u8],
        reference: &[u8],
        matrix: &crate::utils::matrix::ScoringMatrix,
        gap_open: i32,
        gap_extend: i32,
    ) -> i32 {
        let (mut qi, mut ri) = (self.q_start, self.r_start);
        let mut score = 0;
        let mut prev: Option<EditOp> = None;
        for &op in &self.edit_script {
            match op {
                EditOp::Match | EditOp::Mismatch => {
                    score += matrix.score(query[qi], reference[ri]);
                    qi += 1;
                    ri += 1;
                }
                EditOp::Ins | EditOp::Del => {
                    score -= if prev == Some(op) { gap_extend } else { gap_open };
                    if op == EditOp::Ins {
                        qi += 1;
                    } else {
                        ri += 1;
                    }
                }
            }
            prev = Some(op);
        }
        score
    }
}
