//! Scored matches handed to the selector and the writers

use std::cmp::Ordering;
use std::sync::OnceLock;

use super::result::{Alignment, EditOp};
use crate::sequence::Alphabet;
use crate::utils::matrix::ScoringMatrix;

/// The three printable tracks of an alignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentText {
    pub query: String,
    pub midline: String,
    pub reference: String,
}

impl AlignmentText {
    /// Render an edit script over residue codes. The midline shows `|` for
    /// identical nucleotides, the residue itself for identical amino acids,
    /// `+` for positive protein substitutions and a blank otherwise.
    pub fn render(
        alignment: &Alignment,
        query: &[u8],
        reference: &[u8],
        alphabet: &Alphabet,
        matrix: &ScoringMatrix,
    ) -> Self {
        let protein = alphabet.sequence_type() == crate::sequence::SequenceType::Protein;
        let n = alignment.edit_script.len();
        let mut q_track = String::with_capacity(n);
        let mut m_track = String::with_capacity(n);
        let mut r_track = String::with_capacity(n);
        let (mut qi, mut ri) = (alignment.q_start, alignment.r_start);

        for &op in &alignment.edit_script {
            match op {
                EditOp::Match | EditOp::Mismatch => {
                    let (a, b) = (query[qi], reference[ri]);
                    let letter = alphabet.decode_residue(a) as char;
                    q_track.push(letter);
                    r_track.push(alphabet.decode_residue(b) as char);
                    m_track.push(match (op, protein) {
                        (EditOp::Match, false) => '|',
                        (EditOp::Match, true) => letter,
                        _ if protein && matrix.score(a, b) > 0 => '+',
                        _ => ' ',
                    });
                    qi += 1;
                    ri += 1;
                }
                EditOp::Ins => {
                    q_track.push(alphabet.decode_residue(query[qi]) as char);
                    m_track.push(' ');
                    r_track.push('-');
                    qi += 1;
                }
                EditOp::Del => {
                    q_track.push('-');
                    m_track.push(' ');
                    r_track.push(alphabet.decode_residue(reference[ri]) as char);
                    ri += 1;
                }
            }
        }

        Self {
            query: q_track,
            midline: m_track,
            reference: r_track,
        }
    }
}

/// One retained alignment of a query frame against a reference sequence.
///
/// Coordinates in `alignment` are 0-based half-open positions in the searched
/// frame. `query_range` holds the 1-based inclusive coordinates on the
/// original (untranslated, forward strand) query; reverse-strand matches have
/// start > end.
#[derive(Debug, Clone)]
pub struct Match {
    pub query_id: u32,
    pub frame_rank: u8,
    pub reference_id: u32,
    pub bit_score: f64,
    pub expected: f64,
    pub alignment: Alignment,
    pub query_range: (usize, usize),
    text: OnceLock<AlignmentText>,
}

impl Match {
    pub fn new(
        query_id: u32,
        frame_rank: u8,
        reference_id: u32,
        bit_score: f64,
        expected: f64,
        alignment: Alignment,
        query_range: (usize, usize),
    ) -> Self {
        Self {
            query_id,
            frame_rank,
            reference_id,
            bit_score,
            expected,
            alignment,
            query_range,
            text: OnceLock::new(),
        }
    }

    #[inline]
    pub fn raw_score(&self) -> i32 {
        self.alignment.raw_score
    }

    /// 1-based inclusive reference coordinates
    pub fn reference_range(&self) -> (usize, usize) {
        (self.alignment.r_start + 1, self.alignment.r_end)
    }

    pub fn percent_identity(&self) -> f64 {
        self.alignment.identity()
    }

    /// Alignment text, rendered on first request. `query` must be the
    /// residues of this match's frame and `reference` the reference residues.
    pub fn text(
        &self,
        query: &[u8],
        reference: &[u8],
        alphabet: &Alphabet,
        matrix: &ScoringMatrix,
    ) -> &AlignmentText {
        self.text
            .get_or_init(|| AlignmentText::render(&self.alignment, query, reference, alphabet, matrix))
    }

    pub fn has_text(&self) -> bool {
        self.text.get().is_some()
    }

    /// Do both matches cover a common reference position of the same
    /// reference sequence?
    pub fn overlaps(&self, other: &Match) -> bool {
        self.reference_id == other.reference_id
            && self.alignment.r_start < other.alignment.r_end
            && other.alignment.r_start < self.alignment.r_end
    }

    /// Output order: higher score first, then reference id, then position and
    /// transcript so that the order never depends on discovery order.
    pub fn rank_cmp(&self, other: &Match) -> Ordering {
        other
            .raw_score()
            .cmp(&self.raw_score())
            .then_with(|| other.bit_score.total_cmp(&self.bit_score))
            .then_with(|| self.reference_id.cmp(&other.reference_id))
            .then_with(|| self.alignment.r_start.cmp(&other.alignment.r_start))
            .then_with(|| self.alignment.q_start.cmp(&other.alignment.q_start))
            .then_with(|| self.frame_rank.cmp(&other.frame_rank))
            .then_with(|| self.alignment.edit_script.cmp(&other.alignment.edit_script))
    }

    /// Strictly better in the ranking sense: `self` sorts before `other`
    pub fn is_better_than(&self, other: &Match) -> bool {
        self.rank_cmp(other) == Ordering::Less
    }
}
