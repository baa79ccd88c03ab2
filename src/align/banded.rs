//! Anchored banded affine-gap alignment
//!
//! A seed hit fixes one aligned diagonal segment. The alignment is scored in
//! two independent passes around it: the left pass runs forward from the start
//! of the sequences up to the first seed column, the right pass runs backward
//! from the ends down to the last seed column. The residues strictly inside
//! the seed are taken as aligned without gaps.
//!
//! Geometry (shared by both passes): column `col` holds query position
//! `col - 1`; a column has `2 * band + 3` rows, each a diagonal, and
//!
//! ```text
//! ref_index(col, row) = row + col + ref_offset
//! ref_offset          = r_pos - q_pos - band - 2
//! ```
//!
//! so row `band + 1` is the seed diagonal. Rows 0 and `2 * band + 2` only act
//! as out-of-band borders.

use crate::utils::matrix::ScoringMatrix;

pub(super) const NEG_INF: i32 = i32::MIN / 4;

/// How alignment ends are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentMode {
    /// Paths may start and end anywhere; cells floor at 0, so negative
    /// flanks and negative seed edge columns are dropped
    Local,
    /// Paths run to a sequence edge on both sides; overhangs are free
    SemiGlobal,
}

#[derive(Debug, Clone, Copy)]
pub struct AlignerParams {
    pub band: usize,
    pub gap_open: i32,
    pub gap_extend: i32,
    pub mode: AlignmentMode,
}

/// Seed hit to anchor an alignment on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedAnchor {
    pub q_pos: usize,
    pub r_pos: usize,
    pub length: usize,
}

impl SeedAnchor {
    pub fn new(q_pos: usize, r_pos: usize, length: usize) -> Self {
        Self {
            q_pos,
            r_pos,
            length,
        }
    }

    /// Query position of the last seed residue
    pub(super) fn q_last(&self) -> usize {
        self.q_pos + self.length - 1
    }
}

/// Cell states; the discriminant is the state's slot in a score triple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum State {
    /// Residue against residue
    M = 0,
    /// Reference residue against a gap in the query
    IRef = 1,
    /// Query residue against a gap in the reference
    IQuery = 2,
    /// Path starts (left pass) or ends (right pass) here
    Done = 3,
}

impl State {
    fn from_bits(bits: u8) -> Self {
        match bits & 3 {
            0 => State::M,
            1 => State::IRef,
            2 => State::IQuery,
            _ => State::Done,
        }
    }
}

/// Scores of the neighbour a recurrence reads from
#[derive(Debug, Clone, Copy)]
struct Prev {
    scores: [i32; 3],
    edge: bool,
}

const INVALID: Prev = Prev {
    scores: [NEG_INF; 3],
    edge: false,
};

/// True sequence edge: a free start for `M`, unusable for gaps
const EDGE: Prev = Prev {
    scores: [0, NEG_INF, NEG_INF],
    edge: true,
};

/// Which way a pass runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Direction {
    Left,
    Right,
}

/// Score triples and packed predecessors for the columns of one pass
#[derive(Debug, Default)]
pub(super) struct BandMatrix {
    rows: usize,
    first_col: usize,
    cols: usize,
    scores: Vec<[i32; 3]>,
    preds: Vec<u8>,
}

impl BandMatrix {
    fn reset(&mut self, rows: usize, first_col: usize, cols: usize) {
        self.rows = rows;
        self.first_col = first_col;
        self.cols = cols;
        self.scores.clear();
        self.scores.resize(rows * cols, [NEG_INF; 3]);
        self.preds.clear();
        self.preds.resize(rows * cols, 0xff);
    }

    #[inline]
    fn index(&self, col: usize, row: usize) -> usize {
        (col - self.first_col) * self.rows + row
    }

    #[inline]
    fn has_col(&self, col: usize) -> bool {
        col >= self.first_col && col < self.first_col + self.cols
    }

    #[inline]
    pub(super) fn scores(&self, col: usize, row: usize) -> [i32; 3] {
        self.scores[self.index(col, row)]
    }

    /// Predecessor state recorded for `state` at a cell
    #[inline]
    pub(super) fn pred(&self, col: usize, row: usize, state: State) -> State {
        let packed = self.preds[self.index(col, row)];
        State::from_bits(packed >> (2 * state as u8))
    }
}

/// Cell geometry of one alignment
#[derive(Debug, Clone, Copy)]
pub(super) struct Geometry {
    pub band: usize,
    pub rows: usize,
    pub ref_offset: isize,
    pub query_len: usize,
    pub ref_len: usize,
}

impl Geometry {
    fn new(band: usize, anchor: &SeedAnchor, query_len: usize, ref_len: usize) -> Self {
        Self {
            band,
            rows: 2 * band + 3,
            ref_offset: anchor.r_pos as isize - anchor.q_pos as isize - band as isize - 2,
            query_len,
            ref_len,
        }
    }

    #[inline]
    pub(super) fn ref_index(&self, col: usize, row: usize) -> isize {
        row as isize + col as isize + self.ref_offset
    }

    #[inline]
    fn in_band(&self, row: isize) -> bool {
        row >= 1 && row <= 2 * self.band as isize + 1
    }

    /// Row of the seed diagonal
    #[inline]
    pub(super) fn anchor_row(&self) -> usize {
        self.band + 1
    }
}

/// Best state of a triple; ties prefer M, then IQuery, then IRef
#[inline]
pub(super) fn best_state(scores: [i32; 3]) -> (i32, State) {
    let mut best = (scores[State::M as usize], State::M);
    if scores[State::IQuery as usize] > best.0 {
        best = (scores[State::IQuery as usize], State::IQuery);
    }
    if scores[State::IRef as usize] > best.0 {
        best = (scores[State::IRef as usize], State::IRef);
    }
    best
}

/// Reusable banded aligner; one per worker
pub struct BandedAligner<'a> {
    pub(super) matrix: &'a ScoringMatrix,
    pub(super) params: AlignerParams,
    pub(super) left: BandMatrix,
    pub(super) right: BandMatrix,
    pub(super) last: Option<ScoredAnchor>,
}

/// Outcome of the last `compute_score`, kept for traceback
#[derive(Debug, Clone, Copy)]
pub(super) struct ScoredAnchor {
    pub anchor: SeedAnchor,
    pub geometry: Geometry,
    pub score: i32,
}

impl<'a> BandedAligner<'a> {
    pub fn new(matrix: &'a ScoringMatrix, params: AlignerParams) -> Self {
        Self {
            matrix,
            params,
            left: BandMatrix::default(),
            right: BandMatrix::default(),
            last: None,
        }
    }

    pub fn params(&self) -> &AlignerParams {
        &self.params
    }

    /// Score the best banded alignment through `anchor`.
    ///
    /// Returns `None` (no alignment) when the seed window does not fit both
    /// sequences, when the seed interior scores non-positive, or when the
    /// total is non-positive. On success the matrices are kept so that
    /// `traceback` can reconstruct the alignment.
    pub fn compute_score(&mut self, query: &[u8], reference: &[u8], anchor: SeedAnchor) -> Option<i32> {
        self.last = None;
        if anchor.length < 2
            || anchor.q_pos + anchor.length > query.len()
            || anchor.r_pos + anchor.length > reference.len()
        {
            return None;
        }

        let interior: i32 = (1..anchor.length - 1)
            .map(|k| self.matrix.score(query[anchor.q_pos + k], reference[anchor.r_pos + k]))
            .sum();
        if interior <= 0 {
            return None;
        }

        let geometry = Geometry::new(self.params.band, &anchor, query.len(), reference.len());
        let left = self.fill(Direction::Left, &geometry, query, reference, &anchor);
        let right = self.fill(Direction::Right, &geometry, query, reference, &anchor);
        if left <= NEG_INF / 2 || right <= NEG_INF / 2 {
            return None;
        }

        let score = interior + left + right;
        if score <= 0 {
            return None;
        }
        self.last = Some(ScoredAnchor {
            anchor,
            geometry,
            score,
        });
        Some(score)
    }

    /// Fill one pass and return the best score at its anchor column
    fn fill(
        &mut self,
        direction: Direction,
        g: &Geometry,
        query: &[u8],
        reference: &[u8],
        anchor: &SeedAnchor,
    ) -> i32 {
        let local = self.params.mode == AlignmentMode::Local;
        let open = self.params.gap_open;
        let extend = self.params.gap_extend;
        let matrix = self.matrix;
        let rows = g.rows;

        let (target, anchor_col) = match direction {
            Direction::Left => {
                let anchor_col = anchor.q_pos + 1;
                self.left.reset(rows, 1, anchor_col);
                (&mut self.left, anchor_col)
            }
            Direction::Right => {
                let anchor_col = anchor.q_last() + 1;
                self.right.reset(rows, anchor_col, g.query_len + 1 - anchor_col);
                (&mut self.right, anchor_col)
            }
        };

        let cols: Vec<usize> = match direction {
            Direction::Left => (1..=anchor_col).collect(),
            Direction::Right => (anchor_col..=g.query_len).rev().collect(),
        };

        for col in cols {
            let i = col - 1;
            for step in 1..=2 * g.band + 1 {
                // IRef reads the neighbouring row of the same column, so the
                // row order follows the pass direction
                let row = match direction {
                    Direction::Left => step,
                    Direction::Right => 2 * g.band + 2 - step,
                };
                let j = g.ref_index(col, row);
                if j < 0 || j as usize >= g.ref_len {
                    continue;
                }
                let j = j as usize;

                let (diag, gap_q, gap_r) = match direction {
                    Direction::Left => (
                        neighbour(target, g, direction, col as isize - 1, row as isize),
                        neighbour(target, g, direction, col as isize - 1, row as isize + 1),
                        neighbour(target, g, direction, col as isize, row as isize - 1),
                    ),
                    Direction::Right => (
                        neighbour(target, g, direction, col as isize + 1, row as isize),
                        neighbour(target, g, direction, col as isize + 1, row as isize - 1),
                        neighbour(target, g, direction, col as isize, row as isize + 1),
                    ),
                };

                let s = matrix.score(query[i], reference[j]);
                let (cell, packed) = recur(diag, gap_q, gap_r, s, open, extend, local);
                let idx = target.index(col, row);
                target.scores[idx] = cell;
                target.preds[idx] = packed;
            }
        }

        let best = best_state(target.scores(anchor_col, g.anchor_row())).0;
        if local {
            best.max(0)
        } else {
            best
        }
    }
}

/// Scores of the cell a recurrence reads, with edges and borders resolved
#[inline]
fn neighbour(m: &BandMatrix, g: &Geometry, direction: Direction, col: isize, row: isize) -> Prev {
    if !g.in_band(row) || col < 0 {
        return INVALID;
    }
    let j = row + col + g.ref_offset;
    let (col_edge, ref_edge) = match direction {
        Direction::Left => (col == 0, j == -1),
        Direction::Right => (col as usize == g.query_len + 1, j == g.ref_len as isize),
    };
    if col_edge || ref_edge {
        return EDGE;
    }
    if j < 0 || j >= g.ref_len as isize || !m.has_col(col as usize) {
        return INVALID;
    }
    Prev {
        scores: m.scores(col as usize, row as usize),
        edge: false,
    }
}

/// Gotoh recurrences for one cell. Returns the score triple and the packed
/// predecessor states (two bits per state).
#[inline]
fn recur(
    diag: Prev,
    gap_q: Prev,
    gap_r: Prev,
    s: i32,
    open: i32,
    extend: i32,
    local: bool,
) -> ([i32; 3], u8) {
    // M
    let (m, m_pred) = if diag.edge {
        (s, State::Done)
    } else {
        let (best, state) = best_state(diag.scores);
        if best <= NEG_INF / 2 {
            (NEG_INF, State::Done)
        } else if local && best <= 0 {
            (s, State::Done)
        } else {
            (s + best, state)
        }
    };
    // local cells floor at 0: an empty path, the residue pair is not aligned
    let (m, m_pred) = if local && m > NEG_INF / 2 && m <= 0 {
        (0, State::Done)
    } else {
        (m, m_pred)
    };

    // IQuery: the gap continues from the previous query column
    let (iq, iq_pred) = gap_score(gap_q, State::IQuery, State::IRef, open, extend);
    // IRef: the gap continues from the previous reference row
    let (ir, ir_pred) = gap_score(gap_r, State::IRef, State::IQuery, open, extend);

    let packed = (m_pred as u8) | ((ir_pred as u8) << 2) | ((iq_pred as u8) << 4);
    ([m, ir, iq], packed)
}

#[inline]
fn gap_score(prev: Prev, same: State, other: State, open: i32, extend: i32) -> (i32, State) {
    if prev.edge {
        return (NEG_INF, State::Done);
    }
    let mut best = (prev.scores[State::M as usize] - open, State::M);
    let extended = prev.scores[same as usize] - extend;
    if extended > best.0 {
        best = (extended, same);
    }
    let switched = prev.scores[other as usize] - open;
    if switched > best.0 {
        best = (switched, other);
    }
    if best.0 <= NEG_INF / 2 {
        (NEG_INF, State::Done)
    } else {
        best
    }
}
