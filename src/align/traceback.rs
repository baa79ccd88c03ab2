use super::banded::{best_state, AlignmentMode, BandMatrix, BandedAligner, Geometry, State};
use super::result::{Alignment, EditOp};

/// Direction for traceback in DP matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Walk {
    /// Left pass: walk toward the sequence starts
    Backward,
    /// Right pass: walk toward the sequence ends
    Forward,
}

/// Follow predecessor states from the anchor cell of one pass, emitting one
/// aligned column per visited cell state. Ops come out in walk order. In
/// local mode an `M` cell floored at 0 is empty and ends the walk.
fn walk(
    matrix: &BandMatrix,
    g: &Geometry,
    anchor_col: usize,
    direction: Walk,
    local: bool,
    query: &[u8],
    reference: &[u8],
) -> Vec<EditOp> {
    let mut ops = Vec::new();
    let mut col = anchor_col;
    let mut row = g.anchor_row();
    let (_, mut state) = best_state(matrix.scores(col, row));

    loop {
        let i = col - 1;
        let j = g.ref_index(col, row) as usize;
        let pred = matrix.pred(col, row, state);
        if local && state == State::M && matrix.scores(col, row)[State::M as usize] <= 0 {
            break;
        }
        match state {
            State::M => {
                ops.push(if query[i] == reference[j] {
                    EditOp::Match
                } else {
                    EditOp::Mismatch
                });
            }
            State::IQuery => ops.push(EditOp::Ins),
            State::IRef => ops.push(EditOp::Del),
            State::Done => break,
        }
        if pred == State::Done {
            break;
        }
        // move to the cell the recurrence read from
        match (direction, state) {
            (Walk::Backward, State::M) => col -= 1,
            (Walk::Backward, State::IQuery) => {
                col -= 1;
                row += 1;
            }
            (Walk::Backward, State::IRef) => row -= 1,
            (Walk::Forward, State::M) => col += 1,
            (Walk::Forward, State::IQuery) => {
                col += 1;
                row -= 1;
            }
            (Walk::Forward, State::IRef) => row += 1,
            (_, State::Done) => break,
        }
        state = pred;
    }
    ops
}

impl BandedAligner<'_> {
    /// Reconstruct the alignment scored by the last successful
    /// `compute_score` on the same sequences.
    ///
    /// The left flank is traced back from the first seed column and reversed,
    /// the seed interior is copied, and the right flank is traced forward from
    /// the last seed column.
    pub fn traceback(&self, query: &[u8], reference: &[u8]) -> Option<Alignment> {
        let scored = self.last?;
        let anchor = scored.anchor;
        let g = scored.geometry;
        let local = self.params.mode == AlignmentMode::Local;

        let mut left = walk(
            &self.left,
            &g,
            anchor.q_pos + 1,
            Walk::Backward,
            local,
            query,
            reference,
        );
        left.reverse();
        let right = walk(
            &self.right,
            &g,
            anchor.q_last() + 1,
            Walk::Forward,
            local,
            query,
            reference,
        );

        let left_query = left.iter().filter(|op| op.consumes_query()).count();
        let left_reference = left.iter().filter(|op| op.consumes_reference()).count();
        let q_start = anchor.q_pos + 1 - left_query;
        let r_start = anchor.r_pos + 1 - left_reference;

        let mut edit_script = left;
        edit_script.reserve(anchor.length + right.len());
        for k in 1..anchor.length - 1 {
            edit_script.push(if query[anchor.q_pos + k] == reference[anchor.r_pos + k] {
                EditOp::Match
            } else {
                EditOp::Mismatch
            });
        }
        edit_script.extend(right);

        Some(Alignment::new(scored.score, q_start, r_start, edit_script))
    }
}
