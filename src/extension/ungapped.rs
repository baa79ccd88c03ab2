use crate::utils::matrix::ScoringMatrix;

/// Best ungapped segment found around a seed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UngappedHit {
    pub score: i32,
    pub q_start: usize,
    pub r_start: usize,
    pub length: usize,
}

impl UngappedHit {
    pub fn q_end(&self) -> usize {
        self.q_start + self.length
    }

    pub fn r_end(&self) -> usize {
        self.r_start + self.length
    }
}

/// Extend a seed window along its diagonal using X-drop termination.
///
/// The running score starts at the substitution sum of the seed window
/// `[q_pos, q_pos + seed_len)`. Extension runs leftward first, then rightward
/// from the best left end, and a direction stops once the running score falls
/// to `best - x_drop` or below. The reported score is the best one seen.
pub fn extend_ungapped(
    query: &[u8],
    reference: &[u8],
    q_pos: usize,
    r_pos: usize,
    seed_len: usize,
    matrix: &ScoringMatrix,
    x_drop: i32,
) -> UngappedHit {
    let seed_len = seed_len
        .min(query.len().saturating_sub(q_pos))
        .min(reference.len().saturating_sub(r_pos));
    let seed_score = matrix.diagonal_score(
        &query[q_pos..q_pos + seed_len],
        &reference[r_pos..r_pos + seed_len],
    );

    let mut best = seed_score;
    let mut current = seed_score;

    // Left extension: i counts residues added before the seed
    let mut best_left = 0;
    let max_left = q_pos.min(r_pos);
    for i in 1..=max_left {
        current += matrix.score(query[q_pos - i], reference[r_pos - i]);
        if current > best {
            best = current;
            best_left = i;
        } else if current <= best - x_drop {
            break;
        }
    }

    // Right extension continues from the best left end
    let mut current = best;
    let mut best_right = 0;
    let max_right = (query.len() - q_pos - seed_len).min(reference.len() - r_pos - seed_len);
    for j in 0..max_right {
        current += matrix.score(query[q_pos + seed_len + j], reference[r_pos + seed_len + j]);
        if current > best {
            best = current;
            best_right = j + 1;
        } else if current <= best - x_drop {
            break;
        }
    }

    UngappedHit {
        score: best,
        q_start: q_pos - best_left,
        r_start: r_pos - best_left,
        length: best_left + seed_len + best_right,
    }
}
