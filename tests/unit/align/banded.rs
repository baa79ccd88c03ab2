//! Properties of the anchored banded aligner and its traceback

use SALT::align::{AlignerParams, Alignment, AlignmentMode, BandedAligner, EditOp, SeedAnchor};
use SALT::utils::matrix::ScoringMatrix;

use super::super::helpers::{dna, protein, random_dna, random_protein, Xorshift};

fn params(band: usize, gap_open: i32, gap_extend: i32) -> AlignerParams {
    AlignerParams {
        band,
        gap_open,
        gap_extend,
        mode: AlignmentMode::Local,
    }
}

fn align(
    matrix: &ScoringMatrix,
    params: AlignerParams,
    query: &[u8],
    reference: &[u8],
    anchor: SeedAnchor,
) -> Option<Alignment> {
    let mut aligner = BandedAligner::new(matrix, params);
    let score = aligner.compute_score(query, reference, anchor)?;
    let alignment = aligner.traceback(query, reference)?;
    assert_eq!(alignment.raw_score, score);
    Some(alignment)
}

/// Largest distance of any traceback step from the seed diagonal
fn max_drift(alignment: &Alignment, anchor: &SeedAnchor) -> usize {
    let seed_diagonal = anchor.r_pos as isize - anchor.q_pos as isize;
    let (mut qi, mut ri) = (alignment.q_start as isize, alignment.r_start as isize);
    let mut drift = (ri - qi - seed_diagonal).unsigned_abs();
    for &op in &alignment.edit_script {
        if op.consumes_query() {
            qi += 1;
        }
        if op.consumes_reference() {
            ri += 1;
        }
        drift = drift.max((ri - qi - seed_diagonal).unsigned_abs());
    }
    drift
}

#[test]
fn test_scenario_exact_match() {
    let matrix = ScoringMatrix::nucleotide(2, -3);
    let s = dna(b"ACGTACGTAC");
    let alignment = align(&matrix, params(4, 7, 3), &s, &s, SeedAnchor::new(0, 0, 4)).unwrap();
    assert_eq!(alignment.raw_score, 20);
    assert_eq!(alignment.stats.identities, 10);
    assert_eq!(alignment.stats.gaps, 0);
}

#[test]
fn test_scenario_single_mismatch() {
    let matrix = ScoringMatrix::nucleotide(2, -3);
    let query = dna(b"ACGTACGTAC");
    let reference = dna(b"ACGTTCGTAC");
    let alignment = align(&matrix, params(4, 7, 3), &query, &reference, SeedAnchor::new(0, 0, 4)).unwrap();
    assert_eq!(alignment.raw_score, 15);
    assert_eq!(alignment.stats.identities, 9);
    assert_eq!(alignment.stats.mismatches, 1);
    assert_eq!(alignment.stats.gaps, 0);
}

#[test]
fn test_self_alignment_identity_dna() {
    let matrix = ScoringMatrix::nucleotide(2, -3);
    let mut rng = Xorshift::new(21);
    for round in 0..50 {
        let length = 12 + rng.below(300);
        let s = dna(&random_dna(length, round + 100));
        let q_pos = rng.below(length - 11);
        let alignment = align(&matrix, params(4, 5, 2), &s, &s, SeedAnchor::new(q_pos, q_pos, 12)).unwrap();
        assert_eq!(alignment.stats.identities, length);
        assert_eq!(alignment.stats.gaps, 0);
        assert_eq!(alignment.raw_score, 2 * length as i32);
        assert_eq!((alignment.q_start, alignment.q_end), (0, length));
    }
}

#[test]
fn test_self_alignment_identity_protein() {
    let matrix = ScoringMatrix::blosum62();
    let mut rng = Xorshift::new(22);
    for round in 0..30 {
        let length = 15 + rng.below(200);
        let s = protein(&random_protein(length, round + 200));
        let q_pos = rng.below(length - 14);
        let alignment = align(&matrix, params(4, 11, 1), &s, &s, SeedAnchor::new(q_pos, q_pos, 15)).unwrap();
        assert_eq!(alignment.stats.identities, length);
        assert_eq!(alignment.stats.gaps, 0);
        assert_eq!(alignment.raw_score, matrix.diagonal_score(&s, &s));
    }
}

/// Copy of `seq` with random indels and substitutions after `protect`
fn mutate(seq: &[u8], protect: usize, rng: &mut Xorshift) -> Vec<u8> {
    let mut out = seq[..protect].to_vec();
    let mut i = protect;
    while i < seq.len() {
        match rng.below(40) {
            0 => i += 1 + rng.below(8),
            1 => {
                for _ in 0..1 + rng.below(8) {
                    out.push(1 + rng.below(4) as u8);
                }
            }
            2..=5 => {
                out.push(seq[i] % 4 + 1);
                i += 1;
            }
            _ => {
                out.push(seq[i]);
                i += 1;
            }
        }
    }
    out
}

#[test]
fn test_band_respect() {
    let matrix = ScoringMatrix::nucleotide(2, -3);
    let mut rng = Xorshift::new(23);
    for round in 0..100 {
        let band = 1 + rng.below(6);
        let query = dna(&random_dna(150, round + 300));
        let reference = mutate(&query, 24, &mut rng);
        let anchor = SeedAnchor::new(8, 8, 12);
        let Some(alignment) = align(&matrix, params(band, 5, 2), &query, &reference, anchor) else {
            continue;
        };
        assert!(max_drift(&alignment, &anchor) <= band, "round {} band {}", round, band);
        assert!(alignment.q_end <= query.len());
        assert!(alignment.r_end <= reference.len());
        assert_eq!(alignment.rescore(&query, &reference, &matrix, 5, 2), alignment.raw_score);
    }
}

#[test]
fn test_gaps_beyond_band_are_not_bridged() {
    let matrix = ScoringMatrix::nucleotide(2, -3);
    let query = dna(&random_dna(80, 400));
    // 10 residues missing from the reference after position 40
    let mut reference = query[..40].to_vec();
    reference.extend_from_slice(&query[50..]);
    let anchor = SeedAnchor::new(10, 10, 12);
    let alignment = align(&matrix, params(4, 5, 2), &query, &reference, anchor).unwrap();
    assert!(max_drift(&alignment, &anchor) <= 4);
    assert!(alignment.stats.gaps < 10);
    assert!(alignment.raw_score >= 80);

    let bridged = align(&matrix, params(12, 5, 2), &query, &reference, anchor).unwrap();
    assert_eq!(bridged.stats.gaps, 10);
    assert!(bridged.raw_score > alignment.raw_score);
}

#[test]
fn test_local_drops_negative_seed_edges() {
    let matrix = ScoringMatrix::blosum62();
    // R and D fall into one reduced seed class, but R/D scores -2
    let query = protein(b"RWWWWWR");
    let reference = protein(b"DWWWWWD");
    let alignment = align(&matrix, params(4, 11, 1), &query, &reference, SeedAnchor::new(0, 0, 7)).unwrap();
    assert_eq!(alignment.raw_score, 55);
    assert_eq!(alignment.edit_script, vec![EditOp::Match; 5]);
    assert_eq!((alignment.q_start, alignment.q_end), (1, 6));
    assert_eq!((alignment.r_start, alignment.r_end), (1, 6));

    // a positive flank beyond a negative seed edge is still worth reaching
    let query = protein(b"WWWRWWWWW");
    let reference = protein(b"WWWDWWWWW");
    let alignment = align(&matrix, params(4, 11, 1), &query, &reference, SeedAnchor::new(3, 3, 6)).unwrap();
    assert_eq!(alignment.raw_score, 8 * 11 - 2);
    assert_eq!((alignment.q_start, alignment.q_end), (0, 9));
    assert_eq!(alignment.stats.mismatches, 1);
}
