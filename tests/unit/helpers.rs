//! Test utilities shared by the unit test modules
//!
//! - Deterministic sequence generators
//! - Store and option fixtures for end-to-end searches
//! - Match construction for selector tests

use SALT::align::{Alignment, EditOp, Match};
use SALT::config::{SearchMode, SearchOptions};
use SALT::sequence::Alphabet;
use SALT::store::SequenceRecord;

/// Xorshift generator; identical output for identical seeds
pub struct Xorshift(u64);

impl Xorshift {
    pub fn new(seed: u64) -> Self {
        Self(seed.max(1))
    }

    pub fn next(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    pub fn below(&mut self, n: usize) -> usize {
        (self.next() % n as u64) as usize
    }
}

/// Pseudo-random nucleotide sequence (ASCII)
pub fn random_dna(length: usize, seed: u64) -> Vec<u8> {
    let mut rng = Xorshift::new(seed);
    (0..length).map(|_| b"ACGT"[rng.below(4)]).collect()
}

/// Pseudo-random protein sequence over the 20 standard amino acids (ASCII)
pub fn random_protein(length: usize, seed: u64) -> Vec<u8> {
    let mut rng = Xorshift::new(seed);
    (0..length).map(|_| b"ACDEFGHIKLMNPQRSTVWY"[rng.below(20)]).collect()
}

/// One codon per amino acid, so `translate(back_translate(p)) == p`
pub fn back_translate(protein: &[u8]) -> Vec<u8> {
    protein
        .iter()
        .flat_map(|&aa| {
            let codon: &[u8; 3] = match aa {
                b'A' => b"GCT",
                b'R' => b"CGT",
                b'N' => b"AAT",
                b'D' => b"GAT",
                b'C' => b"TGT",
                b'Q' => b"CAA",
                b'E' => b"GAA",
                b'G' => b"GGT",
                b'H' => b"CAT",
                b'I' => b"ATT",
                b'L' => b"CTG",
                b'K' => b"AAA",
                b'M' => b"ATG",
                b'F' => b"TTT",
                b'P' => b"CCT",
                b'S' => b"TCT",
                b'T' => b"ACT",
                b'W' => b"TGG",
                b'Y' => b"TAT",
                _ => b"GTT",
            };
            codon.iter().copied()
        })
        .collect()
}

/// Residue codes of a DNA string
pub fn dna(s: &[u8]) -> Vec<u8> {
    Alphabet::dna().encode(s)
}

/// Residue codes of a protein string
pub fn protein(s: &[u8]) -> Vec<u8> {
    Alphabet::protein().encode(s)
}

pub fn records(seqs: &[(&str, &[u8])]) -> Vec<SequenceRecord> {
    seqs.iter()
        .map(|(name, residues)| SequenceRecord::new(*name, *residues))
        .collect()
}

/// Mode defaults with a small, deterministic worker setup
pub fn test_options(mode: SearchMode) -> SearchOptions {
    let mut options = SearchOptions::defaults(mode).unwrap();
    options.threads = 2;
    options.jobs = 4;
    options
}

/// Ungapped match of `length` residues at the given starts
pub fn make_match(query_id: u32, reference_id: u32, score: i32, r_start: usize, length: usize) -> Match {
    let alignment = Alignment::new(score, 0, r_start, vec![EditOp::Match; length]);
    Match::new(query_id, 0, reference_id, score as f64 / 2.0, 1e-5, alignment, (1, length))
}
