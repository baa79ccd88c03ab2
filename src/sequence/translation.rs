//! Reading frames and translation
//!
//! Queries are searched in one frame (protein), two strands (DNA), or six
//! translated frames (DNA against protein). Each frame has a rank used in the
//! seed location word and a conventional label (+1, -2, ...).

use bio::alphabets::dna;

use super::alphabet::SequenceType;

/// Standard genetic code, codon positions ordered T, C, A, G
const STANDARD_CODE: &[u8; 64] = b"FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";

#[inline]
fn tcag_index(base: u8) -> Option<usize> {
    match base {
        b'T' | b't' | b'U' | b'u' => Some(0),
        b'C' | b'c' => Some(1),
        b'A' | b'a' => Some(2),
        b'G' | b'g' => Some(3),
        _ => None,
    }
}

/// Translate one codon; codons containing ambiguous bases give `X`
pub fn translate_codon(codon: &[u8]) -> u8 {
    match (
        tcag_index(codon[0]),
        tcag_index(codon[1]),
        tcag_index(codon[2]),
    ) {
        (Some(a), Some(b), Some(c)) => STANDARD_CODE[a * 16 + b * 4 + c],
        _ => b'X',
    }
}

/// Translate a DNA sequence starting at its first base; a trailing partial
/// codon is dropped
pub fn translate(seq: &[u8]) -> Vec<u8> {
    seq.chunks_exact(3).map(translate_codon).collect()
}

/// How a query is presented to the seed index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameScheme {
    /// Protein query, a single frame
    Identity,
    /// DNA query, forward strand and reverse complement
    Strands,
    /// DNA query translated in three frames per strand
    SixFrames,
}

impl FrameScheme {
    pub fn number_of_frames(&self) -> usize {
        match self {
            FrameScheme::Identity => 1,
            FrameScheme::Strands => 2,
            FrameScheme::SixFrames => 6,
        }
    }

    /// Residue type of the sequences this scheme reads
    pub fn input_type(&self) -> SequenceType {
        match self {
            FrameScheme::Identity => SequenceType::Protein,
            FrameScheme::Strands | FrameScheme::SixFrames => SequenceType::Dna,
        }
    }

    /// Residue type of the frames it produces
    pub fn frame_type(&self) -> SequenceType {
        match self {
            FrameScheme::Strands => SequenceType::Dna,
            FrameScheme::Identity | FrameScheme::SixFrames => SequenceType::Protein,
        }
    }

    /// Conventional label for a frame rank
    pub fn label(&self, rank: usize) -> i8 {
        match self {
            FrameScheme::Identity => 0,
            FrameScheme::Strands => {
                if rank == 0 {
                    1
                } else {
                    -1
                }
            }
            FrameScheme::SixFrames => {
                if rank < 3 {
                    rank as i8 + 1
                } else {
                    -(rank as i8 - 2)
                }
            }
        }
    }

    /// Residues (ASCII) of every frame, indexed by rank
    pub fn frames(&self, seq: &[u8]) -> Vec<Vec<u8>> {
        match self {
            FrameScheme::Identity => vec![seq.to_vec()],
            FrameScheme::Strands => vec![seq.to_vec(), dna::revcomp(seq)],
            FrameScheme::SixFrames => {
                let reverse = dna::revcomp(seq);
                let mut frames = Vec::with_capacity(6);
                for strand in [seq, reverse.as_slice()] {
                    for offset in 0..3 {
                        let start = offset.min(strand.len());
                        frames.push(translate(&strand[start..]));
                    }
                }
                frames
            }
        }
    }

    /// Map a half-open frame interval `[start, end)` to 1-based inclusive
    /// coordinates on the original sequence of length `original_len`.
    /// Reverse-strand intervals come back with start > end.
    pub fn to_original(
        &self,
        rank: usize,
        start: usize,
        end: usize,
        original_len: usize,
    ) -> (usize, usize) {
        if end <= start {
            return (start + 1, start + 1);
        }
        match self {
            FrameScheme::Identity => (start + 1, end),
            FrameScheme::Strands => {
                if rank == 0 {
                    (start + 1, end)
                } else {
                    (original_len - start, original_len - end + 1)
                }
            }
            FrameScheme::SixFrames => {
                let offset = rank % 3;
                let first = offset + 3 * start;
                let last = offset + 3 * end - 1;
                if rank < 3 {
                    (first + 1, last + 1)
                } else {
                    (original_len - first, original_len - last)
                }
            }
        }
    }
}
