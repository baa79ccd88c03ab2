//! Residue alphabets and seed alphabet reductions
//!
//! Residues are stored as small integer codes starting at 1. Code 0 never
//! denotes a residue: the packed sequence codec uses it as padding, and the
//! seed encoder uses class 0 for ambiguous/filler residues so that a bad seed
//! can be recognised from its bit pattern alone.

use crate::error::{Result, SaltError};

/// Kind of residues held by a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceType {
    Dna,
    Protein,
}

impl std::fmt::Display for SequenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SequenceType::Dna => write!(f, "DNA"),
            SequenceType::Protein => write!(f, "protein"),
        }
    }
}

/// DNA letters in code order (A=1 .. N=5)
const DNA_LETTERS: &[u8] = b"ACGTN";
/// Protein letters in code order (A=1 .. *=22)
const PROTEIN_LETTERS: &[u8] = b"ARNDCQEGHILKMFPSTWYVX*";

/// Build an ASCII -> code table; unknown characters map to `fallback`
const fn build_table(letters: &[u8], fallback: u8) -> [u8; 256] {
    let mut table = [fallback; 256];
    let mut i = 0;
    while i < letters.len() {
        let upper = letters[i];
        table[upper as usize] = (i + 1) as u8;
        if upper.is_ascii_uppercase() {
            table[upper.to_ascii_lowercase() as usize] = (i + 1) as u8;
        }
        i += 1;
    }
    table
}

const DNA_TABLE: [u8; 256] = {
    let mut table = build_table(DNA_LETTERS, 5);
    // RNA input
    table[b'U' as usize] = 4;
    table[b'u' as usize] = 4;
    table
};

const PROTEIN_TABLE: [u8; 256] = build_table(PROTEIN_LETTERS, 21);

/// A residue alphabet
#[derive(Debug)]
pub struct Alphabet {
    sequence_type: SequenceType,
    letters: &'static [u8],
    ambiguous: u8,
    to_code: [u8; 256],
}

static DNA: Alphabet = Alphabet {
    sequence_type: SequenceType::Dna,
    letters: DNA_LETTERS,
    ambiguous: 5,
    to_code: DNA_TABLE,
};

static PROTEIN: Alphabet = Alphabet {
    sequence_type: SequenceType::Protein,
    letters: PROTEIN_LETTERS,
    ambiguous: 21,
    to_code: PROTEIN_TABLE,
};

impl Alphabet {
    pub fn dna() -> &'static Alphabet {
        &DNA
    }

    pub fn protein() -> &'static Alphabet {
        &PROTEIN
    }

    pub fn for_type(sequence_type: SequenceType) -> &'static Alphabet {
        match sequence_type {
            SequenceType::Dna => &DNA,
            SequenceType::Protein => &PROTEIN,
        }
    }

    pub fn sequence_type(&self) -> SequenceType {
        self.sequence_type
    }

    /// Number of residue codes (codes run from 1 to `size()` inclusive)
    pub fn size(&self) -> usize {
        self.letters.len()
    }

    /// Code of the ambiguous residue (N for DNA, X for protein)
    pub fn ambiguous(&self) -> u8 {
        self.ambiguous
    }

    /// Bits needed to store a residue code plus the reserved zero code
    pub fn bits_per_letter(&self) -> u32 {
        bits_for_values(self.size() + 1)
    }

    /// True for residues that must never seed an alignment
    #[inline]
    pub fn is_filler(&self, code: u8) -> bool {
        code == 0 || code == self.ambiguous || code as usize > self.size() || self.is_stop(code)
    }

    #[inline]
    pub fn is_stop(&self, code: u8) -> bool {
        self.sequence_type == SequenceType::Protein && code == 22
    }

    #[inline]
    pub fn encode_residue(&self, residue: u8) -> u8 {
        self.to_code[residue as usize]
    }

    #[inline]
    pub fn decode_residue(&self, code: u8) -> u8 {
        if code == 0 || code as usize > self.letters.len() {
            b'-'
        } else {
            self.letters[code as usize - 1]
        }
    }

    pub fn encode(&self, residues: &[u8]) -> Vec<u8> {
        residues.iter().map(|&r| self.encode_residue(r)).collect()
    }

    pub fn decode(&self, codes: &[u8]) -> Vec<u8> {
        codes.iter().map(|&c| self.decode_residue(c)).collect()
    }
}

/// ceil(log2(values))
pub fn bits_for_values(values: usize) -> u32 {
    if values <= 1 {
        1
    } else {
        usize::BITS - (values - 1).leading_zeros()
    }
}

/// Maps residue codes onto a smaller set of seed letters.
///
/// Class 0 is reserved for filler residues (ambiguous codes, stops); real
/// classes are numbered from 1.
#[derive(Debug, Clone)]
pub struct Reduction {
    name: String,
    sequence_type: SequenceType,
    class_of: [u8; 32],
    classes: usize,
}

const DIAMOND_11: &[&str] = &["KREDQN", "C", "G", "H", "ILV", "M", "F", "Y", "W", "P", "STA"];
const MURPHY_10: &[&str] = &["LVIM", "C", "A", "G", "ST", "P", "FYW", "EDNQ", "KR", "H"];
const BLOSUM50_8: &[&str] = &["LVIMC", "AG", "ST", "P", "FYW", "EDNQ", "KR", "H"];

impl Reduction {
    /// Identity reduction over A, C, G, T
    pub fn dna() -> Self {
        Self::from_groups("DNA", Alphabet::dna(), &["A", "C", "G", "T"])
    }

    /// One class per standard amino acid
    pub fn unreduced_protein() -> Self {
        let groups: Vec<String> = PROTEIN_LETTERS[..20]
            .iter()
            .map(|&c| (c as char).to_string())
            .collect();
        let refs: Vec<&str> = groups.iter().map(String::as_str).collect();
        Self::from_groups("UNREDUCED", Alphabet::protein(), &refs)
    }

    /// Look up a named reduction for the given sequence type
    pub fn by_name(name: &str, sequence_type: SequenceType) -> Result<Self> {
        let upper = name.to_ascii_uppercase();
        match (sequence_type, upper.as_str()) {
            (SequenceType::Dna, "DNA") | (SequenceType::Dna, "DEFAULT") => Ok(Self::dna()),
            (SequenceType::Protein, "UNREDUCED") => Ok(Self::unreduced_protein()),
            (SequenceType::Protein, "DIAMOND_11") | (SequenceType::Protein, "DEFAULT") => {
                Ok(Self::from_groups("DIAMOND_11", Alphabet::protein(), DIAMOND_11))
            }
            (SequenceType::Protein, "MURPHY_10") => {
                Ok(Self::from_groups("MURPHY_10", Alphabet::protein(), MURPHY_10))
            }
            (SequenceType::Protein, "BLOSUM50_8") => {
                Ok(Self::from_groups("BLOSUM50_8", Alphabet::protein(), BLOSUM50_8))
            }
            _ => Err(SaltError::invalid_parameter(
                "reduction",
                format!("unknown {} alphabet reduction '{}'", sequence_type, name),
            )),
        }
    }

    fn from_groups(name: &str, alphabet: &Alphabet, groups: &[&str]) -> Self {
        let mut class_of = [0u8; 32];
        for (class, group) in groups.iter().enumerate() {
            for &residue in group.as_bytes() {
                let code = alphabet.encode_residue(residue) as usize;
                class_of[code] = (class + 1) as u8;
            }
        }
        Self {
            name: name.to_string(),
            sequence_type: alphabet.sequence_type(),
            class_of,
            classes: groups.len(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sequence_type(&self) -> SequenceType {
        self.sequence_type
    }

    pub fn classes(&self) -> usize {
        self.classes
    }

    /// Bits per seed letter: ceil(log2(classes + reserved filler class))
    pub fn bits_per_letter(&self) -> u32 {
        bits_for_values(self.classes + 1)
    }

    /// Seed letter for a residue code (0 for filler)
    #[inline]
    pub fn class(&self, code: u8) -> u8 {
        self.class_of[(code & 31) as usize]
    }

    /// A seed is good when none of its `weight` letters is the filler class
    #[inline]
    pub fn is_good_seed(&self, seed_code: u64, weight: usize) -> bool {
        let bits = self.bits_per_letter();
        let mask = (1u64 << bits) - 1;
        (0..weight).all(|i| (seed_code >> (i as u32 * bits)) & mask != 0)
    }
}
