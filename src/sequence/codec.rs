//! Packed sequence representation
//!
//! Residue codes are packed most-significant-first into 64-bit words,
//! `64 / bits_per_letter` letters per word. Letters never straddle a word
//! boundary, and unused trailing letter slots are left as zero. Because no
//! residue has code 0, the length of a sequence can be recovered from the
//! code alone.

use super::alphabet::Alphabet;

/// Immutable packed residue sequence
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SequenceCode {
    words: Box<[u64]>,
}

impl SequenceCode {
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Packs and unpacks residue codes for one alphabet
#[derive(Debug, Clone, Copy)]
pub struct SequenceCodec {
    bits_per_letter: u32,
    letters_per_word: usize,
    letter_mask: u64,
}

impl SequenceCodec {
    pub fn new(alphabet: &Alphabet) -> Self {
        Self::with_bits(alphabet.bits_per_letter())
    }

    pub fn with_bits(bits_per_letter: u32) -> Self {
        let bits_per_letter = bits_per_letter.clamp(1, 8);
        Self {
            bits_per_letter,
            letters_per_word: (64 / bits_per_letter) as usize,
            letter_mask: (1u64 << bits_per_letter) - 1,
        }
    }

    pub fn bits_per_letter(&self) -> u32 {
        self.bits_per_letter
    }

    pub fn letters_per_word(&self) -> usize {
        self.letters_per_word
    }

    #[inline]
    fn shift(&self, slot: usize) -> u32 {
        64 - (slot as u32 + 1) * self.bits_per_letter
    }

    /// Pack residue codes (each in `1..2^bits_per_letter`)
    pub fn encode(&self, residues: &[u8]) -> SequenceCode {
        let mut words = vec![0u64; residues.len().div_ceil(self.letters_per_word)];
        for (i, &residue) in residues.iter().enumerate() {
            debug_assert!(residue != 0, "residue code 0 is reserved for padding");
            let word = i / self.letters_per_word;
            let slot = i % self.letters_per_word;
            words[word] |= (residue as u64 & self.letter_mask) << self.shift(slot);
        }
        SequenceCode {
            words: words.into_boxed_slice(),
        }
    }

    /// Number of residues held by `code`
    pub fn length(&self, code: &SequenceCode) -> usize {
        let Some(&last) = code.words.last() else {
            return 0;
        };
        let used = (0..self.letters_per_word)
            .take_while(|&slot| (last >> self.shift(slot)) & self.letter_mask != 0)
            .count();
        (code.words.len() - 1) * self.letters_per_word + used
    }

    /// Residue code at position `i` (0 past the end)
    #[inline]
    pub fn letter(&self, code: &SequenceCode, i: usize) -> u8 {
        match code.words.get(i / self.letters_per_word) {
            Some(word) => ((word >> self.shift(i % self.letters_per_word)) & self.letter_mask) as u8,
            None => 0,
        }
    }

    pub fn decode(&self, code: &SequenceCode) -> Vec<u8> {
        let mut out = Vec::new();
        self.decode_into(code, &mut out);
        out
    }

    /// Decode into a reusable buffer (cleared first)
    pub fn decode_into(&self, code: &SequenceCode, out: &mut Vec<u8>) {
        out.clear();
        out.reserve(code.words.len() * self.letters_per_word);
        'words: for &word in code.words.iter() {
            for slot in 0..self.letters_per_word {
                let letter = ((word >> self.shift(slot)) & self.letter_mask) as u8;
                if letter == 0 {
                    break 'words;
                }
                out.push(letter);
            }
        }
    }
}
