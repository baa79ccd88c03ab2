//! Spaced seed shapes
//!
//! A shape is a pattern such as `111010111`: `1` marks an informative
//! position, `0` a "don't care" position. The seed code of a window is built
//! from the reduced letters at informative positions, most significant first.

use crate::error::{Result, SaltError};
use crate::sequence::Reduction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedShape {
    id: usize,
    pattern: String,
    mask: Vec<bool>,
    positions: Vec<usize>,
    bits_per_letter: u32,
}

impl SeedShape {
    /// Parse a shape pattern for use with `reduction`.
    ///
    /// Fails when the pattern is malformed or when `weight * bits_per_letter`
    /// exceeds the 64 bits of a seed code.
    pub fn parse(id: usize, pattern: &str, reduction: &Reduction) -> Result<Self> {
        let invalid = |reason: &str| SaltError::InvalidShape {
            shape: pattern.to_string(),
            reason: reason.to_string(),
        };
        if pattern.len() < 3 {
            return Err(invalid("a shape spans at least three positions"));
        }
        if let Some(c) = pattern.chars().find(|c| *c != '0' && *c != '1') {
            return Err(invalid(&format!("unexpected character '{}'", c)));
        }
        if !pattern.starts_with('1') || !pattern.ends_with('1') {
            return Err(invalid("first and last positions must be informative"));
        }

        let mask: Vec<bool> = pattern.bytes().map(|b| b == b'1').collect();
        let positions: Vec<usize> = (0..mask.len()).filter(|&i| mask[i]).collect();
        let bits_per_letter = reduction.bits_per_letter();
        let bits = positions.len() * bits_per_letter as usize;
        if bits > 64 {
            return Err(SaltError::SeedTooWide {
                shape: pattern.to_string(),
                weight: positions.len(),
                bits_per_letter,
                bits,
            });
        }

        Ok(Self {
            id,
            pattern: pattern.to_string(),
            mask,
            positions,
            bits_per_letter,
        })
    }

    /// Position of this shape in the configured shape list
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Span of the window in residues
    pub fn length(&self) -> usize {
        self.mask.len()
    }

    /// Number of informative positions
    pub fn weight(&self) -> usize {
        self.positions.len()
    }

    pub fn is_informative(&self, i: usize) -> bool {
        self.mask.get(i).copied().unwrap_or(false)
    }

    /// Offsets of the informative positions within the window
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    pub fn bits_per_letter(&self) -> u32 {
        self.bits_per_letter
    }

    /// Seed code of the window starting at `pos`. Returns `None` when the
    /// window runs past the end of `residues`. Filler residues encode as
    /// letter 0, which `is_good_seed` rejects.
    #[inline]
    pub fn seed_code(&self, reduction: &Reduction, residues: &[u8], pos: usize) -> Option<u64> {
        let window = residues.get(pos..pos + self.length())?;
        let mut code = 0u64;
        for &offset in &self.positions {
            code = (code << self.bits_per_letter) | reduction.class(window[offset]) as u64;
        }
        Some(code)
    }

    #[inline]
    pub fn is_good_seed(&self, reduction: &Reduction, code: u64) -> bool {
        reduction.is_good_seed(code, self.weight())
    }

    /// Seed code of the window at `pos` if the window fits and holds no filler
    #[inline]
    pub fn good_seed_at(&self, reduction: &Reduction, residues: &[u8], pos: usize) -> Option<u64> {
        self.seed_code(reduction, residues, pos)
            .filter(|&code| self.is_good_seed(reduction, code))
    }

    /// Identical residues between the two windows over the full span
    pub fn identities(&self, query: &[u8], q_pos: usize, reference: &[u8], r_pos: usize) -> usize {
        let len = self.length();
        match (query.get(q_pos..q_pos + len), reference.get(r_pos..r_pos + len)) {
            (Some(q), Some(r)) => q.iter().zip(r).filter(|(a, b)| a == b).count(),
            _ => 0,
        }
    }
}

impl std::fmt::Display for SeedShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pattern)
    }
}
