//! Reference repeat masks
//!
//! Seeds that occur more often than a threshold in the reference set are
//! masked: their positions are recorded per (sequence, shape) and skipped when
//! the reference side of the seed index is built.

use std::sync::atomic::{AtomicUsize, Ordering};

use rustc_hash::FxHashMap;

use super::index::SeedEntry;
use crate::engine::locks::{StripedLocks, DEFAULT_STRIPES};

/// Bitmap over the positions of one sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaskBits {
    words: Vec<u64>,
}

impl MaskBits {
    pub fn set(&mut self, position: usize) {
        let word = position / 64;
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1 << (position % 64);
    }

    #[inline]
    pub fn get(&self, position: usize) -> bool {
        self.words
            .get(position / 64)
            .is_some_and(|w| w & (1 << (position % 64)) != 0)
    }

    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }
}

type MaskKey = (u32, usize);

/// Masks for all reference sequences, sharded by sequence id
#[derive(Debug)]
pub struct ReferenceMasks {
    table: StripedLocks<FxHashMap<MaskKey, MaskBits>>,
    marked: AtomicUsize,
}

impl Default for ReferenceMasks {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferenceMasks {
    pub fn new() -> Self {
        Self {
            table: StripedLocks::new(DEFAULT_STRIPES),
            marked: AtomicUsize::new(0),
        }
    }

    pub fn mark(&self, sequence_id: u32, shape_id: usize, position: usize) {
        let mut stripe = self.table.write(sequence_id as usize);
        let bits = stripe.entry((sequence_id, shape_id)).or_default();
        if !bits.get(position) {
            bits.set(position);
            self.marked.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[inline]
    pub fn is_masked(&self, sequence_id: u32, shape_id: usize, position: usize) -> bool {
        if self.marked.load(Ordering::Relaxed) == 0 {
            return false;
        }
        self.table
            .read(sequence_id as usize)
            .get(&(sequence_id, shape_id))
            .is_some_and(|bits| bits.get(position))
    }

    /// Copy of the mask of one sequence under one shape
    pub fn mask_of(&self, sequence_id: u32, shape_id: usize) -> Option<MaskBits> {
        self.table
            .read(sequence_id as usize)
            .get(&(sequence_id, shape_id))
            .cloned()
    }

    /// Total number of masked positions
    pub fn masked_positions(&self) -> usize {
        self.marked.load(Ordering::Relaxed)
    }
}

/// Mark every entry of a sorted reference bucket whose seed code occurs more
/// than `threshold` times. Returns the number of masked seed codes.
pub fn mask_repeats(
    sorted: &[SeedEntry],
    threshold: usize,
    shape_id: usize,
    masks: &ReferenceMasks,
) -> usize {
    let mut masked_codes = 0;
    for run in sorted.chunk_by(|a, b| a.code == b.code) {
        if run.len() > threshold {
            masked_codes += 1;
            for entry in run {
                let loc = entry.location();
                masks.mark(loc.sequence_id, shape_id, loc.position as usize);
            }
        }
    }
    masked_codes
}
