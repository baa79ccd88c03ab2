//! Seed index buckets
//!
//! A `SeedIndexStore` collects `(seed code, location)` pairs for one
//! (chunk, job) bucket and sorts them by seed code with an LSD radix sort.

use super::location::SeedLocation;
use crate::error::{Result, SaltError};

/// Headroom applied to size estimates in `reserve`
pub const RESERVE_SKEW: f64 = 1.3;

/// Largest number of entries one bucket may hold
pub const MAX_ENTRIES: usize = i32::MAX as usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedEntry {
    pub code: u64,
    pub location: u64,
}

impl SeedEntry {
    #[inline]
    pub fn new(code: u64, location: SeedLocation) -> Self {
        Self {
            code,
            location: location.pack(),
        }
    }

    #[inline]
    pub fn location(&self) -> SeedLocation {
        SeedLocation::unpack(self.location)
    }
}

#[derive(Debug)]
pub struct SeedIndexStore {
    entries: Vec<SeedEntry>,
    bits_per_letter: u32,
    max_entries: usize,
    skew: f64,
}

impl SeedIndexStore {
    pub fn new(bits_per_letter: u32) -> Self {
        Self::with_limits(bits_per_letter, MAX_ENTRIES, RESERVE_SKEW)
    }

    pub fn with_limits(bits_per_letter: u32, max_entries: usize, skew: f64) -> Self {
        Self {
            entries: Vec::new(),
            bits_per_letter: bits_per_letter.clamp(1, 16),
            max_entries,
            skew: skew.max(1.0),
        }
    }

    /// Preallocate for about `approx_count` entries plus skew headroom
    pub fn reserve(&mut self, approx_count: usize) {
        let target = ((approx_count as f64 * self.skew).ceil() as usize).min(self.max_entries);
        if target > self.entries.capacity() {
            self.entries.reserve_exact(target - self.entries.len());
        }
    }

    /// Make room for `additional` more entries, doubling capacity up to the cap
    fn grow_for(&mut self, additional: usize) -> Result<()> {
        let needed = self.entries.len() + additional;
        if needed > self.max_entries {
            return Err(SaltError::CapacityExceeded {
                requested: needed,
                max: self.max_entries,
            });
        }
        if needed > self.entries.capacity() {
            let doubled = (self.entries.capacity() * 2).max(16);
            let target = doubled.max(needed).min(self.max_entries);
            self.entries.reserve_exact(target - self.entries.len());
        }
        Ok(())
    }

    pub fn add_seed(&mut self, code: u64, location: SeedLocation) -> Result<()> {
        self.push(SeedEntry::new(code, location))
    }

    #[inline]
    pub fn push(&mut self, entry: SeedEntry) -> Result<()> {
        self.grow_for(1)?;
        self.entries.push(entry);
        Ok(())
    }

    /// Move all of `buffer` into the store, leaving it empty
    pub fn append(&mut self, buffer: &mut Vec<SeedEntry>) -> Result<()> {
        self.grow_for(buffer.len())?;
        self.entries.append(buffer);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    pub fn entries(&self) -> &[SeedEntry] {
        &self.entries
    }

    /// Drop entries that fail `keep`, preserving order
    pub fn retain(&mut self, keep: impl FnMut(&SeedEntry) -> bool) {
        self.entries.retain(keep);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.entries.shrink_to_fit();
    }

    /// Sort entries by seed code; entries sharing a code are then ordered by
    /// location, so the result does not depend on which thread appended first
    pub fn sort(&mut self) {
        radix_sort(&mut self.entries, self.bits_per_letter);
        for run in self.entries.chunk_by_mut(|a, b| a.code == b.code) {
            if run.len() > 1 {
                run.sort_unstable_by_key(|e| e.location);
            }
        }
    }
}

/// Stable LSD radix sort on `code`, one seed letter per pass.
///
/// Only as many passes as the largest code needs are run, at most
/// `ceil(64 / bits_per_letter)`.
pub fn radix_sort(entries: &mut Vec<SeedEntry>, bits_per_letter: u32) {
    if entries.len() < 2 {
        return;
    }
    let digit_bits = bits_per_letter;
    let buckets = 1usize << digit_bits;
    let mask = (buckets - 1) as u64;

    let max_code = entries.iter().map(|e| e.code).max().unwrap_or(0);
    let significant = 64 - max_code.leading_zeros();
    let passes = significant.div_ceil(digit_bits);

    let mut buffer = vec![SeedEntry { code: 0, location: 0 }; entries.len()];
    let mut counts = vec![0usize; buckets];
    let mut src: &mut Vec<SeedEntry> = entries;
    let mut dst: &mut Vec<SeedEntry> = &mut buffer;

    for pass in 0..passes {
        let shift = pass * digit_bits;
        counts.iter_mut().for_each(|c| *c = 0);
        for entry in src.iter() {
            counts[((entry.code >> shift) & mask) as usize] += 1;
        }
        let mut offset = 0;
        for count in counts.iter_mut() {
            let n = *count;
            *count = offset;
            offset += n;
        }
        for entry in src.iter() {
            let digit = ((entry.code >> shift) & mask) as usize;
            dst[counts[digit]] = *entry;
            counts[digit] += 1;
        }
        std::mem::swap(&mut src, &mut dst);
    }

    // after an odd number of passes the sorted data sits in the scratch buffer
    if passes % 2 == 1 {
        std::mem::swap(src, dst);
    }
}
