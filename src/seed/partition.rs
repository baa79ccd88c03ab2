//! Routing of seed codes to (chunk, job) buckets
//!
//! `key = code / PARTITION_PRIME`, `chunk = key & (chunks - 1)`,
//! `job = (key >> log2(chunks)) & (jobs - 1)`. Dividing by an odd prime
//! first mixes the low bits, which otherwise all come from the last letter
//! of the seed.

use crate::error::{Result, SaltError};

pub const PARTITION_PRIME: u64 = 31;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partitioner {
    chunks: usize,
    jobs: usize,
    chunk_bits: u32,
}

impl Partitioner {
    /// Both counts must be powers of two
    pub fn new(chunks: usize, jobs: usize) -> Result<Self> {
        if !chunks.is_power_of_two() {
            return Err(SaltError::invalid_parameter(
                "chunks",
                format!("{} is not a power of two", chunks),
            ));
        }
        if !jobs.is_power_of_two() {
            return Err(SaltError::invalid_parameter(
                "jobs",
                format!("{} is not a power of two", jobs),
            ));
        }
        Ok(Self {
            chunks,
            jobs,
            chunk_bits: chunks.trailing_zeros(),
        })
    }

    pub fn chunks(&self) -> usize {
        self.chunks
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    #[inline]
    fn key(code: u64) -> u64 {
        code / PARTITION_PRIME
    }

    #[inline]
    pub fn chunk_of(&self, code: u64) -> usize {
        (Self::key(code) & (self.chunks as u64 - 1)) as usize
    }

    #[inline]
    pub fn job_of(&self, code: u64) -> usize {
        ((Self::key(code) >> self.chunk_bits) & (self.jobs as u64 - 1)) as usize
    }

    #[inline]
    pub fn route(&self, code: u64) -> (usize, usize) {
        (self.chunk_of(code), self.job_of(code))
    }
}
