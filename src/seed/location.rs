//! Packed seed locations
//!
//! Layout of the 64-bit location word, most significant bits first:
//!
//! ```text
//! | sequence id (31) | position (30) | frame rank (3) |
//! ```
//!
//! Words therefore sort by sequence id, then position, then frame.

use crate::error::{Result, SaltError};

pub const FRAME_BITS: u32 = 3;
pub const POSITION_BITS: u32 = 30;
pub const SEQUENCE_ID_BITS: u32 = 31;

const POSITION_SHIFT: u32 = FRAME_BITS;
const SEQUENCE_ID_SHIFT: u32 = FRAME_BITS + POSITION_BITS;

pub const MAX_FRAMES: u64 = 1 << FRAME_BITS;
pub const MAX_POSITIONS: u64 = 1 << POSITION_BITS;
pub const MAX_SEQUENCES: u64 = 1 << SEQUENCE_ID_BITS;

/// Where a seed occurs: sequence, offset within the (frame of the) sequence,
/// and frame rank
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeedLocation {
    pub sequence_id: u32,
    pub position: u32,
    pub frame_rank: u8,
}

impl SeedLocation {
    pub fn new(sequence_id: usize, position: usize, frame_rank: usize) -> Result<Self> {
        check("sequence id", sequence_id as u64, MAX_SEQUENCES)?;
        check("position", position as u64, MAX_POSITIONS)?;
        check("frame rank", frame_rank as u64, MAX_FRAMES)?;
        Ok(Self {
            sequence_id: sequence_id as u32,
            position: position as u32,
            frame_rank: frame_rank as u8,
        })
    }

    #[inline]
    pub fn pack(&self) -> u64 {
        ((self.sequence_id as u64) << SEQUENCE_ID_SHIFT)
            | ((self.position as u64) << POSITION_SHIFT)
            | self.frame_rank as u64
    }

    #[inline]
    pub fn unpack(word: u64) -> Self {
        Self {
            sequence_id: (word >> SEQUENCE_ID_SHIFT) as u32,
            position: ((word >> POSITION_SHIFT) & (MAX_POSITIONS - 1)) as u32,
            frame_rank: (word & (MAX_FRAMES - 1)) as u8,
        }
    }
}

fn check(field: &'static str, value: u64, limit: u64) -> Result<()> {
    if value < limit {
        Ok(())
    } else {
        Err(SaltError::LocationOutOfRange {
            field,
            value,
            limit,
        })
    }
}
