//! Sequence stores consumed by the search engine
//!
//! The engine only sees these two traits. Residues are handed out as residue
//! codes (see [`crate::sequence::Alphabet`]); packed [`SequenceCode`]s are the
//! owned, immutable form each store keeps.

pub mod memory;

use crate::error::Result;
use crate::seed::mask::MaskBits;
use crate::seed::SeedShape;
use crate::sequence::{FrameScheme, SequenceCode, SequenceType};

pub use memory::{guess_sequence_type, InMemoryQueryStore, InMemoryReferenceStore, SequenceRecord};

/// Reference sequence set
pub trait ReferenceStore: Sync {
    fn sequence_type(&self) -> SequenceType;

    fn sequence_count(&self) -> usize;

    /// Packed form of sequence `id`
    fn sequence_code(&self, id: usize) -> Result<&SequenceCode>;

    /// Residue codes of sequence `id`
    fn residues(&self, id: usize) -> Result<&[u8]>;

    fn name(&self, id: usize) -> Result<&str>;

    /// Sum of all sequence lengths; the database size for E-values
    fn total_length(&self) -> u64;

    /// Precomputed exclusion bitmap for one seed shape, if the store carries one
    fn mask(&self, _id: usize, _shape_id: usize) -> Option<&MaskBits> {
        None
    }

    /// Seed shapes the precomputed masks were built for. A search must use
    /// the same shapes in the same order, since masks are keyed by shape id.
    fn seed_shapes(&self) -> Option<&[SeedShape]> {
        None
    }
}

/// Query sequence set, presented frame by frame
pub trait QueryStore: Sync {
    fn sequence_count(&self) -> usize;

    fn frame_scheme(&self) -> FrameScheme;

    fn number_of_frames(&self) -> usize {
        self.frame_scheme().number_of_frames()
    }

    /// Packed residues of one frame of query `id`
    fn sequence_code(&self, id: usize, frame_rank: usize) -> Result<&SequenceCode>;

    /// Residue codes of one frame of query `id`
    fn residues(&self, id: usize, frame_rank: usize) -> Result<&[u8]>;

    fn name(&self, id: usize) -> Result<&str>;

    /// Length of the query as read (before translation)
    fn original_length(&self, id: usize) -> Result<usize>;

    /// Map a half-open interval of a frame to 1-based inclusive coordinates on
    /// the original query
    fn to_original(&self, id: usize, frame_rank: usize, start: usize, end: usize) -> Result<(usize, usize)> {
        let length = self.original_length(id)?;
        Ok(self.frame_scheme().to_original(frame_rank, start, end, length))
    }
}
